use leptos::prelude::*;

use super::context::use_session;

/// Renders children only while a session with a token is present.
#[component]
pub fn RequireSession(children: ChildrenFn) -> impl IntoView {
    let (session, _) = use_session();

    view! {
        <Show
            when=move || session.get().map(|s| s.has_token()).unwrap_or(false)
            fallback=|| view! {
                <div class="warning-box">
                    <span class="warning-box__text">"Not authenticated. Please sign in through the portal."</span>
                </div>
            }
        >
            {children()}
        </Show>
    }
}
