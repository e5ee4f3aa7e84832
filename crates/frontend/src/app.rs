use leptos::prelude::*;

use crate::master_data::list::MasterListPage;
use crate::master_data::pages::{grouped, MasterPage};
use crate::system::session::context::{end_session, use_session, SessionProvider};
use crate::system::session::guard::RequireSession;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <SessionProvider>
            <RequireSession>
                <MasterConsole />
            </RequireSession>
        </SessionProvider>
    }
}

#[component]
fn Sidebar(active: RwSignal<Option<&'static MasterPage>>) -> impl IntoView {
    let (session, set_session) = use_session();
    let user = move || session.with(|s| s.as_ref().map(|s| s.user_id.clone()).unwrap_or_default());

    view! {
        <div class="app-sidebar__content">
            {grouped()
                .into_iter()
                .map(|(group, pages)| view! {
                    <div class="app-sidebar__group">
                        <div class="app-sidebar__group-title">{group.title()}</div>
                        {pages
                            .into_iter()
                            .map(|page| view! {
                                <div
                                    class="app-sidebar__item"
                                    class:app-sidebar__item--active=move || active.get() == Some(page)
                                    style:padding-left="28px"
                                    on:click=move |_| active.set(Some(page))
                                >
                                    {page.title}
                                </div>
                            })
                            .collect_view()}
                    </div>
                })
                .collect_view()}
            <div class="app-sidebar__footer">
                <span class="app-sidebar__user">{user}</span>
                <button class="button button--secondary" title="Log out" on:click=move |_| end_session(set_session)>
                    "Log out"
                </button>
            </div>
        </div>
    }
}

/// Sidebar plus the active list page. Switching pages disposes the previous
/// page together with its permission and cascade state.
#[component]
fn MasterConsole() -> impl IntoView {
    let active = RwSignal::new(None::<&'static MasterPage>);

    view! {
        <div class="app-layout">
            <aside class="app-sidebar">
                <Sidebar active=active />
            </aside>
            <main class="app-main">
                {move || match active.get() {
                    Some(page) => view! { <MasterListPage page=page /> }.into_any(),
                    None => view! {
                        <div class="page">
                            <p class="form-hint">"Select a table in the sidebar."</p>
                        </div>
                    }
                    .into_any(),
                }}
            </main>
        </div>
    }
}
