use contracts::system::auth::Session;
use leptos::prelude::*;

use super::storage;
use crate::shared::http_client::HttpClient;

/// Session context provider. Loads the stored session once at startup.
#[component]
pub fn SessionProvider(children: ChildrenFn) -> impl IntoView {
    let (session, set_session) = signal(storage::load_session());

    provide_context(session);
    provide_context(set_session);

    children()
}

/// Hook to access the session signals
pub fn use_session() -> (ReadSignal<Option<Session>>, WriteSignal<Option<Session>>) {
    let session = use_context::<ReadSignal<Option<Session>>>()
        .expect("SessionProvider not found in component tree");
    let set_session = use_context::<WriteSignal<Option<Session>>>()
        .expect("SessionProvider not found in component tree");

    (session, set_session)
}

/// HTTP collaborator bound to the current session snapshot.
pub fn use_http_client() -> HttpClient {
    let (session, _) = use_session();
    HttpClient::new(session.get_untracked())
}

/// Clear the stored session and the context. Used on logout and on 401.
pub fn end_session(set_session: WriteSignal<Option<Session>>) {
    storage::clear_session();
    let _ = set_session.try_set(None);
}
