use contracts::system::auth::Session;
use web_sys::window;

const SESSION_KEY: &str = "master_console_session";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Read the session written by the authentication service.
///
/// Missing or malformed entries yield `None`.
pub fn load_session() -> Option<Session> {
    let raw = get_local_storage()?.get_item(SESSION_KEY).ok()??;
    match serde_json::from_str::<Session>(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("Stored session is malformed, ignoring: {}", e);
            None
        }
    }
}

pub fn clear_session() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(SESSION_KEY);
    }
}
