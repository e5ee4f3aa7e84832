use serde::{Deserialize, Serialize};

/// Authenticated browser session.
///
/// Issued by the authentication service and persisted in local storage by
/// the client. The console only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    #[serde(default)]
    pub is_superuser: bool,
    pub token: String,
}

impl Session {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }
}
