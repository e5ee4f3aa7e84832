use serde::{Deserialize, Serialize};

use crate::shared::api::ApiEnvelope;

/// Capability row for one logical page, as returned by
/// `GET /api/permissions/my_permissions/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePermission {
    pub menu_path: String,
    #[serde(default)]
    pub can_add: bool,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub can_view: bool,
}

pub type PermissionsResponse = ApiEnvelope<Vec<PagePermission>>;

impl PagePermission {
    /// All four capabilities granted. Used for superusers.
    pub fn full(menu_path: &str) -> Self {
        Self {
            menu_path: normalize_menu_path(menu_path).to_string(),
            can_add: true,
            can_edit: true,
            can_delete: true,
            can_view: true,
        }
    }

    /// All four capabilities denied (fail closed).
    pub fn denied(menu_path: &str) -> Self {
        Self {
            menu_path: normalize_menu_path(menu_path).to_string(),
            ..Self::default()
        }
    }

    pub fn matches(&self, menu_path: &str) -> bool {
        normalize_menu_path(&self.menu_path) == normalize_menu_path(menu_path)
    }
}

/// Strips a single trailing slash. Never adds one.
pub fn normalize_menu_path(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}
