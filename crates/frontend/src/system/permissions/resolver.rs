use std::cell::RefCell;

use contracts::system::auth::Session;
use contracts::system::permissions::{normalize_menu_path, PagePermission};

use super::api::PermissionApi;

/// Capabilities of the current session on one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectivePermissions {
    pub can_add: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_view: bool,
    pub is_superuser: bool,
}

impl EffectivePermissions {
    pub fn superuser() -> Self {
        Self {
            can_add: true,
            can_edit: true,
            can_delete: true,
            can_view: true,
            is_superuser: true,
        }
    }

    pub fn from_row(row: &PagePermission) -> Self {
        Self {
            can_add: row.can_add,
            can_edit: row.can_edit,
            can_delete: row.can_delete,
            can_view: row.can_view,
            is_superuser: false,
        }
    }

    /// `!superuser && (editing ? !can_edit : !can_add)`
    pub fn is_form_disabled(&self, is_editing: bool) -> bool {
        !self.is_superuser && if is_editing { !self.can_edit } else { !self.can_add }
    }

    pub fn for_mode(&self, is_editing: bool) -> ResolvedAccess {
        ResolvedAccess {
            can_add: self.can_add,
            can_edit: self.can_edit,
            can_delete: self.can_delete,
            can_view: self.can_view,
            is_superuser: self.is_superuser,
            is_form_disabled: self.is_form_disabled(is_editing),
        }
    }

    pub fn gate(&self) -> MutationGate {
        MutationGate::from(self)
    }
}

/// Result of [`PermissionResolver::resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedAccess {
    pub can_add: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_view: bool,
    pub is_superuser: bool,
    pub is_form_disabled: bool,
}

/// Capability snapshot handed to mutating controller operations.
///
/// The controller trusts this gate and does not consult the resolver again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationGate {
    pub can_add: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub is_superuser: bool,
}

impl MutationGate {
    pub fn allow_all() -> Self {
        Self {
            is_superuser: true,
            ..Self::default()
        }
    }

    pub fn allows_insert(&self) -> bool {
        self.is_superuser || self.can_add
    }

    pub fn allows_update(&self) -> bool {
        self.is_superuser || self.can_edit
    }

    pub fn allows_delete(&self) -> bool {
        self.is_superuser || self.can_delete
    }
}

impl From<&EffectivePermissions> for MutationGate {
    fn from(p: &EffectivePermissions) -> Self {
        Self {
            can_add: p.can_add,
            can_edit: p.can_edit,
            can_delete: p.can_delete,
            is_superuser: p.is_superuser,
        }
    }
}

/// Resolves page capabilities for one page mount.
///
/// Holds the row of the last resolved path; resolving a different path
/// refetches. Instances are never shared between mounts.
pub struct PermissionResolver<A> {
    api: A,
    is_superuser: bool,
    cached: RefCell<Option<PagePermission>>,
}

impl<A: PermissionApi> PermissionResolver<A> {
    pub fn new(api: A, session: Option<&Session>) -> Self {
        Self {
            api,
            is_superuser: session.map(|s| s.is_superuser).unwrap_or(false),
            cached: RefCell::new(None),
        }
    }

    pub async fn capabilities(&self, menu_path: &str) -> EffectivePermissions {
        if self.is_superuser {
            return EffectivePermissions::superuser();
        }

        let path = normalize_menu_path(menu_path);
        if let Some(row) = self.cached.borrow().as_ref().filter(|r| r.menu_path == path) {
            return EffectivePermissions::from_row(row);
        }

        let row = match self.api.my_permissions().await {
            Ok(rows) => rows
                .into_iter()
                .find(|r| r.matches(path))
                .map(|r| PagePermission {
                    menu_path: path.to_string(),
                    ..r
                })
                .unwrap_or_else(|| {
                    log::debug!("No permission row for '{}', denying", path);
                    PagePermission::denied(path)
                }),
            Err(e) => {
                log::error!("Failed to load permissions for '{}': {}", path, e);
                return EffectivePermissions::default();
            }
        };

        let effective = EffectivePermissions::from_row(&row);
        *self.cached.borrow_mut() = Some(row);
        effective
    }

    pub async fn resolve(&self, menu_path: &str, is_editing: bool) -> ResolvedAccess {
        self.capabilities(menu_path).await.for_mode(is_editing)
    }
}
