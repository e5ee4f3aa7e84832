use leptos::prelude::*;
use leptos::task::spawn_local;

use super::resolver::{EffectivePermissions, MutationGate, PermissionResolver};
use crate::system::session::context::{use_http_client, use_session};

/// Reactive capability state of one mounted page.
#[derive(Clone, Copy)]
pub struct PageAccess {
    pub permissions: RwSignal<EffectivePermissions>,
    pub loaded: RwSignal<bool>,
}

impl PageAccess {
    pub fn get(&self) -> EffectivePermissions {
        self.permissions.get()
    }

    /// Permissions arrived and allow viewing the list.
    pub fn can_list(&self) -> bool {
        self.loaded.get() && self.permissions.get().can_view
    }

    pub fn gate(&self) -> MutationGate {
        self.permissions.get_untracked().gate()
    }

    /// Recomputes whenever `is_editing` or the permissions change.
    pub fn form_disabled(&self, is_editing: Signal<bool>) -> Signal<bool> {
        let permissions = self.permissions;
        Signal::derive(move || permissions.get().is_form_disabled(is_editing.get()))
    }
}

/// Store resolved permissions unless the page was disposed meanwhile.
fn apply_permissions(access: PageAccess, effective: EffectivePermissions) -> bool {
    if access.permissions.try_set(effective).is_some() {
        return false;
    }
    access.loaded.try_set(true).is_none()
}

/// Resolve the capabilities of `menu_path` for this mount.
///
/// Starts fully denied; the result is applied only while the page is alive.
pub fn use_page_permissions(menu_path: String) -> PageAccess {
    let (session, _) = use_session();
    let client = use_http_client();
    let access = PageAccess {
        permissions: RwSignal::new(EffectivePermissions::default()),
        loaded: RwSignal::new(false),
    };

    let resolver = PermissionResolver::new(client, session.get_untracked().as_ref());
    spawn_local(async move {
        let effective = resolver.capabilities(&menu_path).await;
        if !apply_permissions(access, effective) {
            log::debug!("Page '{}' disposed before permissions arrived", menu_path);
        }
    });

    access
}
