//! Per-page capability resolution.
//!
//! - `api`: the permission collaborator
//! - `resolver`: `PermissionResolver`, superuser short-circuit, fail-closed lookup
//! - `hook`: `use_page_permissions` for components

pub mod api;
pub mod hook;
pub mod resolver;

pub use hook::{use_page_permissions, PageAccess};
pub use resolver::{EffectivePermissions, MutationGate, PermissionResolver, ResolvedAccess};
