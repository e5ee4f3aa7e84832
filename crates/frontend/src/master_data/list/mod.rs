//! Master list screens.
//!
//! - `state`: loaded rows, column order and the selection set
//! - `controller`: `MasterListController`, CRUD against one table
//! - `ui`: `MasterListPage` with its create/edit dialog

pub mod controller;
pub mod state;
pub mod ui;

pub use controller::{BulkDeleteReport, MasterListController, SaveOutcome};
pub use state::ListState;
pub use ui::MasterListPage;
