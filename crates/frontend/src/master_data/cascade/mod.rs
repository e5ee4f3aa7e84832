//! Cascading hierarchy selects (University → … → Semester).
//!
//! `CascadeState` is the synchronous state machine; `fetch_options` runs a
//! ticket against the API; `CascadeSelector` wires both into a form.

pub mod fetch;
pub mod state;
pub mod ui;

pub use fetch::fetch_options;
pub use state::{CascadeState, FetchTicket};
pub use ui::CascadeSelector;
