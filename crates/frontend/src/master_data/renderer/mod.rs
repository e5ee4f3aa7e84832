//! Schema-less record rendering.
//!
//! `describe` turns an arbitrary flat record into ordered field descriptors
//! using a small override table; `apply` coerces input events back into
//! record values; `RecordEditForm` renders the descriptors.

pub mod coerce;
pub mod describe;
pub mod ui;

pub use coerce::{apply, InputKind, RawInput};
pub use describe::{
    blank_record, describe, foreign_key_sources, label_for, FieldDescriptor, ForeignKeySource,
    RelatedOptions, SelectOption, WidgetKind,
};
pub use ui::RecordEditForm;
