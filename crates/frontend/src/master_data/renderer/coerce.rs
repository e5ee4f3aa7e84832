use contracts::master::record::FieldValue;

use super::describe::FieldDescriptor;

/// HTML input type the change event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Checkbox,
    Number,
    Text,
    Select,
}

/// Raw change event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInput {
    pub kind: InputKind,
    pub value: String,
    pub checked: bool,
}

impl RawInput {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: InputKind::Text,
            value: value.into(),
            checked: false,
        }
    }

    pub fn number(value: impl Into<String>) -> Self {
        Self {
            kind: InputKind::Number,
            value: value.into(),
            checked: false,
        }
    }

    pub fn checkbox(checked: bool) -> Self {
        Self {
            kind: InputKind::Checkbox,
            value: String::new(),
            checked,
        }
    }

    pub fn select(value: impl Into<String>) -> Self {
        Self {
            kind: InputKind::Select,
            value: value.into(),
            checked: false,
        }
    }
}

/// Coerce an input event into the value stored in the record.
///
/// Checkboxes become booleans, number inputs parse as floating point (an
/// empty or unparsable entry becomes `Null`), everything else is a string.
/// Read-only fields keep their value.
pub fn apply(descriptor: &FieldDescriptor, raw: &RawInput) -> FieldValue {
    if descriptor.read_only {
        return descriptor.value.clone();
    }
    match raw.kind {
        InputKind::Checkbox => FieldValue::Bool(raw.checked),
        InputKind::Number => match raw.value.trim().parse::<f64>() {
            Ok(n) => FieldValue::from_f64(n),
            Err(_) => {
                if !raw.value.trim().is_empty() {
                    log::debug!("'{}' is not a number for {}", raw.value, descriptor.key);
                }
                FieldValue::Null
            }
        },
        InputKind::Text | InputKind::Select => FieldValue::Text(raw.value.clone()),
    }
}
