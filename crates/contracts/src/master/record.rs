use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Server-assigned audit columns. Present on every record, never edited.
pub const AUDIT_FIELDS: [&str; 4] = ["CREATED_BY", "UPDATED_BY", "CREATED_AT", "UPDATED_AT"];

pub fn is_audit_field(key: &str) -> bool {
    AUDIT_FIELDS.contains(&key)
}

/// Value of a single master-record column.
///
/// Anything that is not a scalar is kept verbatim in `Other` so a record with
/// an unexpected shape still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn from_f64(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(Self::Number)
            .unwrap_or(Self::Null)
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
            Self::Text(s) => matches!(s.as_str(), "true" | "1" | "True"),
            _ => false,
        }
    }

    /// Text shown inside an input. `Null` renders as an empty string.
    pub fn to_input_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Other(v) => v.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

/// Flat `FIELD_NAME -> value` record. Field order is the order the server
/// sent them in and is preserved through edits and re-serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterRecord {
    fields: IndexMap<String, FieldValue>,
}

impl MasterRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Sets a field. New keys are appended; existing keys keep their position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of `key` usable as an identifier, or `None` when missing or blank.
    pub fn id_of(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            v if v.is_blank() => None,
            v => Some(v.to_input_string()),
        }
    }

    /// Copy with the audit columns removed, for outgoing payloads.
    pub fn without_audit_fields(&self) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|(k, _)| !is_audit_field(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for MasterRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
