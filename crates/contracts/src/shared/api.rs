//! Response envelopes used by the master-data REST surface.

use serde::{Deserialize, Serialize};

/// `{ "status": ..., "data": ... }` wrapper returned by most endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: serde_json::Value,
    pub data: T,
}

/// List body: either enveloped or a bare JSON array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Envelope(ApiEnvelope<Vec<T>>),
    Bare(Vec<T>),
}

impl<T> ListPayload<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Envelope(env) => env.data,
            Self::Bare(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_payload_accepts_both_shapes() {
        let wrapped: ListPayload<i32> =
            serde_json::from_str(r#"{"status":"success","data":[1,2]}"#).unwrap();
        assert_eq!(wrapped.into_items(), vec![1, 2]);

        let bare: ListPayload<i32> = serde_json::from_str("[3]").unwrap();
        assert_eq!(bare.into_items(), vec![3]);
    }
}
