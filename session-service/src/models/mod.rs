use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The persisted entity: an opaque JSON payload under a store-assigned id.
///
/// The payload is kept verbatim and replaced wholesale on update, never
/// merged. The id is a UUIDv4 string named `_id` both on the wire and in
/// MongoDB, so the driver uses it as the primary key instead of minting an
/// ObjectId.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: String,
    pub data: Value,
}

impl Session {
    pub fn new(data: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_sessions_get_distinct_ids() {
        let a = Session::new(json!({"user": "a"}));
        let b = Session::new(json!({"user": "a"}));

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn id_serializes_as_underscore_id() {
        let session = Session::new(json!({"user": "a"}));
        let value = serde_json::to_value(&session).unwrap();

        assert_eq!(value["_id"], session.id.as_str());
        assert_eq!(value["data"], json!({"user": "a"}));
        assert!(value.get("id").is_none());
    }

    #[test]
    fn round_trips_through_serde() {
        let original = Session::new(json!({"filters": {"gene": ["TP53"]}, "page": 3}));
        let encoded = serde_json::to_string(&original).unwrap();
        let decoded: Session = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded.id, original.id);
        assert_eq!(decoded.data, original.data);
    }
}
