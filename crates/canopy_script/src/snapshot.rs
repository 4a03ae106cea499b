//! Serialized form of a script instance, used across rebuilds.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field values of one instance, keyed by field name in declaration order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub type_name: String,
    pub fields: IndexMap<String, Value>,
}

impl Snapshot {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Plain JSON object of the field values, as persisted by hosts.
    pub fn to_payload(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}
