use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque document identifier, kept exactly as found in the backing JSON.
///
/// Any JSON value is accepted (numbers of any width, strings, booleans) and
/// serialized back unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct DocumentId(Value);

impl DocumentId {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for DocumentId {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Route of the rendered page, e.g. `/intro`.
    #[serde(default)]
    pub path: String,
}
