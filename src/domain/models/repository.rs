use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub fork: bool,
}

impl Repository {
    /// Projects one element of the "list repositories for user" response.
    ///
    /// Returns `None` unless the element is an object whose `name` is a
    /// non-empty string. A `fork` that is missing, null or not a boolean
    /// counts as `false`.
    pub fn from_record(record: &Value) -> Option<Self> {
        let name = record.get("name")?.as_str().filter(|name| !name.is_empty())?;
        let fork = record.get("fork").and_then(Value::as_bool).unwrap_or(false);
        Some(Self {
            name: name.to_string(),
            fork,
        })
    }
}
