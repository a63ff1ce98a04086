use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A query predicate handed to the store untouched.
///
/// The paginator only inspects whether it has any keys; what the keys mean is
/// up to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(pub Value);

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Filter(Value::Object(Map::new()))
    }

    /// Single field equality condition.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = Map::new();
        map.insert(field.into(), value.into());
        Filter(Value::Object(map))
    }

    /// Adds another top-level condition. Non-object filters other than null
    /// are returned unchanged.
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        match &mut self.0 {
            Value::Object(map) => {
                map.insert(field.into(), value.into());
                self
            }
            Value::Null => Filter::eq(field, value),
            _ => self,
        }
    }

    /// True for `null` and for an object without keys.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::all()
    }
}

impl From<Value> for Filter {
    fn from(value: Value) -> Self {
        Filter(value)
    }
}

impl From<Map<String, Value>> for Filter {
    fn from(map: Map<String, Value>) -> Self {
        Filter(Value::Object(map))
    }
}

impl From<Option<Filter>> for Filter {
    fn from(filter: Option<Filter>) -> Self {
        filter.unwrap_or_default()
    }
}
