use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Name of the identifier field every stored record carries.
pub const ID_FIELD: &str = "_id";

/// Name of the string identifier attached to lean records.
pub const LEAN_ID_FIELD: &str = "id";

pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s, 16).map(DocumentId)
    }
}

impl From<DocumentId> for Value {
    fn from(id: DocumentId) -> Self {
        Value::String(id.to_string())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A fully materialized document bound to its identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    #[serde(rename = "_id")]
    pub id: Value,
    #[serde(flatten)]
    pub fields: Record,
}

impl Entity {
    /// Splits a stored record into identifier and fields.
    ///
    /// A record without `_id` gets a null identifier.
    pub fn from_record(mut record: Record) -> Self {
        let id = record.remove(ID_FIELD).unwrap_or(Value::Null);
        Entity { id, fields: record }
    }

    /// String form of the identifier.
    pub fn id(&self) -> String {
        value_to_id_string(&self.id)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        if field == ID_FIELD {
            return Some(&self.id);
        }
        self.fields.get(field)
    }

    pub fn into_record(self) -> Record {
        let mut record = Record::new();
        record.insert(ID_FIELD.to_string(), self.id);
        record.extend(self.fields);
        record
    }
}

/// A document returned by a find query.
///
/// `Model` documents are what a non-lean query yields; `Lean` documents are
/// the plain records a lean query yields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Model(Entity),
    Lean(Record),
}

impl Document {
    pub fn is_lean(&self) -> bool {
        matches!(self, Document::Lean(_))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Document::Model(entity) => entity.get(field),
            Document::Lean(record) => record.get(field),
        }
    }

    /// String form of the document identifier.
    ///
    /// For lean records this reads `_id`, never the attached `id`.
    pub fn id(&self) -> Option<String> {
        self.get(ID_FIELD).map(value_to_id_string)
    }

    /// Attaches `id` as the string form of `_id` to a lean record.
    ///
    /// Model documents and records without `_id` are left untouched.
    pub fn attach_lean_id(&mut self) {
        if let Document::Lean(record) = self {
            if let Some(id) = record.get(ID_FIELD).map(value_to_id_string) {
                record.insert(LEAN_ID_FIELD.to_string(), Value::String(id));
            }
        }
    }

    pub fn into_record(self) -> Record {
        match self {
            Document::Model(entity) => entity.into_record(),
            Document::Lean(record) => record,
        }
    }
}

pub(crate) fn value_to_id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
