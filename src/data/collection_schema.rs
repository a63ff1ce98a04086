use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// How a field of a collection is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldSchema {
    /// Holds the `_id` of a document (or a list of them) in `collection`.
    Reference { collection: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    pub fields: AHashMap<String, FieldSchema>,
}

impl CollectionSchema {
    pub fn new(name: impl Into<String>) -> Self {
        CollectionSchema {
            name: name.into(),
            fields: AHashMap::new(),
        }
    }

    /// Declares `path` as a reference into `collection`.
    pub fn reference(mut self, path: impl Into<String>, collection: impl Into<String>) -> Self {
        self.fields.insert(
            path.into(),
            FieldSchema::Reference {
                collection: collection.into(),
            },
        );
        self
    }

    pub fn reference_target(&self, path: &str) -> Option<&str> {
        match self.fields.get(path)? {
            FieldSchema::Reference { collection } => Some(collection),
        }
    }
}
