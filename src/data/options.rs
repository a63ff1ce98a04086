use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_LIMIT: u64 = 10;

/// Field projection, passed through to the store.
///
/// Either a space separated list (`"title -date"`) or an object spec
/// (`{"title": 1}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Select {
    Fields(String),
    Spec(Map<String, Value>),
}

impl From<&str> for Select {
    fn from(fields: &str) -> Self {
        Select::Fields(fields.to_string())
    }
}

impl From<String> for Select {
    fn from(fields: String) -> Self {
        Select::Fields(fields)
    }
}

impl From<Map<String, Value>> for Select {
    fn from(spec: Map<String, Value>) -> Self {
        Select::Spec(spec)
    }
}

/// Result ordering, passed through to the store.
///
/// Either a space separated list where a leading `-` means descending
/// (`"date -title"`) or an object spec (`{"date": -1}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sort {
    Fields(String),
    Spec(Map<String, Value>),
}

impl From<&str> for Sort {
    fn from(fields: &str) -> Self {
        Sort::Fields(fields.to_string())
    }
}

impl From<String> for Sort {
    fn from(fields: String) -> Self {
        Sort::Fields(fields)
    }
}

impl From<Map<String, Value>> for Sort {
    fn from(spec: Map<String, Value>) -> Self {
        Sort::Spec(spec)
    }
}

/// Describes one relation to populate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulateDescriptor {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<Select>,
    /// Collection to resolve the reference against, overriding the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl PopulateDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        PopulateDescriptor {
            path: path.into(),
            select: None,
            model: None,
        }
    }

    pub fn select(mut self, select: impl Into<Select>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PopulateTarget {
    Path(String),
    Descriptor(PopulateDescriptor),
}

impl PopulateTarget {
    pub fn path(&self) -> &str {
        match self {
            PopulateTarget::Path(path) => path,
            PopulateTarget::Descriptor(descriptor) => &descriptor.path,
        }
    }
}

impl From<&str> for PopulateTarget {
    fn from(path: &str) -> Self {
        PopulateTarget::Path(path.to_string())
    }
}

impl From<String> for PopulateTarget {
    fn from(path: String) -> Self {
        PopulateTarget::Path(path)
    }
}

impl From<PopulateDescriptor> for PopulateTarget {
    fn from(descriptor: PopulateDescriptor) -> Self {
        PopulateTarget::Descriptor(descriptor)
    }
}

/// One populate target or a sequence of them.
///
/// `Many` is tried first: a derived struct also deserializes from a JSON
/// array, so `One` would swallow `["a", "b"]` as a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Populate {
    Many(Vec<PopulateTarget>),
    One(PopulateTarget),
}

impl Populate {
    pub fn into_targets(self) -> Vec<PopulateTarget> {
        match self {
            Populate::One(target) => vec![target],
            Populate::Many(targets) => targets,
        }
    }
}

impl From<PopulateTarget> for Populate {
    fn from(target: PopulateTarget) -> Self {
        Populate::One(target)
    }
}

impl From<&str> for Populate {
    fn from(path: &str) -> Self {
        Populate::One(path.into())
    }
}

impl From<String> for Populate {
    fn from(path: String) -> Self {
        Populate::One(path.into())
    }
}

impl From<PopulateDescriptor> for Populate {
    fn from(descriptor: PopulateDescriptor) -> Self {
        Populate::One(descriptor.into())
    }
}

impl From<Vec<PopulateTarget>> for Populate {
    fn from(targets: Vec<PopulateTarget>) -> Self {
        Populate::Many(targets)
    }
}

impl From<Vec<&str>> for Populate {
    fn from(paths: Vec<&str>) -> Self {
        Populate::Many(paths.into_iter().map(PopulateTarget::from).collect())
    }
}

/// Options for a single pagination call.
///
/// Every field is optional: an absent field falls back to the model defaults
/// and then to the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginateOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<Select>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub populate: Option<Populate>,
    /// Defaults to false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lean: Option<bool>,
    /// Defaults to true; only meaningful together with `lean`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lean_with_id: Option<bool>,
    /// Defaults to 10. Zero skips fetching documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Takes precedence over `page` when both are present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
}

impl PaginateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, select: impl Into<Select>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<Sort>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn populate(mut self, populate: impl Into<Populate>) -> Self {
        self.populate = Some(populate.into());
        self
    }

    pub fn lean(mut self, lean: bool) -> Self {
        self.lean = Some(lean);
        self
    }

    pub fn lean_with_id(mut self, lean_with_id: bool) -> Self {
        self.lean_with_id = Some(lean_with_id);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Layers `overrides` on top of `self`, field by field.
    pub fn merge(&self, overrides: PaginateOptions) -> PaginateOptions {
        PaginateOptions {
            select: overrides.select.or_else(|| self.select.clone()),
            sort: overrides.sort.or_else(|| self.sort.clone()),
            populate: overrides.populate.or_else(|| self.populate.clone()),
            lean: overrides.lean.or(self.lean),
            lean_with_id: overrides.lean_with_id.or(self.lean_with_id),
            limit: overrides.limit.or(self.limit),
            offset: overrides.offset.or(self.offset),
            page: overrides.page.or(self.page),
        }
    }

    /// Parses options from JSON, e.g. a configuration file or query parameters.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
