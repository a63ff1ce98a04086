use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionNotFound(pub String);
impl error::Error for CollectionNotFound {}
impl fmt::Display for CollectionNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Collection not found: {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionExists(pub String);
impl error::Error for CollectionExists {}
impl fmt::Display for CollectionExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Collection already exists: {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidFilter(pub String);
impl error::Error for InvalidFilter {}
impl fmt::Display for InvalidFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid filter: {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidProjection(pub String);
impl error::Error for InvalidProjection {}
impl fmt::Display for InvalidProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid projection: {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidSort(pub String);
impl error::Error for InvalidSort {}
impl fmt::Display for InvalidSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid sort: {}", self.0)
    }
}

/// Populate was asked for a path with no known target collection.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownReference {
    pub collection: String,
    pub path: String,
}
impl error::Error for UnknownReference {}
impl fmt::Display for UnknownReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot populate path `{}` of collection {}: no reference declared",
            self.path, self.collection
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidDocument(pub String);
impl error::Error for InvalidDocument {}
impl fmt::Display for InvalidDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid document: {}", self.0)
    }
}
