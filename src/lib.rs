//! Offset and page pagination over document store queries.
//!
//! A paginated call issues a total count and a bounded find against a
//! [`DocumentStore`] at the same time and returns both as a [`PageResult`].
//!
//! ```no_run
//! use qpage_rs::{CollectionSchema, Filter, MemoryStore, Paginate, PaginateOptions};
//!
//! # async fn example() -> qpage_rs::Result<()> {
//! let store = MemoryStore::new();
//! let books = store.create_collection(CollectionSchema::new("books")).await?;
//!
//! let page = books
//!     .paginate(Filter::all(), PaginateOptions::new().page(2).limit(20).sort("-date"))
//!     .await?;
//! println!("{} of {} books", page.docs.len(), page.total);
//! # Ok(())
//! # }
//! ```
pub mod data;

pub use data::{
    paginate, CollectionSchema, Document, DocumentId, DocumentStore, Entity, FieldSchema, Filter,
    MemoryQuery, MemoryStore, Model, PageCount, PageResult, Paginate, PaginateOptions, Populate,
    PopulateDescriptor, PopulateTarget, QueryBuilder, Record, Select, Snowflake, Sort, Window,
    DEFAULT_LIMIT, ID_FIELD, LEAN_ID_FIELD,
};

pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test;
