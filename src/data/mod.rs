mod collection_schema;
mod document;
pub mod error;
mod filter;
pub mod matcher;
mod options;
mod paginate;
mod pagination;
pub mod projection;
mod snowflake;
mod store;
mod store_trait;

pub use collection_schema::{CollectionSchema, FieldSchema};
pub use document::{Document, DocumentId, Entity, Record, ID_FIELD, LEAN_ID_FIELD};
pub use filter::Filter;
pub use options::{
    PaginateOptions, Populate, PopulateDescriptor, PopulateTarget, Select, Sort, DEFAULT_LIMIT,
};
pub use paginate::{paginate, Paginate};
pub use pagination::{PageCount, PageResult, Window};
pub use snowflake::Snowflake;
pub use store::{MemoryQuery, MemoryStore, Model};
pub use store_trait::{DocumentStore, QueryBuilder};
