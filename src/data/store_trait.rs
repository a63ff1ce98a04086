use std::future::Future;

use crate::{Document, Filter, PaginateOptions, PopulateTarget, Result, Select, Sort};

/// A find query under construction.
///
/// Every configuration step consumes and returns the builder; `exec` runs it.
pub trait QueryBuilder: Sized + Send {
    fn select(self, select: Option<Select>) -> Self;

    fn sort(self, sort: Option<Sort>) -> Self;

    fn skip(self, skip: u64) -> Self;

    fn limit(self, limit: u64) -> Self;

    /// Return plain records instead of model documents.
    fn lean(self, lean: bool) -> Self;

    /// Replace a reference with the document it points to.
    fn populate(self, target: PopulateTarget) -> Self;

    fn exec(self) -> impl Future<Output = Result<Vec<Document>>> + Send;
}

/// Per-collection handle onto a document store.
///
/// This is what pagination consumes; implementations own query planning,
/// storage and any network access.
pub trait DocumentStore {
    type Query: QueryBuilder;

    /// Total number of documents in the collection, possibly from metadata.
    fn estimated_document_count(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Number of documents matching `filter`.
    fn count_documents(&self, filter: &Filter) -> impl Future<Output = Result<u64>> + Send;

    fn find(&self, filter: &Filter) -> Self::Query;

    /// Pagination defaults configured for this collection.
    ///
    /// Consulted once per call, underneath the call-site options.
    fn paginate_defaults(&self) -> PaginateOptions {
        PaginateOptions::default()
    }
}
