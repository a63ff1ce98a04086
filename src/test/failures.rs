use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::data::error::{InvalidFilter, UnknownReference};
use crate::test::setup_library;
use crate::*;

#[derive(Debug)]
struct Boom(&'static str);
impl std::error::Error for Boom {}
impl fmt::Display for Boom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boom: {}", self.0)
    }
}

/// Wraps a model, records which store calls were made and optionally fails them.
#[derive(Clone)]
struct ProbeStore {
    inner: Model,
    fail_count: bool,
    fail_find: bool,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl ProbeStore {
    fn new(inner: Model) -> Self {
        ProbeStore {
            inner,
            fail_count: false,
            fail_find: false,
            calls: Arc::default(),
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

struct ProbeQuery {
    inner: MemoryQuery,
    fail: bool,
}

impl QueryBuilder for ProbeQuery {
    fn select(self, select: Option<Select>) -> Self {
        ProbeQuery { inner: self.inner.select(select), ..self }
    }

    fn sort(self, sort: Option<Sort>) -> Self {
        ProbeQuery { inner: self.inner.sort(sort), ..self }
    }

    fn skip(self, skip: u64) -> Self {
        ProbeQuery { inner: self.inner.skip(skip), ..self }
    }

    fn limit(self, limit: u64) -> Self {
        ProbeQuery { inner: self.inner.limit(limit), ..self }
    }

    fn lean(self, lean: bool) -> Self {
        ProbeQuery { inner: self.inner.lean(lean), ..self }
    }

    fn populate(self, target: PopulateTarget) -> Self {
        ProbeQuery { inner: self.inner.populate(target), ..self }
    }

    fn exec(self) -> impl Future<Output = Result<Vec<Document>>> + Send {
        async move {
            if self.fail {
                return Err(Error::from(Boom("find")));
            }
            self.inner.exec().await
        }
    }
}

impl DocumentStore for ProbeStore {
    type Query = ProbeQuery;

    fn estimated_document_count(&self) -> impl Future<Output = Result<u64>> + Send {
        self.record("estimated_document_count");
        async move {
            if self.fail_count {
                return Err(Error::from(Boom("count")));
            }
            self.inner.estimated_document_count().await
        }
    }

    fn count_documents(&self, filter: &Filter) -> impl Future<Output = Result<u64>> + Send {
        self.record("count_documents");
        let filter = filter.clone();
        async move {
            if self.fail_count {
                return Err(Error::from(Boom("count")));
            }
            self.inner.count_documents(&filter).await
        }
    }

    fn find(&self, filter: &Filter) -> ProbeQuery {
        self.record("find");
        ProbeQuery {
            inner: self.inner.find(filter),
            fail: self.fail_find,
        }
    }
}

#[tokio::test]
async fn test_empty_filter_uses_estimated_count() -> Result<()> {
    let library = setup_library().await?;
    let probe = ProbeStore::new(library.books.clone());

    let result = probe.paginate(Filter::all(), PaginateOptions::new()).await?;
    assert_eq!(result.total, 100);
    assert!(probe.calls().contains(&"estimated_document_count"));
    assert!(!probe.calls().contains(&"count_documents"));

    let probe = ProbeStore::new(library.books.clone());
    let result = probe
        .paginate(Filter::eq("title", "Book #3"), PaginateOptions::new())
        .await?;
    assert_eq!(result.total, 1);
    assert!(probe.calls().contains(&"count_documents"));
    assert!(!probe.calls().contains(&"estimated_document_count"));

    Ok(())
}

#[tokio::test]
async fn test_zero_limit_skips_fetch() -> Result<()> {
    let library = setup_library().await?;
    let probe = ProbeStore::new(library.books.clone());

    let result = probe
        .paginate(Filter::all(), PaginateOptions::new().limit(0))
        .await?;

    assert!(result.docs.is_empty());
    assert_eq!(result.total, 100);
    assert_eq!(probe.calls(), vec!["estimated_document_count"]);

    Ok(())
}

#[tokio::test]
async fn test_count_failure_fails_call() -> Result<()> {
    let library = setup_library().await?;
    let mut probe = ProbeStore::new(library.books.clone());
    probe.fail_count = true;

    let err = probe
        .paginate(Filter::all(), PaginateOptions::new())
        .await
        .unwrap_err();

    let boom = err.downcast_ref::<Boom>().expect("store error passed through");
    assert_eq!(boom.0, "count");

    Ok(())
}

#[tokio::test]
async fn test_find_failure_fails_call() -> Result<()> {
    let library = setup_library().await?;
    let mut probe = ProbeStore::new(library.books.clone());
    probe.fail_find = true;

    let err = probe
        .paginate(Filter::eq("title", "Book #3"), PaginateOptions::new())
        .await
        .unwrap_err();

    let boom = err.downcast_ref::<Boom>().expect("store error passed through");
    assert_eq!(boom.0, "find");

    Ok(())
}

#[tokio::test]
async fn test_find_failure_ignored_when_nothing_fetched() -> Result<()> {
    let library = setup_library().await?;
    let mut probe = ProbeStore::new(library.books.clone());
    probe.fail_find = true;

    let result = probe
        .paginate(Filter::all(), PaginateOptions::new().limit(0))
        .await?;
    assert_eq!(result.total, 100);

    Ok(())
}

#[tokio::test]
async fn test_invalid_filter_is_rejected_by_store() -> Result<()> {
    let library = setup_library().await?;

    let err = library
        .books
        .paginate(json!({ "date": { "$near": 3 } }), PaginateOptions::new())
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<InvalidFilter>().is_some());

    let err = library
        .books
        .paginate(json!("title"), PaginateOptions::new())
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<InvalidFilter>().is_some());

    Ok(())
}

#[tokio::test]
async fn test_unknown_populate_path_is_rejected_by_store() -> Result<()> {
    let library = setup_library().await?;

    let err = library
        .books
        .paginate(Filter::all(), PaginateOptions::new().populate("publisher"))
        .await
        .unwrap_err();

    let unknown = err.downcast_ref::<UnknownReference>().expect("populate error passed through");
    assert_eq!(unknown.path, "publisher");
    assert_eq!(unknown.collection, "books");

    Ok(())
}
