use std::future::Future;

use futures_util::future::try_join;
use log::debug;

use crate::data::options::DEFAULT_LIMIT;
use crate::data::pagination::Window;
use crate::{
    Document, DocumentStore, Filter, PageResult, PaginateOptions, Populate, QueryBuilder, Result,
};

/// Paginates `filter` over `model`.
///
/// `options` is layered over the model's pagination defaults. The total count
/// and the page fetch are issued together and both must succeed; the first
/// store error is returned as is.
pub async fn paginate<M>(model: &M, filter: Filter, options: PaginateOptions) -> Result<PageResult>
where
    M: DocumentStore + ?Sized,
{
    let options = model.paginate_defaults().merge(options);

    let lean = options.lean.unwrap_or(false);
    let lean_with_id = options.lean_with_id.unwrap_or(true);
    let limit = options.limit.unwrap_or(DEFAULT_LIMIT);
    let window = Window::resolve(options.offset, options.page, limit);

    debug!(
        "paginate: skip={} limit={} offset={:?} page={:?} estimated_count={}",
        window.skip,
        limit,
        window.offset,
        window.page,
        filter.is_empty()
    );

    let fetch = FetchPlan {
        options,
        skip: window.skip,
        limit,
        lean,
        lean_with_id,
    };

    let (docs, total) = try_join(fetch_docs(model, &filter, fetch), count_docs(model, &filter)).await?;

    Ok(PageResult::new(docs, total, limit, &window))
}

struct FetchPlan {
    options: PaginateOptions,
    skip: u64,
    limit: u64,
    lean: bool,
    lean_with_id: bool,
}

async fn count_docs<M>(model: &M, filter: &Filter) -> Result<u64>
where
    M: DocumentStore + ?Sized,
{
    if filter.is_empty() {
        model.estimated_document_count().await
    } else {
        model.count_documents(filter).await
    }
}

async fn fetch_docs<M>(model: &M, filter: &Filter, plan: FetchPlan) -> Result<Vec<Document>>
where
    M: DocumentStore + ?Sized,
{
    if plan.limit == 0 {
        return Ok(Vec::new());
    }

    let mut query = model
        .find(filter)
        .select(plan.options.select)
        .sort(plan.options.sort)
        .skip(plan.skip)
        .limit(plan.limit)
        .lean(plan.lean);

    for target in plan.options.populate.map(Populate::into_targets).unwrap_or_default() {
        query = query.populate(target);
    }

    let mut docs = query.exec().await?;

    if plan.lean && plan.lean_with_id {
        docs.iter_mut().for_each(Document::attach_lean_id);
    }

    Ok(docs)
}

/// Adds `paginate` to every document store handle.
pub trait Paginate: DocumentStore + Sync {
    fn paginate(
        &self,
        filter: impl Into<Filter>,
        options: PaginateOptions,
    ) -> impl Future<Output = Result<PageResult>> + Send {
        paginate(self, filter.into(), options)
    }
}

impl<M: DocumentStore + Sync + ?Sized> Paginate for M {}
