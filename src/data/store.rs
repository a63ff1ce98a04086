use std::future::Future;
use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, trace};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::data::collection_schema::CollectionSchema;
use crate::data::error::{CollectionExists, CollectionNotFound, InvalidDocument, UnknownReference};
use crate::data::matcher::{matches, values_equal};
use crate::data::projection::{Projection, SortKeys};
use crate::{
    Document, DocumentStore, Entity, Filter, PaginateOptions, PopulateTarget, QueryBuilder,
    Record, Result, Select, Snowflake, Sort, ID_FIELD,
};

type Collections = AHashMap<String, Collection>;

struct Collection {
    schema: CollectionSchema,
    records: Vec<Record>,
}

/// In-process document store.
///
/// Collections keep records in insertion order. Cloning the store yields
/// another handle onto the same collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
    snowflake: Arc<Snowflake>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snowflake(snowflake: Arc<Snowflake>) -> Self {
        MemoryStore {
            collections: Arc::default(),
            snowflake,
        }
    }

    pub async fn create_collection(&self, schema: CollectionSchema) -> Result<Model> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(&schema.name) {
            return Err(CollectionExists(schema.name).into());
        }

        let name = schema.name.clone();
        collections.insert(
            name.clone(),
            Collection {
                schema,
                records: Vec::new(),
            },
        );
        debug!("created collection {}", name);

        Ok(self.model(name))
    }

    /// Handle onto a collection. The collection does not have to exist yet;
    /// operations on a missing collection fail with `CollectionNotFound`.
    pub fn model(&self, name: impl Into<String>) -> Model {
        Model {
            name: name.into(),
            store: self.clone(),
            defaults: PaginateOptions::default(),
        }
    }

    pub async fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

fn collection<'a>(collections: &'a Collections, name: &str) -> Result<&'a Collection> {
    collections
        .get(name)
        .ok_or_else(|| CollectionNotFound(name.to_string()).into())
}

/// A handle onto one collection of a [`MemoryStore`].
#[derive(Clone)]
pub struct Model {
    name: String,
    store: MemoryStore,
    defaults: PaginateOptions,
}

impl Model {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pagination defaults applied underneath every call on this handle.
    pub fn with_paginate_defaults(mut self, defaults: PaginateOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub async fn insert_one(&self, doc: Value) -> Result<Value> {
        let mut ids = self.insert_many(vec![doc]).await?;
        ids.pop()
            .ok_or_else(|| InvalidDocument("nothing inserted".to_string()).into())
    }

    /// Inserts all documents or none, returning their `_id`s in order.
    ///
    /// Documents without `_id` get a generated one.
    pub async fn insert_many(&self, docs: Vec<Value>) -> Result<Vec<Value>> {
        let mut records = Vec::with_capacity(docs.len());
        for doc in docs {
            match doc {
                Value::Object(mut record) => {
                    if !record.contains_key(ID_FIELD) {
                        record.insert(ID_FIELD.to_string(), self.store.snowflake.generate().into());
                    }
                    records.push(record);
                }
                other => {
                    return Err(InvalidDocument(format!("expected an object, got {}", other)).into());
                }
            }
        }

        let mut collections = self.store.collections.write().await;
        let target = collections
            .get_mut(&self.name)
            .ok_or_else(|| CollectionNotFound(self.name.clone()))?;

        let ids = records
            .iter()
            .map(|record| record.get(ID_FIELD).cloned().unwrap_or(Value::Null))
            .collect();
        trace!("inserting {} documents into {}", records.len(), self.name);
        target.records.extend(records);

        Ok(ids)
    }

    fn count_matching(&self, collections: &Collections, filter: &Filter) -> Result<u64> {
        let collection = collection(collections, &self.name)?;
        let mut total = 0;
        for record in &collection.records {
            if matches(record, filter.as_value())? {
                total += 1;
            }
        }
        Ok(total)
    }
}

impl DocumentStore for Model {
    type Query = MemoryQuery;

    fn estimated_document_count(&self) -> impl Future<Output = Result<u64>> + Send {
        async move {
            let collections = self.store.collections.read().await;
            collection(&collections, &self.name).map(|c| c.records.len() as u64)
        }
    }

    fn count_documents(&self, filter: &Filter) -> impl Future<Output = Result<u64>> + Send {
        let filter = filter.clone();
        async move {
            let collections = self.store.collections.read().await;
            self.count_matching(&collections, &filter)
        }
    }

    fn find(&self, filter: &Filter) -> MemoryQuery {
        MemoryQuery {
            store: self.store.clone(),
            collection: self.name.clone(),
            filter: filter.clone(),
            select: None,
            sort: None,
            skip: 0,
            limit: None,
            lean: false,
            populate: Vec::new(),
        }
    }

    fn paginate_defaults(&self) -> PaginateOptions {
        self.defaults.clone()
    }
}

/// A find query against a [`MemoryStore`] collection.
///
/// Matching, ordering, skip and limit run first; projection and populate are
/// applied to the surviving records.
pub struct MemoryQuery {
    store: MemoryStore,
    collection: String,
    filter: Filter,
    select: Option<Select>,
    sort: Option<Sort>,
    skip: u64,
    limit: Option<u64>,
    lean: bool,
    populate: Vec<PopulateTarget>,
}

impl MemoryQuery {
    fn run(&self, collections: &Collections) -> Result<Vec<Document>> {
        let source = collection(collections, &self.collection)?;
        let projection = match &self.select {
            Some(select) => Projection::parse(select)?,
            None => None,
        };
        let sort = match &self.sort {
            Some(sort) => SortKeys::parse(sort)?,
            None => SortKeys::default(),
        };

        let mut matched = Vec::new();
        for record in &source.records {
            if matches(record, self.filter.as_value())? {
                matched.push(record);
            }
        }
        if !sort.is_empty() {
            matched.sort_by(|a, b| sort.compare(a, b));
        }

        let total_matched = matched.len();
        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        // Zero means no limit, like the wire protocol.
        let limit = match self.limit {
            None | Some(0) => usize::MAX,
            Some(limit) => usize::try_from(limit).unwrap_or(usize::MAX),
        };

        let mut docs = Vec::new();
        for record in matched.into_iter().skip(skip).take(limit) {
            let mut record = match &projection {
                Some(projection) => projection.apply(record),
                None => record.clone(),
            };
            for target in &self.populate {
                populate(collections, &source.schema, &mut record, target)?;
            }
            docs.push(if self.lean {
                Document::Lean(record)
            } else {
                Document::Model(Entity::from_record(record))
            });
        }

        trace!(
            "find on {}: {} matched, {} returned (skip {}, lean {})",
            self.collection,
            total_matched,
            docs.len(),
            self.skip,
            self.lean
        );
        Ok(docs)
    }
}

impl QueryBuilder for MemoryQuery {
    fn select(mut self, select: Option<Select>) -> Self {
        self.select = select;
        self
    }

    fn sort(mut self, sort: Option<Sort>) -> Self {
        self.sort = sort;
        self
    }

    fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn lean(mut self, lean: bool) -> Self {
        self.lean = lean;
        self
    }

    fn populate(mut self, target: PopulateTarget) -> Self {
        self.populate.push(target);
        self
    }

    fn exec(self) -> impl Future<Output = Result<Vec<Document>>> + Send {
        async move {
            let collections = self.store.collections.read().await;
            self.run(&collections)
        }
    }
}

fn populate(
    collections: &Collections,
    schema: &CollectionSchema,
    record: &mut Record,
    target: &PopulateTarget,
) -> Result<()> {
    let (path, select, model) = match target {
        PopulateTarget::Path(path) => (path.as_str(), None, None),
        PopulateTarget::Descriptor(descriptor) => (
            descriptor.path.as_str(),
            descriptor.select.as_ref(),
            descriptor.model.as_deref(),
        ),
    };

    let Some(target_name) = model.or_else(|| schema.reference_target(path)) else {
        return Err(UnknownReference {
            collection: schema.name.clone(),
            path: path.to_string(),
        }
        .into());
    };
    let referenced = collection(collections, target_name)?;
    let projection = match select {
        Some(select) => Projection::parse(select)?,
        None => None,
    };

    let Some(slot) = lookup_mut(record, path) else {
        return Ok(());
    };

    let resolve = |id: &Value| -> Value {
        referenced
            .records
            .iter()
            .find(|candidate| candidate.get(ID_FIELD).is_some_and(|v| values_equal(v, id)))
            .map(|found| match &projection {
                Some(projection) => Value::Object(projection.apply(found)),
                None => Value::Object(found.clone()),
            })
            .unwrap_or(Value::Null)
    };

    let populated = match &*slot {
        Value::Null => Value::Null,
        Value::Array(ids) => Value::Array(ids.iter().map(resolve).collect()),
        id => resolve(id),
    };
    *slot = populated;

    Ok(())
}

fn lookup_mut<'a>(record: &'a mut Record, path: &str) -> Option<&'a mut Value> {
    let mut segments = path.split('.');
    let mut current = record.get_mut(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get_mut(segment)?,
            _ => return None,
        };
    }
    Some(current)
}
