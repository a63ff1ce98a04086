mod failures;

use serde_json::{json, Map, Value};

use crate::*;

pub const AUTHOR_NAME: &str = "Arthur Conan Doyle";

pub struct Library {
    pub store: MemoryStore,
    pub books: Model,
    pub authors: Model,
    pub author_id: Value,
}

/// 100 books by one author, `Book #1` through `Book #100`, dated in title order.
pub async fn setup_library() -> Result<Library> {
    let store = MemoryStore::new();

    let authors = store.create_collection(CollectionSchema::new("authors")).await?;
    let books = store
        .create_collection(CollectionSchema::new("books").reference("author", "authors"))
        .await?;

    let author_id = authors.insert_one(json!({ "name": AUTHOR_NAME })).await?;

    let base = 1_700_000_000_000i64;
    let seeded: Vec<Value> = (0..100)
        .map(|i| {
            json!({
                "title": format!("Book #{}", i + 1),
                "date": base + i,
                "author": author_id.clone(),
            })
        })
        .collect();
    books.insert_many(seeded).await?;

    Ok(Library {
        store,
        books,
        authors,
        author_id,
    })
}

pub fn spec(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

pub fn title(doc: &Document) -> &str {
    doc.get("title").and_then(Value::as_str).unwrap_or_default()
}
