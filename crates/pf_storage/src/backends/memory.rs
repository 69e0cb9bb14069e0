use async_trait::async_trait;
use pf_core::dedup::{ARTICLE_URL_FIELD, IMAGE_URL_FIELD, TITLE_FIELD};
use pf_core::{ArticleDocument, DedupKey, Document, DocumentStore, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

const ID_FIELD: &str = "_id";

#[derive(Default)]
pub struct MemoryStore {
    documents: Vec<Document>,
    indexes: BTreeSet<String>,
    closed: bool,
}

impl MemoryStore {
    pub fn insert(&mut self, document: &ArticleDocument) -> String {
        let id = Uuid::new_v4().to_string();
        let mut stored = document.fields().clone();
        stored.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        self.documents.push(stored);
        id
    }

    pub fn find_duplicate(&self, key: &DedupKey) -> Option<Document> {
        self.documents.iter().find(|doc| matches_key(doc, key)).cloned()
    }
}

/// Equality semantics of a document-store filter: an expected null also matches a
/// missing field, and numbers compare by value whatever their representation.
fn field_matches(doc: &Document, field: &str, expected: Option<&Value>) -> bool {
    match (doc.get(field), expected) {
        (None | Some(Value::Null), None) => true,
        (Some(Value::Number(actual)), Some(Value::Number(expected))) => {
            actual.as_f64() == expected.as_f64()
        }
        (Some(actual), Some(expected)) => actual == expected,
        _ => false,
    }
}

fn matches_key(doc: &Document, key: &DedupKey) -> bool {
    match key {
        DedupKey::ImageUrl(url) => field_matches(doc, IMAGE_URL_FIELD, Some(url)),
        DedupKey::TitleAndUrl { title, article_url } => {
            field_matches(doc, TITLE_FIELD, title.as_ref())
                && field_matches(doc, ARTICLE_URL_FIELD, article_url.as_ref())
        }
    }
}

/// Process-local store with the same matching rules as the MongoDB backend.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn documents(&self) -> Vec<Document> {
        self.store.read().await.documents.clone()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn has_index(&self, field: &str) -> bool {
        self.store.read().await.indexes.contains(field)
    }

    pub async fn is_closed(&self) -> bool {
        self.store.read().await.closed
    }
}

#[async_trait]
impl DocumentStore for InMemoryStorage {
    async fn ensure_index(&self, field: &str) -> Result<()> {
        self.store.write().await.indexes.insert(field.to_string());
        Ok(())
    }

    async fn find_duplicate(&self, key: &DedupKey) -> Result<Option<Document>> {
        Ok(self.store.read().await.find_duplicate(key))
    }

    async fn insert(&self, document: &ArticleDocument) -> Result<String> {
        Ok(self.store.write().await.insert(document))
    }

    async fn close(&self) -> Result<()> {
        self.store.write().await.closed = true;
        Ok(())
    }
}
