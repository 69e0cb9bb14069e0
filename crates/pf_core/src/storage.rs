use async_trait::async_trait;
use tracing::debug;

use crate::dedup::DedupKey;
use crate::types::{ArticleDocument, Document};
use crate::Result;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Ensure an ascending index exists on `field`
    async fn ensure_index(&self, field: &str) -> Result<()>;

    /// Find one stored document matching the dedup key
    async fn find_duplicate(&self, key: &DedupKey) -> Result<Option<Document>>;

    /// Insert a new document and return its identifier
    async fn insert(&self, document: &ArticleDocument) -> Result<String>;

    /// Release the underlying connection
    async fn close(&self) -> Result<()>;
}

/// Outcome of an operation whose failure is deliberately discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffort {
    Done,
    Skipped,
    Discarded(String),
}

impl BestEffort {
    pub fn from_result<T, E: std::fmt::Display>(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::Done,
            Err(e) => Self::Discarded(e.to_string()),
        }
    }

    /// Logs a discarded failure at debug level and drops it.
    pub fn discard(self, what: &str) {
        if let Self::Discarded(reason) = self {
            debug!("ignored failure ({}): {}", what, reason);
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}
