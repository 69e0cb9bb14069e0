pub mod config;
pub mod dedup;
pub mod error;
pub mod storage;
pub mod types;

pub use config::{StoreConfig, SyncConfig, ARTICLES_COLLECTION};
pub use dedup::DedupKey;
pub use error::Error;
pub use storage::{BestEffort, DocumentStore};
pub use types::{ArticleDocument, Document};

pub use error::Result;
