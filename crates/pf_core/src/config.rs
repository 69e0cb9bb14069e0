use std::path::PathBuf;

use crate::{Error, Result};

/// Collection every article is written to.
pub const ARTICLES_COLLECTION: &str = "Articles";

/// Connection parameters for the document store.
///
/// Both values stay optional until a connection is actually needed, so a run with
/// nothing to upload succeeds without any store configuration.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub url: Option<String>,
    pub database: Option<String>,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            database: Some(database.into()),
        }
    }

    pub fn url(&self) -> Result<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::Config("store connection URI is not set (MONGOURL_ENV)".into()))
    }

    pub fn database(&self) -> Result<&str> {
        self.database
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| Error::Config("database name is not set (BLOGNAME)".into()))
    }

    pub fn collection(&self) -> &'static str {
        ARTICLES_COLLECTION
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub articles_dir: PathBuf,
    pub store: StoreConfig,
}

impl SyncConfig {
    pub fn new(articles_dir: impl Into<PathBuf>, store: StoreConfig) -> Self {
        Self {
            articles_dir: articles_dir.into(),
            store,
        }
    }
}
