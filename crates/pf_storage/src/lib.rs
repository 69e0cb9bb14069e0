use pf_core::{DocumentStore, Result, StoreConfig};
use std::sync::Arc;

pub mod backends;

pub use backends::*;

/// Opens the document store named in `config`.
#[cfg(feature = "mongodb")]
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    let storage = MongoStorage::connect(config).await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "mongodb"))]
pub async fn connect(_config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    Err(pf_core::Error::Config(
        "no document store backend compiled in (enable the `mongodb` feature)".into(),
    ))
}
