use pf_core::dedup::IMAGE_URL_FIELD;
use pf_core::{ArticleDocument, BestEffort, DedupKey, DocumentStore, Result, StoreConfig, SyncConfig};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::files::{display_name, remove_article_files, scan_articles, ArticleScan};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SyncReport {
    pub fn processed(&self) -> usize {
        self.inserted + self.skipped + self.failed
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} skipped, {} failed",
            self.inserted, self.skipped, self.failed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Inserted { id: String },
    Skipped { reason: &'static str },
}

/// A candidate file and the key it would be deduplicated on.
#[derive(Debug)]
pub struct PendingArticle {
    pub path: PathBuf,
    pub key: Result<DedupKey>,
}

pub struct SyncJob {
    config: SyncConfig,
}

impl SyncJob {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Uploads every pending article.
    ///
    /// `connect` is only called once there is something to upload; its failure is the
    /// only error this returns. Per-file failures are logged and counted.
    pub async fn run<F, Fut>(&self, connect: F) -> Result<SyncReport>
    where
        F: FnOnce(StoreConfig) -> Fut,
        Fut: Future<Output = Result<Arc<dyn DocumentStore>>>,
    {
        let Some(files) = self.candidate_files().await? else {
            return Ok(SyncReport::default());
        };

        let store = connect(self.config.store.clone()).await?;
        info!("💾 Connected to document store, {} file(s) to process", files.len());

        let report = sync_files(store.as_ref(), &files).await;
        BestEffort::from_result(store.close().await).discard("closing document store");

        info!("✅ Upload finished: {}", report);
        Ok(report)
    }

    /// Lists pending articles with their dedup keys without touching the store.
    pub async fn pending(&self) -> Result<Vec<PendingArticle>> {
        let Some(files) = self.candidate_files().await? else {
            return Ok(Vec::new());
        };

        let mut pending = Vec::with_capacity(files.len());
        for path in files {
            let key = read_article(&path).await.map(|doc| doc.dedup_key());
            pending.push(PendingArticle { path, key });
        }
        Ok(pending)
    }

    async fn candidate_files(&self) -> Result<Option<Vec<PathBuf>>> {
        let dir = &self.config.articles_dir;
        match scan_articles(dir).await? {
            ArticleScan::Missing => {
                info!("No articles directory found at {}, nothing to upload.", dir.display());
                Ok(None)
            }
            ArticleScan::Empty => {
                info!("No JSON files to upload in {}.", dir.display());
                Ok(None)
            }
            ArticleScan::Files(files) => Ok(Some(files)),
        }
    }
}

/// Processes files one at a time. A failing file never stops the batch.
pub async fn sync_files(store: &dyn DocumentStore, files: &[PathBuf]) -> SyncReport {
    let mut report = SyncReport::default();
    for path in files {
        match sync_file(store, path).await {
            Ok(FileOutcome::Inserted { .. }) => report.inserted += 1,
            Ok(FileOutcome::Skipped { .. }) => report.skipped += 1,
            Err(e) => {
                error!("❌ Failed to process {}: {}", display_name(path), e);
                report.failed += 1;
            }
        }
    }
    report
}

async fn read_article(path: &Path) -> Result<ArticleDocument> {
    let raw = tokio::fs::read_to_string(path).await?;
    ArticleDocument::from_json_str(&raw)
}

pub async fn sync_file(store: &dyn DocumentStore, path: &Path) -> Result<FileOutcome> {
    let name = display_name(path);
    let mut article = read_article(path).await?;
    let key = article.dedup_key();

    BestEffort::from_result(store.ensure_index(IMAGE_URL_FIELD).await)
        .discard("ensuring imageUrl index");

    let existing = match &key {
        DedupKey::ImageUrl(_) => store.find_duplicate(&key).await?,
        DedupKey::TitleAndUrl { .. } => {
            if key.is_unidentified() {
                warn!(
                    "⚠️ {} has no image, title or url; it matches any other article without them",
                    name
                );
            }
            store.find_duplicate(&key).await.unwrap_or_else(|e| {
                debug!("lookup by title+url failed for {}, treating as new: {}", name, e);
                None
            })
        }
    };

    if existing.is_some() {
        let reason = key.match_reason();
        info!("⏭️ Skipped duplicate {} ({})", name, reason);
        remove_article_files(path).await.discard();
        return Ok(FileOutcome::Skipped { reason });
    }

    if let Some(image_url) = key.image_url() {
        article.set_image_url(image_url);
    }
    let id = store.insert(&article).await?;
    info!("🆕 Inserted {} -> _id={}", name, id);
    remove_article_files(path).await.discard();

    Ok(FileOutcome::Inserted { id })
}
