use async_trait::async_trait;
use mongodb::bson::{self, doc, Bson, Document as BsonDocument};
use mongodb::{Client, Collection, IndexModel};
use pf_core::dedup::{ARTICLE_URL_FIELD, IMAGE_URL_FIELD, TITLE_FIELD};
use pf_core::{ArticleDocument, DedupKey, Document, DocumentStore, Error, Result, StoreConfig};
use serde_json::Value;
use tracing::debug;

fn storage_error(context: &'static str) -> impl FnOnce(mongodb::error::Error) -> Error {
    move |e| Error::Storage(format!("{}: {}", context, e))
}

/// Builds the lookup filter for a dedup key. An absent key part filters on null, which
/// the server also matches against missing fields.
pub fn dedup_filter(key: &DedupKey) -> Result<BsonDocument> {
    let filter = match key {
        DedupKey::ImageUrl(url) => {
            let url = to_bson(url)?;
            doc! { IMAGE_URL_FIELD: url }
        }
        DedupKey::TitleAndUrl { title, article_url } => {
            let title = optional(title.as_ref())?;
            let article_url = optional(article_url.as_ref())?;
            doc! { TITLE_FIELD: title, ARTICLE_URL_FIELD: article_url }
        }
    };
    Ok(filter)
}

fn to_bson(value: &Value) -> Result<Bson> {
    bson::to_bson(value).map_err(|e| Error::Storage(format!("Failed to encode key: {}", e)))
}

fn optional(value: Option<&Value>) -> Result<Bson> {
    value.map_or(Ok(Bson::Null), to_bson)
}

fn inserted_id(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

pub struct MongoStorage {
    client: Client,
    collection: Collection<BsonDocument>,
}

impl MongoStorage {
    /// Opens a client and round-trips a `ping` so an unreachable server fails here
    /// rather than on the first lookup.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let url = config.url()?;
        let database = config.database()?;

        let client = Client::with_uri_str(url)
            .await
            .map_err(storage_error("Failed to parse connection string"))?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(storage_error("Failed to connect to MongoDB"))?;
        debug!("connected to database {}", database);

        Ok(Self {
            collection: db.collection(config.collection()),
            client,
        })
    }
}

#[async_trait]
impl DocumentStore for MongoStorage {
    async fn ensure_index(&self, field: &str) -> Result<()> {
        let index = IndexModel::builder().keys(doc! { field: 1 }).build();
        self.collection
            .create_index(index)
            .await
            .map_err(storage_error("Failed to create index"))?;
        Ok(())
    }

    async fn find_duplicate(&self, key: &DedupKey) -> Result<Option<Document>> {
        let found = self
            .collection
            .find_one(dedup_filter(key)?)
            .await
            .map_err(storage_error("Failed to look up article"))?;

        Ok(found.and_then(|d| match Bson::Document(d).into_relaxed_extjson() {
            Value::Object(fields) => Some(fields),
            _ => None,
        }))
    }

    async fn insert(&self, document: &ArticleDocument) -> Result<String> {
        let record = bson::to_document(document.fields())
            .map_err(|e| Error::Storage(format!("Failed to encode article: {}", e)))?;
        let result = self
            .collection
            .insert_one(record)
            .await
            .map_err(storage_error("Failed to insert article"))?;
        Ok(inserted_id(result.inserted_id))
    }

    async fn close(&self) -> Result<()> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}
