use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dedup::{DedupKey, IMAGE_URL_FIELD};
use crate::{Error, Result};

/// Untyped document payload. Field order is preserved through a read/insert cycle.
pub type Document = Map<String, Value>;

/// An article as read from a local `.json` file.
///
/// No schema is enforced: unknown fields pass through to the store unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleDocument(Document);

impl ArticleDocument {
    /// Parses a JSON object. Any other top-level value is rejected.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(Error::InvalidDocument(format!(
                "expected a JSON object, found {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns the field unless it is missing or falsy (`null`, `false`, `0`, `""`).
    pub fn truthy_field(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|value| is_truthy(value))
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::for_document(self)
    }

    /// Stamps the image identity used for dedup onto the document.
    pub fn set_image_url(&mut self, image_url: &Value) {
        self.0.insert(IMAGE_URL_FIELD.to_string(), image_url.clone());
    }

    pub fn fields(&self) -> &Document {
        &self.0
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
