use serde_json::Value;
use std::fmt;

use crate::types::ArticleDocument;

pub const IMAGE_URL_FIELD: &str = "imageUrl";
pub const TITLE_FIELD: &str = "title";
pub const ARTICLE_URL_FIELD: &str = "articleUrl";

/// Fields that identify an article by its image, highest priority first.
const IMAGE_FIELDS: [&str; 3] = ["image", IMAGE_URL_FIELD, "url"];

/// The value(s) deciding whether a document is already in the store.
///
/// Values are kept as JSON so a non-string image or title filters on exactly what the
/// file holds.
#[derive(Debug, Clone, PartialEq)]
pub enum DedupKey {
    /// Match on the stored `imageUrl` field.
    ImageUrl(Value),
    /// Match on `title` and `articleUrl` together. `None` matches a null or missing field.
    TitleAndUrl {
        title: Option<Value>,
        article_url: Option<Value>,
    },
}

impl DedupKey {
    pub fn for_document(doc: &ArticleDocument) -> Self {
        if let Some(image_url) = IMAGE_FIELDS.iter().find_map(|f| doc.truthy_field(f)) {
            return Self::ImageUrl(image_url.clone());
        }

        Self::TitleAndUrl {
            title: doc.truthy_field(TITLE_FIELD).cloned(),
            article_url: doc
                .truthy_field(ARTICLE_URL_FIELD)
                .or_else(|| doc.truthy_field("url"))
                .cloned(),
        }
    }

    pub fn image_url(&self) -> Option<&Value> {
        match self {
            Self::ImageUrl(url) => Some(url),
            Self::TitleAndUrl { .. } => None,
        }
    }

    /// True for a fallback key with neither a title nor an article url. Every such
    /// document matches every other one.
    pub fn is_unidentified(&self) -> bool {
        matches!(
            self,
            Self::TitleAndUrl {
                title: None,
                article_url: None
            }
        )
    }

    /// Short reason used when reporting a duplicate.
    pub fn match_reason(&self) -> &'static str {
        match self {
            Self::ImageUrl(_) => "matching imageUrl",
            Self::TitleAndUrl { .. } => "matching title+url",
        }
    }
}

struct KeyPart<'a>(Option<&'a Value>);

impl fmt::Display for KeyPart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(Value::String(s)) => f.write_str(s),
            Some(other) => write!(f, "{}", other),
            None => f.write_str("null"),
        }
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageUrl(url) => write!(f, "imageUrl={}", KeyPart(Some(url))),
            Self::TitleAndUrl { title, article_url } => write!(
                f,
                "title={} articleUrl={}",
                KeyPart(title.as_ref()),
                KeyPart(article_url.as_ref())
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(raw: &str) -> DedupKey {
        ArticleDocument::from_json_str(raw).unwrap().dedup_key()
    }

    #[test]
    fn test_image_fields_priority() {
        assert_eq!(
            key(r#"{"image": "a.png", "imageUrl": "b.png", "url": "c.png"}"#),
            DedupKey::ImageUrl(json!("a.png"))
        );
        assert_eq!(
            key(r#"{"imageUrl": "b.png", "url": "c.png"}"#),
            DedupKey::ImageUrl(json!("b.png"))
        );
        assert_eq!(key(r#"{"url": "c.png"}"#), DedupKey::ImageUrl(json!("c.png")));
    }

    #[test]
    fn test_falsy_image_fields_are_skipped() {
        assert_eq!(
            key(r#"{"image": null, "imageUrl": "", "url": "c.png"}"#),
            DedupKey::ImageUrl(json!("c.png"))
        );
        assert_eq!(
            key(r#"{"image": 0, "imageUrl": false, "url": "c.png"}"#),
            DedupKey::ImageUrl(json!("c.png"))
        );
    }

    #[test]
    fn test_non_string_image_is_kept_as_is() {
        let k = key(r#"{"title": "Gallery", "image": 7}"#);
        assert_eq!(k, DedupKey::ImageUrl(json!(7)));
        assert_eq!(k.image_url(), Some(&json!(7)));
        assert_eq!(k.to_string(), "imageUrl=7");
    }

    #[test]
    fn test_fallback_to_title_and_article_url() {
        assert_eq!(
            key(r#"{"title": "Budget vote", "articleUrl": "https://news.example/budget"}"#),
            DedupKey::TitleAndUrl {
                title: Some(json!("Budget vote")),
                article_url: Some(json!("https://news.example/budget")),
            }
        );
    }

    #[test]
    fn test_fallback_keeps_non_string_title() {
        let k = key(r#"{"title": 42, "articleUrl": ""}"#);
        assert_eq!(
            k,
            DedupKey::TitleAndUrl {
                title: Some(json!(42)),
                article_url: None,
            }
        );
        assert_eq!(k.to_string(), "title=42 articleUrl=null");
    }

    #[test]
    fn test_fallback_with_missing_fields() {
        let k = key(r#"{"title": "Only a title"}"#);
        assert_eq!(
            k,
            DedupKey::TitleAndUrl {
                title: Some(json!("Only a title")),
                article_url: None,
            }
        );
        assert!(!k.is_unidentified());

        let k = key(r#"{"body": "no identity at all", "title": false}"#);
        assert!(k.is_unidentified());
        assert_eq!(k.to_string(), "title=null articleUrl=null");
    }

    #[test]
    fn test_image_url_accessor_and_reason() {
        let k = key(r#"{"image": "x.jpg"}"#);
        assert_eq!(k.image_url(), Some(&json!("x.jpg")));
        assert_eq!(k.match_reason(), "matching imageUrl");

        let k = key(r#"{"title": "t"}"#);
        assert_eq!(k.image_url(), None);
        assert_eq!(k.match_reason(), "matching title+url");
    }
}
