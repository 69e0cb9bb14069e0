use pf_core::{BestEffort, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What the articles directory holds at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleScan {
    Missing,
    Empty,
    Files(Vec<PathBuf>),
}

const JSON_SUFFIX: &str = ".json";

/// Matches on the whole file name, so a file called just `.json` counts too.
pub fn is_json_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .is_some_and(|name| name.ends_with(JSON_SUFFIX))
}

/// `<name>.json` -> `<name>.txt`, whatever the case of the original extension.
pub fn sibling_text_file(path: &Path) -> PathBuf {
    let stem = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| name.to_lowercase().ends_with(JSON_SUFFIX))
        .map(|name| &name[..name.len() - JSON_SUFFIX.len()]);

    match stem {
        Some(stem) => path.with_file_name(format!("{}.txt", stem)),
        None => path.with_extension("txt"),
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Lists the `.json` files in `dir`, sorted by file name.
pub async fn scan_articles(dir: &Path) -> Result<ArticleScan> {
    if !tokio::fs::try_exists(dir).await? {
        return Ok(ArticleScan::Missing);
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_json_file(&path) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Ok(ArticleScan::Empty);
    }
    files.sort_by_key(|path| path.file_name().map(|name| name.to_os_string()));
    Ok(ArticleScan::Files(files))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cleanup {
    pub json: BestEffort,
    pub text: BestEffort,
}

impl Cleanup {
    pub fn discard(self) {
        self.json.discard("removing article json");
        self.text.discard("removing article txt");
    }
}

/// Removes a processed `.json` file and its `.txt` sibling. Neither failure is fatal;
/// a missing sibling is the common case and is reported as skipped.
pub async fn remove_article_files(json_path: &Path) -> Cleanup {
    let json = BestEffort::from_result(tokio::fs::remove_file(json_path).await);
    let text = match tokio::fs::remove_file(sibling_text_file(json_path)).await {
        Err(e) if e.kind() == ErrorKind::NotFound => BestEffort::Skipped,
        result => BestEffort::from_result(result),
    };
    Cleanup { json, text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_json_extension_is_case_insensitive() {
        assert!(is_json_file(Path::new("articles/a.json")));
        assert!(is_json_file(Path::new("articles/B.JSON")));
        assert!(is_json_file(Path::new("articles/c.Json")));
        assert!(is_json_file(Path::new("articles/.json")));
        assert!(is_json_file(Path::new("articles/.JSON")));
        assert!(!is_json_file(Path::new("articles/c.txt")));
        assert!(!is_json_file(Path::new("articles/json")));
        assert!(!is_json_file(Path::new("articles/c.json.bak")));
    }

    #[test]
    fn test_sibling_text_file() {
        assert_eq!(
            sibling_text_file(Path::new("articles/storm.JSON")),
            PathBuf::from("articles/storm.txt")
        );
        assert_eq!(
            sibling_text_file(Path::new("articles/v1.2.json")),
            PathBuf::from("articles/v1.2.txt")
        );
        assert_eq!(
            sibling_text_file(Path::new("articles/.json")),
            PathBuf::from("articles/.txt")
        );
    }

    #[tokio::test]
    async fn test_scan_missing_and_empty_directories() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(scan_articles(&missing).await.unwrap(), ArticleScan::Missing);

        std::fs::write(dir.path().join("notes.txt"), "not an article").unwrap();
        assert_eq!(scan_articles(dir.path()).await.unwrap(), ArticleScan::Empty);
    }

    #[tokio::test]
    async fn test_scan_sorts_json_files_by_name() {
        let dir = tempdir().unwrap();
        for name in ["b.json", "a.JSON", "c.txt", "c.json", ".json"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }

        let ArticleScan::Files(files) = scan_articles(dir.path()).await.unwrap() else {
            panic!("expected files");
        };
        let names: Vec<String> = files.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec![".json", "a.JSON", "b.json", "c.json"]);
    }

    #[tokio::test]
    async fn test_remove_article_files_without_sibling() {
        let dir = tempdir().unwrap();
        let json = dir.path().join("lonely.json");
        std::fs::write(&json, "{}").unwrap();

        let cleanup = remove_article_files(&json).await;
        assert!(cleanup.json.is_done());
        assert_eq!(cleanup.text, BestEffort::Skipped);
        assert!(!json.exists());
    }

    #[tokio::test]
    async fn test_remove_article_files_with_sibling() {
        let dir = tempdir().unwrap();
        let json = dir.path().join("pair.json");
        let txt = dir.path().join("pair.txt");
        std::fs::write(&json, "{}").unwrap();
        std::fs::write(&txt, "body").unwrap();

        let cleanup = remove_article_files(&json).await;
        assert!(cleanup.json.is_done());
        assert!(cleanup.text.is_done());
        assert!(!json.exists());
        assert!(!txt.exists());
    }
}
