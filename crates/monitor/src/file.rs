use std::path::Path;

use async_trait::async_trait;
use darkux_guard::page::PageModel;
use darkux_guard::{FetchFailure, Target};

use crate::html;
use crate::source::PageSource;

/// Loads saved snapshots from disk: `.json` files hold a serialized
/// [`PageModel`], anything else is parsed as HTML.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilePageSource;

impl FilePageSource {
    /// Decode snapshot contents according to the file extension.
    pub fn decode(path: &Path, contents: &str) -> Result<PageModel, FetchFailure> {
        if is_json(path) {
            serde_json::from_str(contents).map_err(|err| FetchFailure::Decode(err.to_string()))
        } else {
            Ok(html::snapshot(contents))
        }
    }
}

pub fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// True for files this source knows how to load.
pub fn is_snapshot_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "html" | "htm" | "json"))
}

#[async_trait]
impl PageSource for FilePageSource {
    async fn fetch(&self, target: &Target) -> Result<PageModel, FetchFailure> {
        if target.is_empty() {
            return Err(FetchFailure::InvalidTarget {
                target: String::new(),
                reason: "empty path".to_string(),
            });
        }
        let path = Path::new(target.as_str());
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| FetchFailure::Io(format!("{}: {err}", path.display())))?;
        Self::decode(path, &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_snapshot_decodes() {
        let json = r#"{"text": "Cancel ANYTIME", "elements": [{"tag": "p", "text": "Cancel anytime"}]}"#;
        let page = FilePageSource::decode(Path::new("page.JSON"), json).unwrap();
        assert_eq!(page.text(), "cancel anytime");
        assert_eq!(page.elements().len(), 1);
    }

    #[test]
    fn test_bad_json_is_decode_failure() {
        let err = FilePageSource::decode(Path::new("page.json"), "{not json").unwrap_err();
        assert!(matches!(err, FetchFailure::Decode(_)));
    }

    #[test]
    fn test_snapshot_extensions() {
        assert!(is_snapshot_file(Path::new("a/checkout.html")));
        assert!(is_snapshot_file(Path::new("a/checkout.HTM")));
        assert!(is_snapshot_file(Path::new("a/page.json")));
        assert!(!is_snapshot_file(Path::new("a/notes.txt")));
        assert!(!is_snapshot_file(Path::new("a/README")));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_failure() {
        let err = FilePageSource
            .fetch(&Target::new("/nonexistent/darkux/page.html"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchFailure::Io(_)));
    }
}
