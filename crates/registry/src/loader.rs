//! Fetching the raw catalog document from a file or an http(s) URL.

use std::path::PathBuf;

use scriptdeck_types::CatalogItem;
use scriptdeck_util::expand_tilde;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Errors raised while fetching or decoding the catalog document.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// Reading a local catalog file failed.
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The HTTP request could not be completed.
    #[error("failed to fetch catalog from {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("catalog request to {url} returned status {status}")]
    Status { url: String, status: u16 },
    /// The document is not a JSON array.
    #[error("catalog document is not a JSON array of items: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the catalog document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(Url),
    File(PathBuf),
}

impl CatalogSource {
    /// Interprets `raw` as an http(s) URL when it parses as one, otherwise
    /// as a (tilde-expanded) file path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::File(expand_tilde(raw)),
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches and decodes the catalog items from `source`.
///
/// The document must be a JSON array. Individual items that fail to decode
/// are skipped with a warning so one bad record never empties the catalog.
pub async fn fetch_catalog_items(source: &CatalogSource) -> Result<Vec<CatalogItem>, CatalogLoadError> {
    let bytes = match source {
        CatalogSource::File(path) => tokio::fs::read(path).await.map_err(|source| CatalogLoadError::Io {
            path: path.clone(),
            source,
        })?,
        CatalogSource::Url(url) => fetch_url(url).await?,
    };
    Ok(decode_items(&bytes)?)
}

async fn fetch_url(url: &Url) -> Result<Vec<u8>, CatalogLoadError> {
    let http_error = |source| CatalogLoadError::Http {
        url: url.to_string(),
        source,
    };
    let response = reqwest::get(url.clone()).await.map_err(http_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogLoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await.map_err(http_error)?;
    Ok(body.to_vec())
}

/// Decodes a catalog document, skipping malformed items.
pub fn decode_items(bytes: &[u8]) -> Result<Vec<CatalogItem>, serde_json::Error> {
    let raw: Vec<Value> = serde_json::from_slice(bytes)?;
    let items = raw
        .into_iter()
        .enumerate()
        .filter_map(|(position, value)| match serde_json::from_value::<CatalogItem>(value) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(position, error = %err, "skipping malformed catalog item");
                None
            }
        })
        .collect();
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const DOCUMENT: &str = r#"[
        { "meta": { "name": "ping", "path": "network" },
          "options": [ { "action": { "type": "select", "choices": ["run"] } } ],
          "commands": [ { "name": "run", "command": "/api/network/ping" } ] },
        { "meta": { "path": "broken" } },
        { "meta": { "name": "uptime", "path": "system" } }
    ]"#;

    #[test]
    fn source_detection() {
        assert!(matches!(CatalogSource::parse("https://example.com/catalog.json"), CatalogSource::Url(_)));
        assert!(matches!(CatalogSource::parse("http://localhost:8080/c.json"), CatalogSource::Url(_)));
        assert_eq!(CatalogSource::parse("./catalog.json"), CatalogSource::File(PathBuf::from("./catalog.json")));
        assert!(matches!(CatalogSource::parse("file:///tmp/c.json"), CatalogSource::File(_)));
    }

    #[test]
    fn malformed_items_are_skipped() {
        let items = decode_items(DOCUMENT.as_bytes()).expect("array decodes");
        let names: Vec<&str> = items.iter().map(|item| item.meta.name.as_str()).collect();
        assert_eq!(names, ["ping", "uptime"]);
    }

    #[test]
    fn loosely_typed_option_bodies_keep_their_item() {
        let document = r#"[
            { "meta": { "name": "rotate-logs", "path": "system/logs" },
              "options": [
                { "action": { "type": "select", "required": "yes", "choices": ["rotate"] } },
                { "compress": { "type": null, "required": true, "define_action_arg": ["rotate"] } }
              ],
              "commands": [ { "name": "rotate", "command": "/api/system/logs/rotate", "actionT": 1 } ] }
        ]"#;
        let items = decode_items(document.as_bytes()).expect("array decodes");
        assert_eq!(items.len(), 1);
        let field = items[0].fields().next().expect("field descriptor");
        assert_eq!(field.name, "compress");
        assert!(!field.is_required());
        assert_eq!(items[0].commands[0].action_kind(), None);
    }

    #[tokio::test]
    async fn reads_catalog_from_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, DOCUMENT).expect("write catalog");

        let items = fetch_catalog_items(&CatalogSource::File(path)).await.expect("load catalog");
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_and_bad_json_are_load_errors() {
        let dir = tempdir().expect("tempdir");
        let missing = CatalogSource::File(dir.path().join("missing.json"));
        assert!(matches!(fetch_catalog_items(&missing).await, Err(CatalogLoadError::Io { .. })));

        let path = dir.path().join("object.json");
        std::fs::write(&path, r#"{ "meta": {} }"#).expect("write catalog");
        let object = CatalogSource::File(path);
        assert!(matches!(fetch_catalog_items(&object).await, Err(CatalogLoadError::Parse(_))));
    }

    #[tokio::test]
    async fn non_success_status_is_a_load_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let address = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buffer = [0u8; 2048];
                let _ = socket.read(&mut buffer).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                    .await;
            }
        });

        let source = CatalogSource::parse(&format!("http://{address}/catalog.json"));
        assert!(matches!(
            fetch_catalog_items(&source).await,
            Err(CatalogLoadError::Status { status: 500, .. })
        ));
    }
}
