//! Blob fetching: the byte source behind every local extraction.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::types::BlobLocation;

/// Characters escaped in a storage object name when it is placed in a URL path.
const OBJECT_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Retrieves the raw bytes of a stored file.
#[async_trait]
pub trait BlobFetcher: Send + Sync {
    /// Download the object at `location`.
    async fn download(&self, location: &BlobLocation) -> ExtractResult<Vec<u8>>;

    /// Human-readable name for this fetcher.
    fn name(&self) -> &str;
}

/// Downloads objects through the Cloud Storage JSON API.
pub struct GcsBlobFetcher {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl GcsBlobFetcher {
    /// Default public endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://storage.googleapis.com";

    /// Create a fetcher against the public endpoint.
    pub fn new(access_token: Option<String>) -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL, access_token)
    }

    /// Create a fetcher against a custom endpoint (emulator, proxy).
    pub fn with_base_url(base_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        }
    }

    fn media_url(&self, location: &BlobLocation) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}?alt=media",
            self.base_url,
            utf8_percent_encode(&location.bucket, OBJECT_NAME),
            utf8_percent_encode(&location.path, OBJECT_NAME)
        )
    }
}

#[async_trait]
impl BlobFetcher for GcsBlobFetcher {
    async fn download(&self, location: &BlobLocation) -> ExtractResult<Vec<u8>> {
        let url = self.media_url(location);
        debug!(%location, "Downloading blob");

        let mut request = self.client.get(&url);
        if let Some(ref token) = self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ExtractError::BlobNotFound(location.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Network(format!(
                "Storage download of {} returned {}: {}",
                location, status, body
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn name(&self) -> &str {
        "gcs"
    }
}

/// Reads objects from a local directory laid out as `{root}/{bucket}/{path}`.
#[derive(Debug, Clone)]
pub struct FsBlobFetcher {
    root: PathBuf,
}

impl FsBlobFetcher {
    /// Create a fetcher rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, location: &BlobLocation) -> ExtractResult<PathBuf> {
        let mut resolved = self.root.clone();
        for part in [location.bucket.as_str(), location.path.as_str()] {
            for component in Path::new(part).components() {
                match component {
                    Component::Normal(c) => resolved.push(c),
                    Component::CurDir => {}
                    _ => {
                        return Err(ExtractError::BlobNotFound(format!(
                            "{} escapes the storage root",
                            location
                        )))
                    }
                }
            }
        }
        Ok(resolved)
    }
}

#[async_trait]
impl BlobFetcher for FsBlobFetcher {
    async fn download(&self, location: &BlobLocation) -> ExtractResult<Vec<u8>> {
        let path = self.resolve(location)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExtractError::BlobNotFound(location.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &str {
        "filesystem"
    }
}

/// In-process blob store.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<BlobLocation, Vec<u8>>>,
    downloads: AtomicUsize,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` at `location`, replacing any previous object.
    pub async fn put(&self, location: BlobLocation, bytes: impl Into<Vec<u8>>) {
        self.objects.write().await.insert(location, bytes.into());
    }

    /// Number of download calls served so far (hits and misses).
    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobFetcher for MemoryBlobStore {
    async fn download(&self, location: &BlobLocation) -> ExtractResult<Vec<u8>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.objects
            .read()
            .await
            .get(location)
            .cloned()
            .ok_or_else(|| ExtractError::BlobNotFound(location.to_string()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    #[test]
    fn test_gcs_media_url_encodes_object_path() {
        let fetcher = GcsBlobFetcher::with_base_url("http://localhost:4443/", None);
        let loc = BlobLocation::new("notes", "content/abc 1/scan.pdf");
        assert_eq!(
            fetcher.media_url(&loc),
            "http://localhost:4443/storage/v1/b/notes/o/content%2Fabc%201%2Fscan.pdf?alt=media"
        );
    }

    #[tokio::test]
    async fn test_memory_store_round_trip_and_count() {
        let store = MemoryBlobStore::new();
        let loc = BlobLocation::new("b", "content/x/a.png");
        store.put(loc.clone(), b"bytes".to_vec()).await;

        assert_eq!(store.download(&loc).await.unwrap(), b"bytes");
        let missing = store.download(&BlobLocation::new("b", "nope")).await;
        assert!(matches!(missing, Err(ExtractError::BlobNotFound(_))));
        assert_eq!(store.download_count(), 2);
    }

    #[tokio::test]
    async fn test_fs_fetcher_reads_bucket_layout() {
        let dir = tempfile::tempdir().unwrap();
        let file_dir = dir.path().join("notes").join("content").join("abc");
        std::fs::create_dir_all(&file_dir).unwrap();
        std::fs::write(file_dir.join("a.pdf"), b"%PDF-1.4").unwrap();

        let fetcher = FsBlobFetcher::new(dir.path());
        let bytes = fetcher
            .download(&BlobLocation::new("notes", "content/abc/a.pdf"))
            .await
            .unwrap();
        assert_eq!(bytes, b"%PDF-1.4");

        let missing = fetcher
            .download(&BlobLocation::new("notes", "content/abc/b.pdf"))
            .await;
        assert!(matches!(missing, Err(ExtractError::BlobNotFound(_))));
    }

    #[tokio::test]
    async fn test_fs_fetcher_rejects_parent_components() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FsBlobFetcher::new(dir.path());
        let result = fetcher
            .download(&BlobLocation::new("notes", "../../etc/passwd"))
            .await;
        assert!(matches!(result, Err(ExtractError::BlobNotFound(_))));
    }

    #[tokio::test]
    async fn test_gcs_download_returns_body_with_bearer() {
        let (base_url, server) = serve_once(200, b"%PDF-1.4").await;
        let fetcher = GcsBlobFetcher::with_base_url(base_url, Some("tok".into()));

        let bytes = fetcher
            .download(&BlobLocation::new("notes", "content/abc/a.pdf"))
            .await
            .unwrap();
        assert_eq!(bytes, b"%PDF-1.4");

        let request = server.await.unwrap();
        assert_eq!(
            request.request_line(),
            "get /storage/v1/b/notes/o/content%2fabc%2fa.pdf?alt=media http/1.1"
        );
        assert_eq!(request.header("authorization"), Some("bearer tok"));
    }

    #[tokio::test]
    async fn test_gcs_download_404_is_blob_not_found() {
        let (base_url, server) = serve_once(404, b"{}").await;
        let fetcher = GcsBlobFetcher::with_base_url(base_url, None);

        let result = fetcher
            .download(&BlobLocation::new("notes", "content/abc/gone.png"))
            .await;
        assert!(matches!(
            result,
            Err(ExtractError::BlobNotFound(ref m)) if m == "notes/content/abc/gone.png"
        ));
        assert_eq!(server.await.unwrap().header("authorization"), None);
    }

    #[tokio::test]
    async fn test_gcs_download_server_error_is_network() {
        let (base_url, server) = serve_once(500, b"backend unavailable").await;
        let fetcher = GcsBlobFetcher::with_base_url(base_url, None);

        let result = fetcher
            .download(&BlobLocation::new("notes", "content/abc/a.pdf"))
            .await;
        let Err(ExtractError::Network(message)) = result else {
            panic!("expected a network error, got {:?}", result);
        };
        assert!(message.contains("500"));
        assert!(message.contains("backend unavailable"));
        server.await.unwrap();
    }
}
