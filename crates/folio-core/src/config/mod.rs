//! Configuration system for folio.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use folio_extractors::{BlobConfig, BlobProvider, OcrConfig, PreprocessConfig, VisionConfig};
use serde::{Deserialize, Serialize};

use crate::error::{FolioError, FolioResult};
use crate::storage_path::DEFAULT_CONTENT_PREFIX;
use crate::traits::{StoreConfig, StoreProvider};
use crate::types::RequesterClaims;

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port` bind address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Caller identity configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer token to claims.
    pub tokens: HashMap<String, RequesterClaims>,
}

impl AuthConfig {
    /// Claims for a bearer token, if the token is known.
    pub fn claims_for(&self, token: &str) -> Option<&RequesterClaims> {
        self.tokens.get(token)
    }
}

/// How `POST /events/storage` hands an event to the ingestion trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventDispatch {
    /// Run the trigger before answering; store failures become a 5xx so the
    /// push sender redelivers.
    #[default]
    Inline,
    /// Publish on the bus and answer `202` once a worker has the event.
    /// A store failure after that point is only logged.
    Queued,
}

/// Storage event bus configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast channel capacity.
    pub capacity: usize,
    pub dispatch: EventDispatch,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: crate::events::DEFAULT_CAPACITY,
            dispatch: EventDispatch::default(),
        }
    }
}

/// Main folio configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Storage namespace watched by the ingestion trigger.
    pub content_prefix: String,
    /// Record store.
    pub store: StoreConfig,
    /// Blob storage.
    pub blob: BlobConfig,
    /// Cloud Vision credentials.
    pub vision: VisionConfig,
    /// Local OCR.
    pub ocr: OcrConfig,
    /// Image preprocessing before local OCR.
    pub preprocess: PreprocessConfig,
    /// Caller identities.
    pub auth: AuthConfig,
    /// Event bus.
    pub events: EventsConfig,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            content_prefix: DEFAULT_CONTENT_PREFIX.to_string(),
            store: StoreConfig::default(),
            blob: BlobConfig::default(),
            vision: VisionConfig::default(),
            ocr: OcrConfig::default(),
            preprocess: PreprocessConfig::default(),
            auth: AuthConfig::default(),
            events: EventsConfig::default(),
        }
    }
}

impl FolioConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> FolioResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| FolioError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| FolioError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| FolioError::Configuration(e.to_string())),
            _ => Err(FolioError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Server
        if let Some(host) = var("FOLIO_HOST") {
            config.server.host = host;
        }
        if let Some(port) = var("FOLIO_PORT").or_else(|| var("PORT")) {
            if let Ok(port) = port.parse() {
                config.server.port = port;
            }
        }
        if let Some(prefix) = var("FOLIO_CONTENT_PREFIX") {
            config.content_prefix = prefix;
        }

        // Events
        if let Some(dispatch) = var("FOLIO_EVENT_DISPATCH") {
            config.events.dispatch = match dispatch.to_lowercase().as_str() {
                "queued" | "bus" => EventDispatch::Queued,
                _ => EventDispatch::Inline,
            };
        }

        // Record store
        if let Some(provider) = var("FOLIO_STORE_PROVIDER") {
            config.store.provider = match provider.to_lowercase().as_str() {
                "memory" => StoreProvider::Memory,
                _ => StoreProvider::Sqlite,
            };
        }
        if let Some(path) = var("FOLIO_STORE_PATH") {
            config.store.path = PathBuf::from(path);
        }

        // Blob storage
        if let Some(provider) = var("FOLIO_BLOB_PROVIDER") {
            config.blob.provider = match provider.to_lowercase().as_str() {
                "filesystem" | "fs" => BlobProvider::Filesystem,
                _ => BlobProvider::Gcs,
            };
        }
        if let Some(root) = var("FOLIO_BLOB_ROOT") {
            config.blob.root = PathBuf::from(root);
        }
        if let Some(url) = var("FOLIO_STORAGE_URL") {
            config.blob.base_url = url;
        }

        // Google credentials
        if let Some(token) = var("GOOGLE_OAUTH_ACCESS_TOKEN") {
            config.blob.access_token = Some(token.clone());
            config.vision.access_token = Some(token);
        }
        if let Some(key) = var("FOLIO_VISION_API_KEY") {
            config.vision.api_key = Some(key);
        }
        if let Some(endpoint) = var("FOLIO_VISION_ENDPOINT") {
            config.vision.endpoint = endpoint;
        }

        // OCR
        if let Some(lang) = var("FOLIO_OCR_LANGUAGE") {
            config.ocr.language = lang;
        }

        // Auth
        if let Some(token) = var("FOLIO_ADMIN_TOKEN") {
            config
                .auth
                .tokens
                .insert(token, RequesterClaims::admin("admin"));
        }

        config
    }
}
