//! Resolution of storage paths and file URLs.
//!
//! Content files live at `content/{recordId}/{fileName}`; the segment after the
//! namespace prefix names the owning record.

use folio_extractors::BlobLocation;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use thiserror::Error;
use url::Url;

/// Default namespace prefix for pipeline-managed files.
pub const DEFAULT_CONTENT_PREFIX: &str = "content/";

/// Matches `/b/{bucket}/o/{object}` in a download URL path.
static DOWNLOAD_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/b/([^/]+)/o/(.+)").expect("download path pattern is valid")
});

/// A storage path inside the content namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath<'a> {
    /// Owning record id.
    pub record_id: &'a str,
    /// Remainder of the path after the record id.
    pub file_name: &'a str,
}

impl<'a> ContentPath<'a> {
    /// Parse `path` under `prefix`. Returns `None` for paths outside the
    /// namespace or without a record id and file segment.
    pub fn parse(path: &'a str, prefix: &str) -> Option<Self> {
        let rest = path.strip_prefix(prefix)?;
        let (record_id, file_name) = rest.split_once('/')?;
        if record_id.is_empty() {
            return None;
        }
        Some(Self {
            record_id,
            file_name,
        })
    }
}

/// Errors resolving a stored file URL.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    /// Not a URL at all.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A URL, but not one pointing into blob storage.
    #[error("URL '{0}' does not reference a storage object")]
    UnrecognizedLayout(String),

    /// Object path is not valid percent-encoded UTF-8.
    #[error("URL '{0}' has an undecodable object path")]
    InvalidEncoding(String),
}

fn decode(raw: &str, url: &str) -> Result<String, PathError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| PathError::InvalidEncoding(url.to_string()))
}

/// Resolve a stored file reference to its bucket and object path.
///
/// Accepts download URLs of the form
/// `https://host/v0/b/{bucket}/o/{percent-encoded object}?alt=media&token=…`
/// and `gs://{bucket}/{object}` references.
pub fn parse_file_url(file_url: &str) -> Result<BlobLocation, PathError> {
    let url = Url::parse(file_url).map_err(|e| PathError::InvalidUrl {
        url: file_url.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() == "gs" {
        let bucket = url
            .host_str()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| PathError::UnrecognizedLayout(file_url.to_string()))?;
        let object = url.path().trim_start_matches('/');
        if object.is_empty() {
            return Err(PathError::UnrecognizedLayout(file_url.to_string()));
        }
        return Ok(BlobLocation::new(
            decode(bucket, file_url)?,
            decode(object, file_url)?,
        ));
    }

    let captures = DOWNLOAD_PATH
        .captures(url.path())
        .ok_or_else(|| PathError::UnrecognizedLayout(file_url.to_string()))?;

    Ok(BlobLocation::new(
        decode(&captures[1], file_url)?,
        decode(&captures[2], file_url)?,
    ))
}
