//! Types for the manual re-extraction call.

use serde::{Deserialize, Serialize};

/// Identity claims of the caller, as supplied by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterClaims {
    /// Caller user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Admin flag.
    #[serde(default)]
    pub admin: bool,
}

impl RequesterClaims {
    /// Claims for an admin caller.
    pub fn admin(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            admin: true,
        }
    }

    /// Claims for a regular caller.
    pub fn user(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            admin: false,
        }
    }
}

/// Input of the manual re-extraction call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReextractRequest {
    /// Content record to re-extract.
    #[serde(default)]
    pub content_id: Option<String>,
}

/// Output of the manual re-extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReextractResponse {
    /// Always true for a completed call.
    pub success: bool,
    /// Character count of the persisted text.
    pub extracted_length: usize,
    /// Human-readable status.
    pub message: String,
}
