//! Common types used across the client.
//!
//! # Categories
//!
//! - **Notice Types** - styling of transient notifications
//! - **API Types** - request and response bodies exchanged with the server
//! - **Error Types** - client error handling

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Notice Types
// =============================================================================

/// Style tag of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// Failure message
    Error,
    /// Confirmation message
    Success,
    /// Neutral message
    Info,
    /// Non-fatal problem
    Warning,
}

impl NoticeKind {
    /// Map a success flag to a kind.
    pub fn from_success(is_success: bool) -> Self {
        if is_success {
            NoticeKind::Success
        } else {
            NoticeKind::Error
        }
    }

    /// Parse a style tag as passed to `showAlert`.
    ///
    /// Supported tags are `error`, `success`, `info` and `warning`; a missing
    /// or unknown tag falls back to `error`.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("success") => NoticeKind::Success,
            Some("info") => NoticeKind::Info,
            Some("warning") => NoticeKind::Warning,
            _ => NoticeKind::Error,
        }
    }

    /// Short tag used in CSS class names (`alert-error`, `success`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            NoticeKind::Error => "error",
            NoticeKind::Success => "success",
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warning",
        }
    }

    /// Get emoji prefix for console logs.
    pub fn emoji(&self) -> &'static str {
        match self {
            NoticeKind::Error => "❌",
            NoticeKind::Success => "✅",
            NoticeKind::Info => "ℹ️",
            NoticeKind::Warning => "⚠️",
        }
    }
}

// =============================================================================
// API Types
// =============================================================================

/// Identifier of an uploaded image.
///
/// The server sends integers; string ids are accepted as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawImageId")]
pub struct ImageId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawImageId {
    Number(i64),
    Text(String),
}

impl From<RawImageId> for ImageId {
    fn from(raw: RawImageId) -> Self {
        match raw {
            RawImageId::Number(n) => ImageId(n.to_string()),
            RawImageId::Text(s) => ImageId(s),
        }
    }
}

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        ImageId(id.into())
    }

    /// Read an id from a `data-image-id` attribute. Blank means no image.
    pub fn from_attribute(value: Option<String>) -> Option<Self> {
        value
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(ImageId)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response of `POST /api/upload`.
#[derive(Clone, Debug, Deserialize)]
pub struct UploadResponse {
    /// Identifier of the stored image pair
    pub id: ImageId,
    /// Identifier of the original image, when reported separately
    #[serde(default)]
    pub original_id: Option<ImageId>,
    /// Identifier of the segmented image, when reported separately
    #[serde(default)]
    pub segmented_id: Option<ImageId>,
    /// Human readable status
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/feedback/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub is_good: bool,
}

/// Error body of FastAPI-style HTTP errors.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Extract the `detail` text from a response body, if any.
    ///
    /// Validation errors carry a list instead of a string; those are
    /// rendered as compact JSON.
    pub fn detail_from(body: &str) -> Option<String> {
        let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
        match parsed.detail? {
            serde_json::Value::String(text) if !text.is_empty() => Some(text),
            serde_json::Value::String(_) | serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Client errors.
///
/// Every variant ends up as a user-visible notification.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AppError {
    /// The request could not complete.
    #[error("{0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server responded with status {status}{}", detail_suffix(.detail))]
    Server { status: u16, detail: Option<String> },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// A required page element is absent.
    #[error("missing page element: {0}")]
    MissingElement(&'static str),

    /// Client-side pre-check failed.
    #[error("{0}")]
    Validation(String),

    /// A DOM call threw.
    #[error("page error: {0}")]
    Dom(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_ref().map(|d| format!(": {}", d)).unwrap_or_default()
}

impl AppError {
    /// Server-provided detail, if this is a server error carrying one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AppError::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Result type alias for client operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_kind_from_tag() {
        assert_eq!(NoticeKind::from_tag(None), NoticeKind::Error);
        assert_eq!(NoticeKind::from_tag(Some("error")), NoticeKind::Error);
        assert_eq!(NoticeKind::from_tag(Some("success")), NoticeKind::Success);
        assert_eq!(NoticeKind::from_tag(Some("warning")), NoticeKind::Warning);
        assert_eq!(NoticeKind::from_tag(Some("info")), NoticeKind::Info);
        assert_eq!(NoticeKind::from_tag(Some("danger")), NoticeKind::Error);
        assert_eq!(NoticeKind::from_tag(Some("warning")).tag(), "warning");
    }

    #[test]
    fn test_image_id_from_attribute() {
        assert_eq!(ImageId::from_attribute(None), None);
        assert_eq!(ImageId::from_attribute(Some(String::new())), None);
        assert_eq!(ImageId::from_attribute(Some("  ".to_string())), None);
        assert_eq!(
            ImageId::from_attribute(Some("abc123".to_string())),
            Some(ImageId::new("abc123"))
        );
    }

    #[test]
    fn test_upload_response_with_numeric_id() {
        let json = r#"{
            "id": 17,
            "original_id": 17,
            "segmented_id": 17,
            "message": "File uploaded successfully"
        }"#;

        let response: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id.as_str(), "17");
        assert_eq!(response.segmented_id, Some(ImageId::new("17")));
        assert_eq!(response.message.as_deref(), Some("File uploaded successfully"));
    }

    #[test]
    fn test_upload_response_with_string_id() {
        let response: UploadResponse = serde_json::from_str(r#"{"id": "abc123"}"#).unwrap();
        assert_eq!(response.id.to_string(), "abc123");
        assert!(response.original_id.is_none());
    }

    #[test]
    fn test_feedback_request_body() {
        let body = serde_json::to_string(&FeedbackRequest { is_good: true }).unwrap();
        assert_eq!(body, r#"{"is_good":true}"#);
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(
            ApiErrorBody::detail_from(r#"{"detail": "Image not found"}"#).as_deref(),
            Some("Image not found")
        );
        assert_eq!(ApiErrorBody::detail_from("<html>oops</html>"), None);
        assert_eq!(ApiErrorBody::detail_from(r#"{"status": "x"}"#), None);

        let listed = ApiErrorBody::detail_from(r#"{"detail": [{"msg": "field required"}]}"#);
        assert_eq!(listed.as_deref(), Some(r#"[{"msg":"field required"}]"#));
    }

    #[test]
    fn test_error_display() {
        let plain = AppError::Server { status: 500, detail: None };
        assert_eq!(plain.to_string(), "server responded with status 500");

        let detailed = AppError::Server {
            status: 413,
            detail: Some("File too large".to_string()),
        };
        assert_eq!(detailed.to_string(), "server responded with status 413: File too large");
        assert_eq!(detailed.detail(), Some("File too large"));
    }
}
