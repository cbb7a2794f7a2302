//! Application configuration.
//!
//! Endpoint paths, element ids and notification timings shared by the
//! handlers. The only runtime knob is the API base, read from the page.

use crate::notice::NoticeTiming;

// =============================================================================
// Endpoints
// =============================================================================

/// Session termination endpoint.
pub const LOGOUT_PATH: &str = "/logout";

/// Login page the browser is sent to after logout or registration.
pub const LOGIN_PAGE: &str = "/login";

/// Registration endpoint, used when the form carries no `action`.
pub const REGISTER_PATH: &str = "/register";

/// Multipart image upload endpoint.
pub const UPLOAD_PATH: &str = "/api/upload";

/// Prefix of the per-image feedback endpoint.
pub const FEEDBACK_PATH: &str = "/api/feedback";

/// Prefix of the original image endpoint.
pub const ORIGINAL_IMAGE_PATH: &str = "/api/original";

/// Prefix of the segmented image endpoint.
pub const SEGMENTED_IMAGE_PATH: &str = "/api/segmented";

// =============================================================================
// DOM surface
// =============================================================================

pub const LOGOUT_BUTTON_ID: &str = "logoutBtn";
pub const UPLOAD_FORM_ID: &str = "uploadForm";
pub const REGISTER_FORM_ID: &str = "registerForm";
pub const IMAGE_INPUT_ID: &str = "imageInput";
pub const RESULT_CONTAINER_ID: &str = "resultContainer";
pub const ORIGINAL_IMAGE_ID: &str = "originalImage";
pub const SEGMENTED_IMAGE_ID: &str = "segmentedImage";
pub const FEEDBACK_MESSAGE_ID: &str = "feedback-message";

/// Data attribute on the result container holding the current image id.
pub const IMAGE_ID_ATTRIBUTE: &str = "data-image-id";

/// Buttons disabled while a feedback request is in flight.
pub const ACTION_BUTTONS_SELECTOR: &str = ".btn-success, .btn-danger";

/// Container alerts are prepended to. Falls back to `<body>`.
pub const ALERT_CONTAINER_SELECTOR: &str = ".auth-container";

/// Body attribute overriding the API base URL.
pub const API_BASE_ATTRIBUTE: &str = "data-api-base";

// =============================================================================
// Timings
// =============================================================================

/// How long an alert stays fully visible (ms).
pub const ALERT_DISPLAY_MS: u32 = 5000;

/// How long a feedback message stays fully visible (ms).
pub const FEEDBACK_DISPLAY_MS: u32 = 3000;

/// Fade-out transition shared by every transient element (ms).
pub const FADE_OUT_MS: u32 = 300;

// =============================================================================
// Upload limits
// =============================================================================

/// Maximum upload size accepted by the server (in bytes).
///
/// 10 MiB limit.
pub const MAX_UPLOAD_SIZE: f64 = 10.0 * 1024.0 * 1024.0;

/// MIME prefix the server requires for uploads.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Runtime configuration for the client.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Prefix prepended to every API path. Empty means same origin.
    pub api_base: String,
    /// Lifecycle of general alerts.
    pub alert_timing: NoticeTiming,
    /// Lifecycle of feedback messages.
    pub feedback_timing: NoticeTiming,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            alert_timing: NoticeTiming::new(ALERT_DISPLAY_MS, FADE_OUT_MS),
            feedback_timing: NoticeTiming::new(FEEDBACK_DISPLAY_MS, FADE_OUT_MS),
        }
    }
}

impl ClientConfig {
    /// Build the configuration for the current page.
    ///
    /// `<body data-api-base="https://...">` overrides the API base.
    pub fn from_document() -> Self {
        let api_base = gloo_utils::document()
            .body()
            .and_then(|body| body.get_attribute(API_BASE_ATTRIBUTE))
            .unwrap_or_default();

        Self::default().with_api_base(api_base)
    }

    /// Replace the API base, dropping any trailing slash.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Resolve an API path against the configured base.
    ///
    /// Absolute URLs are returned unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}{}", self.api_base, path)
    }
}

/// Feedback endpoint for an image.
pub fn feedback_path(image_id: &str) -> String {
    format!("{}/{}", FEEDBACK_PATH, image_id)
}

/// Cache-busted URL of the original image.
pub fn original_image_path(image_id: &str, timestamp_ms: i64) -> String {
    format!("{}/{}?t={}", ORIGINAL_IMAGE_PATH, image_id, timestamp_ms)
}

/// Cache-busted URL of the segmented image.
pub fn segmented_image_path(image_id: &str, timestamp_ms: i64) -> String {
    format!("{}/{}?t={}", SEGMENTED_IMAGE_PATH, image_id, timestamp_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_paths_carry_id_and_timestamp() {
        assert_eq!(original_image_path("abc123", 42), "/api/original/abc123?t=42");
        assert_eq!(segmented_image_path("abc123", 42), "/api/segmented/abc123?t=42");
        assert_eq!(feedback_path("abc123"), "/api/feedback/abc123");
    }

    #[test]
    fn test_url_resolution() {
        let same_origin = ClientConfig::default();
        assert_eq!(same_origin.url(LOGOUT_PATH), "/logout");

        let remote = ClientConfig::default().with_api_base("http://localhost:8000/");
        assert_eq!(remote.api_base, "http://localhost:8000");
        assert_eq!(remote.url(UPLOAD_PATH), "http://localhost:8000/api/upload");
        assert_eq!(
            remote.url("https://other.example/register"),
            "https://other.example/register"
        );
    }

    #[test]
    fn test_default_timings() {
        let config = ClientConfig::default();
        assert_eq!(config.alert_timing.total_ms(), 5300);
        assert_eq!(config.feedback_timing.total_ms(), 3300);
    }
}
