//! Handler logic for the page.
//!
//! [`Controller`] owns what happens when the user logs out, registers,
//! uploads an image or rates a segmentation. It talks to the page only
//! through [`Page`] and to the server only through [`ApiClient`], so the
//! browser bindings stay thin.
//!
//! Every failure is turned into a notification here; nothing escapes a
//! handler.

use crate::config::{
    original_image_path, segmented_image_path, IMAGE_MIME_PREFIX, LOGIN_PAGE, MAX_UPLOAD_SIZE,
};
use crate::services::{ApiClient, Transport};
use crate::types::{AppError, AppResult, ImageId, NoticeKind};

/// What the handlers need from the page.
pub trait Page {
    /// Replace the current alert.
    fn show_alert(&self, message: &str, kind: NoticeKind);

    /// Replace the current feedback message.
    fn show_feedback_message(&self, text: &str, is_success: bool);

    fn navigate(&self, url: &str);

    /// Toggle every rating button.
    fn set_action_buttons_disabled(&self, disabled: bool);

    /// Identifier stored on the result container.
    fn current_image_id(&self) -> Option<ImageId>;

    /// Show the result container at full opacity.
    fn reveal_result(&self);

    /// Store the identifier and point both images at their sources.
    fn present_result(&self, image_id: &ImageId, original_src: &str, segmented_src: &str);

    /// Fade the result container out, then hide it and clear the file input.
    fn dismiss_result(&self);
}

/// File picked in the upload form.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub size: f64,
}

/// Reject uploads the server would refuse anyway.
pub fn validate_upload(file: Option<&SelectedFile>) -> AppResult<()> {
    let file = file.ok_or_else(|| AppError::Validation("no file selected".to_string()))?;

    if !file.content_type.starts_with(IMAGE_MIME_PREFIX) {
        return Err(AppError::Validation(format!(
            "{} is not an image",
            file.name
        )));
    }

    if file.size > MAX_UPLOAD_SIZE {
        return Err(AppError::Validation(format!(
            "{} is larger than {} MB",
            file.name,
            MAX_UPLOAD_SIZE / (1024.0 * 1024.0)
        )));
    }

    Ok(())
}

/// Milliseconds since the epoch, used for cache busting.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The page's interaction layer.
pub struct Controller<T, P> {
    api: ApiClient<T>,
    page: P,
    clock: fn() -> i64,
}

impl<T: Transport, P: Page> Controller<T, P> {
    pub fn new(transport: T, page: P) -> Self {
        Self {
            api: ApiClient::new(transport),
            page,
            clock: now_ms,
        }
    }

    /// Replace the timestamp source used in image URLs.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Log out and go to the login page.
    pub async fn logout(&self) {
        log::info!("🚪 Logging out...");

        match self.api.logout().await {
            Ok(()) => self.page.navigate(LOGIN_PAGE),
            Err(AppError::Server { status, .. }) => {
                log::warn!("Logout rejected with status {}", status);
                self.page.show_alert("Logout failed", NoticeKind::Error);
            }
            Err(e) => {
                log::error!("❌ Logout request failed: {}", e);
                self.page.show_alert(
                    &format!("Network error during logout: {}", e),
                    NoticeKind::Error,
                );
            }
        }
    }

    /// Submit the registration form and go to the login page.
    pub async fn register(&self, action: &str, form: T::Form) {
        match self.api.register(action, form).await {
            Ok(()) => self.page.navigate(LOGIN_PAGE),
            Err(AppError::Server { status, detail }) => {
                log::warn!("Registration rejected with status {}", status);
                let message = detail.unwrap_or_else(|| "Registration failed".to_string());
                self.page.show_alert(&message, NoticeKind::Error);
            }
            Err(e) => {
                log::error!("❌ Registration request failed: {}", e);
                self.page
                    .show_alert(&format!("Network error: {}", e), NoticeKind::Error);
            }
        }
    }

    /// Rate the segmentation currently shown.
    ///
    /// The rating buttons are disabled for the duration of the request and
    /// re-enabled whatever the outcome.
    pub async fn send_feedback(&self, is_good: bool) {
        self.page.set_action_buttons_disabled(true);

        let outcome = self.submit_feedback(is_good).await;

        match outcome {
            Ok(()) => {
                let text = if is_good { "Rating accepted" } else { "Feedback recorded" };
                self.page.show_feedback_message(text, true);
                self.page.dismiss_result();
            }
            Err(e) => {
                log::error!("❌ Feedback failed: {}", e);
                self.page.show_feedback_message(&format!("Error: {}", e), false);
            }
        }

        self.page.set_action_buttons_disabled(false);
    }

    async fn submit_feedback(&self, is_good: bool) -> AppResult<()> {
        let image_id = self
            .page
            .current_image_id()
            .ok_or_else(|| AppError::Validation("no uploaded image to rate".to_string()))?;

        log::info!("📝 Sending feedback for image {} (good: {})", image_id, is_good);
        self.api.send_feedback(&image_id, is_good).await
    }

    /// Upload the form's image and show the original/segmented pair.
    pub async fn upload(&self, form: T::Form, file: Option<SelectedFile>) {
        self.page.reveal_result();

        match self.submit_upload(form, file.as_ref()).await {
            Ok(image_id) => {
                let timestamp = (self.clock)();
                self.page.present_result(
                    &image_id,
                    &original_image_path(image_id.as_str(), timestamp),
                    &segmented_image_path(image_id.as_str(), timestamp),
                );
                log::info!("✅ Upload successful, image {}", image_id);
            }
            Err(e) => {
                log::error!("❌ Upload failed: {}", e);
                self.page
                    .show_feedback_message(&format!("Upload error: {}", e), false);
            }
        }
    }

    async fn submit_upload(
        &self,
        form: T::Form,
        file: Option<&SelectedFile>,
    ) -> AppResult<ImageId> {
        validate_upload(file)?;

        log::info!("📤 Uploading image...");
        let response = self.api.upload(form).await?;
        Ok(response.id)
    }
}
