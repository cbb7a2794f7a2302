//! Calls to the segmentation server.
//!
//! Each call maps a non-2xx status to [`AppError::Server`], carrying the
//! server's `detail` text when the body has one.

use crate::config::{feedback_path, LOGOUT_PATH, UPLOAD_PATH};
use crate::services::http::{ApiRequest, ApiResponse, Transport};
use crate::types::{ApiErrorBody, AppError, AppResult, FeedbackRequest, ImageId, UploadResponse};

/// Typed API client over a [`Transport`].
#[derive(Clone, Debug)]
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// End the session.
    pub async fn logout(&self) -> AppResult<()> {
        let response = self.transport.send(ApiRequest::post(LOGOUT_PATH)).await?;
        expect_success(response).map(drop)
    }

    /// Submit the registration form to `action`.
    pub async fn register(&self, action: &str, form: T::Form) -> AppResult<()> {
        let response = self
            .transport
            .send(ApiRequest::post(action).form(form))
            .await?;
        expect_success(response).map(drop)
    }

    /// Upload an image and return the stored pair's identifier.
    pub async fn upload(&self, form: T::Form) -> AppResult<UploadResponse> {
        let response = self
            .transport
            .send(ApiRequest::post(UPLOAD_PATH).form(form))
            .await?;
        let response = expect_success(response)?;

        serde_json::from_str(&response.body)
            .map_err(|e| AppError::Decode(format!("upload response: {}", e)))
    }

    /// Record whether the segmentation of `image_id` is good.
    pub async fn send_feedback(&self, image_id: &ImageId, is_good: bool) -> AppResult<()> {
        let body = serde_json::to_value(FeedbackRequest { is_good })
            .map_err(|e| AppError::Decode(e.to_string()))?;
        let request = ApiRequest::post(feedback_path(image_id.as_str())).json(body);

        let response = self.transport.send(request).await?;
        expect_success(response).map(drop)
    }
}

fn expect_success(response: ApiResponse) -> AppResult<ApiResponse> {
    if response.ok() {
        return Ok(response);
    }

    Err(AppError::Server {
        status: response.status,
        detail: ApiErrorBody::detail_from(&response.body),
    })
}
