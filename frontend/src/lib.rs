//! Segmenter - browser client for the image segmentation web app
//!
//! A WebAssembly script loaded by the server-rendered pages. It wires the
//! existing markup to the server's HTTP API: logout, registration, image
//! upload and segmentation feedback, with transient notifications for
//! every outcome.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   events   ┌──────────────┐   ApiRequest   ┌──────────────┐
//! │   bindings   │──────────▶│  Controller  │──────────────▶│  Transport   │
//! │ (DOM events) │            │ (handlers)   │                │ (gloo-net)   │
//! └──────────────┘            └──────┬───────┘                └──────────────┘
//!                                    │ Page
//!                             ┌──────▼───────┐   show_notice   ┌──────────────┐
//!                             │   DomPage    │───────────────▶│    notice    │
//!                             │  (web-sys)   │                 │ (lifecycle)  │
//!                             └──────────────┘                 └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Endpoints, element ids, timings and [`ClientConfig`]
//! - [`types`] - Wire types and [`AppError`]
//! - [`notice`] - Transient notification lifecycle
//! - [`services`] - HTTP transport and API client
//! - [`controller`] - Handler logic behind the [`Page`] seam
//! - [`dom`] - Browser implementation of [`Page`]
//! - [`bindings`] - Event binding and exported functions

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod notice;
pub mod services;
pub mod controller;
pub mod dom;
pub mod bindings;

use wasm_bindgen::prelude::*;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::ClientConfig;

// Types
pub use types::{
    // Notices
    NoticeKind,
    // API
    ImageId, UploadResponse, FeedbackRequest, ApiErrorBody,
    // Errors
    AppError, AppResult,
};

// Notices
pub use notice::{
    show_notice, Notice, NoticeHost, NoticePhase, NoticeSurface, NoticeTiming, Scheduler,
};

// Services
pub use services::*;

// Handlers
pub use controller::{validate_upload, Controller, Page, SelectedFile};
pub use dom::{DomPage, TimeoutScheduler};
pub use bindings::bind_page;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - set up logging and bind the handlers of the current page.
#[wasm_bindgen(start)]
pub fn run() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Segmenter client starting");

    let config = ClientConfig::from_document();
    if !config.api_base.is_empty() {
        log::info!("🌐 API base: {}", config.api_base);
    }

    bind_page(config);
}
