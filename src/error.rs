//! Error types for camdeck
//!
//! Nothing in the interaction core is fatal: transient capture and render
//! failures are retried on the next tick, storage failures leave the
//! in-memory state authoritative, and a broken gallery view falls back to
//! live preview. Variants carry `#[source]` errors so the full chain stays
//! visible in logs.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for camdeck
#[derive(Debug, Error)]
pub enum CamdeckError {
    /// A single live-frame capture failed; the preview loop skips the tick
    #[error("Frame capture failed: {0}")]
    FrameCapture(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A still-photo capture failed; no file artifact is created
    #[error("Still capture failed: {0}")]
    StillCapture(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Pushing camera controls failed
    #[error("Camera control error: {0}")]
    CameraControl(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Painting to the panel or setting the backlight failed
    #[error("Render failed: {0}")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Reading a button line failed; the sample is treated as unchanged
    #[error("Button read failed: {0}")]
    ButtonRead(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Deleting or listing photos failed; the in-memory view stays authoritative
    #[error("Photo storage error: {0}")]
    PhotoStorage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The selected gallery image could not be decoded
    #[error("Gallery image unreadable: {0}")]
    GalleryLoad(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Settings persistence error; the in-memory settings stand
    #[error("Settings persistence error: {0}")]
    SettingsPersistence(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Logging setup failed; only raised during startup
    #[error("Logging setup failed: {0}")]
    Logging(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for camdeck operations
pub type Result<T> = std::result::Result<T, CamdeckError>;
