//! Application error types

use thiserror::Error;

/// Errors surfaced by the frame driver and render context
#[derive(Error, Debug)]
pub enum GlintError {
    #[error("text: {0}")]
    Text(#[from] glint_text::TextError),

    #[error("platform: {0}")]
    Platform(#[from] glint_platform::PlatformError),
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, GlintError>;
