//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Invalid surface construction parameters
    #[error("invalid surface configuration: {0}")]
    InvalidConfig(String),

    /// Failed to open or read a named resource
    #[error("asset load failed: {0}")]
    AssetLoad(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
