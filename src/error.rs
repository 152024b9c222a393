//! Error types for the preview pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing or compositing slides
#[derive(Error, Debug)]
pub enum Error {
    /// No slides were supplied
    #[error("Slide set is empty: at least one HTML slide is required")]
    EmptySlideSet,

    /// A slide path does not point at a readable file
    #[error("Slide {index} not found: {path}")]
    SlideNotFound { index: usize, path: PathBuf },

    /// Failed to start the rendering context
    #[error("Renderer initialization failed: {0}")]
    InitializationError(String),

    /// Failed to navigate to a slide
    #[error("Failed to load slide: {0}")]
    LoadError(String),

    /// Failed to capture a rendered slide
    #[error("Capture failed: {0}")]
    RenderError(String),

    /// A captured image could not be decoded or has the wrong size
    #[error("Failed to decode capture {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    /// Failed to encode the composite image
    #[error("Failed to encode composite: {0}")]
    EncodeError(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
