// src/error.rs

use thiserror::Error;

/// Core error types for rpmal
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Candidate manifest could not be decoded
    #[error("Manifest error: {0}")]
    Json(#[from] serde_json::Error),

    /// Package file could not be parsed
    #[error("Failed to parse package: {0}")]
    PackageParse(String),

    /// Malformed dependency descriptor
    #[error("Invalid dependency: {0}")]
    InvalidDependency(String),

    /// Malformed epoch:version-release string
    #[error("Invalid EVR: {0}")]
    InvalidEvr(String),

    /// Bloom filters with different geometry cannot be combined
    #[error("Bloom filter mismatch: m={left_m} k={left_k} vs m={right_m} k={right_k}")]
    BloomMismatch {
        left_m: usize,
        left_k: usize,
        right_m: usize,
        right_k: usize,
    },
}

/// Result type alias using rpmal's Error type
pub type Result<T> = std::result::Result<T, Error>;
