/*!
 * Error types for the kisan-translate library.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when calling a translation backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Error when sending the request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing a backend response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Non-success status returned by the remote service
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code (or provider error code)
        status_code: u16,
        /// Raw error message from the service
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The backend answered with a different number of strings than it was sent
    #[error("Backend returned {actual} translations for {expected} inputs")]
    LengthMismatch {
        /// Number of strings sent
        expected: usize,
        /// Number of strings received
        actual: usize,
    },
}

impl BackendError {
    /// Map a transport error from reqwest onto the closest backend error
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised while building the glossary or reading configuration.
///
/// These are fatal at construction time.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Glossary file does not exist or cannot be read
    #[error("Failed to read glossary file {path}: {message}")]
    GlossaryUnreadable {
        /// Path that was requested
        path: PathBuf,
        /// Underlying IO error text
        message: String,
    },

    /// Glossary file is not the expected JSON shape
    #[error("Malformed glossary: {0}")]
    MalformedGlossary(String),

    /// Term alternation failed to compile, fallback included
    #[error("Failed to compile glossary pattern: {0}")]
    PatternCompile(String),

    /// A configuration value is unusable
    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}

/// Errors raised when an input violates a precondition
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Similarity thresholds live in [0, 1]
    #[error("Threshold must be between 0 and 1, got {0}")]
    ThresholdOutOfRange(f64),

    /// A glossary record could not be turned into a term pair
    #[error("Malformed term pair at index {index}: {reason}")]
    MalformedTermPair {
        /// Position of the record in the source list
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// Language code is not a known ISO 639 code
    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    /// Batches must hold at least one string
    #[error("Batch size must be at least 1")]
    ZeroBatchSize,
}

/// Contract violations between collection and reconstruction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructureError {
    /// A collected path does not exist in the structure being rebuilt
    #[error("Path {path} not found in structure")]
    PathNotFound {
        /// Display form of the path
        path: String,
    },

    /// The final token of a path does not address a string leaf
    #[error("Path {path} does not address a string leaf")]
    NotAString {
        /// Display form of the path
        path: String,
    },

    /// Number of paths and translated strings differ
    #[error("Got {translations} translations for {paths} paths")]
    CountMismatch {
        /// Number of paths
        paths: usize,
        /// Number of translated strings
        translations: usize,
    },
}

/// Main error type returned by the translation pipeline
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the translation backend
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Error from configuration or glossary construction
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from input validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Error from structure reconstruction
    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),
}
