//! Error types for the Veracity library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`VeracityError`] enum. Constructor helpers keep call sites short.
//!
//! # Examples
//!
//! ```
//! use veracity::error::{Result, VeracityError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(VeracityError::invalid_input("corpus is empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Veracity operations.
#[derive(Error, Debug)]
pub enum VeracityError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input that cannot be used: empty data, a single-class training set,
    /// an invalid configuration or an incompatible feature vector.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A component was used before it was fitted.
    #[error("Not ready: {0}")]
    NotReady(String),

    /// A data row that could not be turned into a record.
    ///
    /// Loaders skip these; they never abort a load.
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// Analysis setup errors, such as an invalid tokenizer pattern
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// CSV reader errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary artifact encoding/decoding errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for operations that may fail with VeracityError.
pub type Result<T> = std::result::Result<T, VeracityError>;

impl VeracityError {
    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        VeracityError::InvalidInput(msg.into())
    }

    /// Create a new not ready error.
    pub fn not_ready<S: Into<String>>(msg: S) -> Self {
        VeracityError::NotReady(msg.into())
    }

    /// Create a new malformed record error.
    pub fn malformed_record<S: Into<String>>(line: u64, reason: S) -> Self {
        VeracityError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        VeracityError::Analysis(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        VeracityError::Serialization(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        VeracityError::InvalidInput(format!("Invalid configuration: {}", msg.into()))
    }

    /// Whether this error is an [`InvalidInput`](VeracityError::InvalidInput).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, VeracityError::InvalidInput(_))
    }

    /// Whether this error is a [`NotReady`](VeracityError::NotReady).
    pub fn is_not_ready(&self) -> bool {
        matches!(self, VeracityError::NotReady(_))
    }
}
