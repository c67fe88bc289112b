//! Common error handling utilities for the HealthCloud engine
//!
//! Provides the shared error enum and the stable error codes used across the
//! workspace, so callers of any engine crate see one error taxonomy.
//!
//! # Error Categories
//!
//! - **ValidationError**: Input validation and data format errors
//! - **BusinessError**: Domain rule violations
//! - **ExternalError**: Failures reported by external collaborators
//! - **ConfigError**: Invalid or unreadable configuration
//! - **InternalError**: Infrastructure and system-level errors
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, RustCareError};
//!
//! fn validate_transcript(data: &[u8]) -> Result<&str, RustCareError> {
//!     std::str::from_utf8(data)
//!         .map_err(|e| RustCareError::ValidationError(format!("{}: {}", codes::validation::INVALID_INPUT, e)))
//! }
//!
//! assert!(validate_transcript(b"Patient reports mild cough.").is_ok());
//! assert!(validate_transcript(&[0xff, 0xfe]).is_err());
//! ```

pub mod types;
pub mod codes;

pub use types::*;
