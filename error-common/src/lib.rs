//! Common error handling utilities for the triage inference service
//!
//! This crate holds the pieces every other crate in the workspace agrees on:
//!
//! - **Error Codes**: stable identifiers returned to API clients so they can
//!   branch on failure kind without parsing messages
//! - **Start-up Errors**: [`TriageError`], the process-level error returned
//!   from `main` when configuration, artifact loading or socket binding fails
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, TriageError};
//!
//! fn require_port(raw: &str) -> Result<u16, TriageError> {
//!     raw.parse()
//!         .map_err(|_| TriageError::ConfigError(format!("invalid port: {raw}")))
//! }
//!
//! assert!(require_port("5001").is_ok());
//! assert_eq!(codes::encoding::UNKNOWN_CATEGORY, "ENCODING_2001");
//! ```

pub mod codes;
pub mod types;

pub use types::*;
