//! Shared foundation: records and errors.
//!
//! - **config**: environment records, their sources and validation.
//! - **error**: configuration and application error enums.

pub mod config;
pub mod error;
