//! Bootstrap layer, run before the provider is built.
//!
//! - **logger**: tracing-subscriber initialisation.

pub mod logger;
