//! Environment configuration records.
//!
//! Records come from two places: the compiled-in registry (`development`)
//! and optional `<dir>/<target>.toml` files layered on top of it.
//!
//! # Module layout
//!
//! - **types**: Public record types handed to consumers
//!   (`EnvironmentConfig`, `AuthConfig`, `DeploymentTarget`).
//! - **raw**: Raw TOML deserialization types. All-optional so layers can
//!   be partial; kept private.
//! - **load**: Record sources: `builtin_registry`, `register_dir`,
//!   `register_str`, `resolve`, `expand_home`.
//! - **validate**: Shape checks from raw record to `EnvironmentConfig`.

mod load;
mod raw;
mod types;
mod validate;

pub use load::expand_home;
pub(crate) use load::{builtin_registry, register_dir, register_str, resolve, Registry};
pub use types::*;
