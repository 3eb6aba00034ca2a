//! Configuration module for hatrack
//!
//! Provides types and loading for `hatrack.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
