//! Filesystem helpers for the extension host
//!
//! Provides separator-normalized paths, atomic writes and a YAML/TOML
//! configuration store.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
