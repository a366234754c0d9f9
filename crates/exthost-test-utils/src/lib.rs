//! Shared test utilities for the extension host workspace.
//!
//! This crate provides a temporary plugins directory fixture so each test
//! suite does not hand-roll its own. It is a dev-dependency only.
//!
//! # Modules
//!
//! - [`plugins`]: [`TestPlugins`](plugins::TestPlugins) fixture

pub mod plugins;

pub use plugins::TestPlugins;
