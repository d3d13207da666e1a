//! Environment-aware notebook config manager.
//!
//! This module exports the core components for testing and integration.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod merge;
pub mod paths;
pub mod resolver;
pub mod store;

pub use error::{DiscoveryError, StoreError, StoreResult};
pub use paths::ConfigDirs;
pub use resolver::{ConfigResolver, Resolution, ResolvedLayer, SectionOutcome};
pub use store::{Document, DocumentStore, JsonFileStore};
