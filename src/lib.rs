//! docl10n - Translation workflow for generated API documentation
//!
//! This library extracts translatable text from a documentation tree,
//! keeps translations in production and staging snapshots, and injects
//! approved translations back into the tree.

pub mod cli;
pub mod config;
pub mod extract;
pub mod inject;
pub mod model;
pub mod pipeline;
pub mod snapshot;

/// Re-export commonly used types
pub use config::Settings;
pub use extract::{Extraction, Fragment, Walker};
pub use inject::{InjectionReport, InjectionWarning};
pub use model::Reflection;
pub use pipeline::Mode;
pub use snapshot::{Snapshot, SnapshotStore};

/// Application-wide error type
pub use anyhow::Result;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "docl10n";
