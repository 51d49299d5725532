// apk-versioning - stamp versionCode/versionName into AndroidManifest.xml during a build
//
// This is the library crate containing the versioning logic and data structures.
// The binary crate (main.rs) is a thin command-line host around `services::perform`.

pub mod config;
pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use crate::config::ConfigManager;
pub use models::{VersionState, VersioningConfig, VersioningStage};
pub use services::{BuildEnvironment, BuildLog, FailureReason, VersioningOutcome, perform};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
