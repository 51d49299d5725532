//! Data models for apk-versioning.
//!
//! - [`VersioningConfig`]: per-job settings (counter file, manifest path, environment variable names)
//! - [`VersionState`]: the version code/name resolved for one build
//! - [`VersioningStage`]: how far a build's versioning run got
//!
//! Configs derive `Serialize`/`Deserialize` so they round-trip through YAML via
//! [`ConfigManager`](crate::config::ConfigManager).

pub mod config;
pub mod version;

pub use self::config::{
    DEFAULT_MANIFEST_PATH, MANIFEST_PATH_MIN_LENGTH, ManifestPathCheck, VersioningConfig,
};
pub use version::{VersionState, VersioningStage};
