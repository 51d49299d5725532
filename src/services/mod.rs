//! Services module - the versioning logic, free of any build-host glue.
//!
//! # Components
//!
//! - [`environment`]: the [`BuildEnvironment`] seam (workspace root + variables)
//!   and workspace-relative path handling
//! - [`counter`]: the persisted build counter file
//! - [`manifest`]: [`ManifestDocument`], which edits `android:versionCode` and
//!   `android:versionName` on the manifest's root element
//! - [`resolver`]: picks the version for a build from the counter file or the
//!   environment, read-only
//! - [`versioning`]: [`perform`], the per-build entry point tying the above together
//!
//! # Flow of one build
//!
//! ```text
//! Init --resolve--> Resolved --stamp manifest--> ManifestUpdated
//!      --write counter (auto-increment only)--> CounterAdvanced --> Done
//! ```
//!
//! Any step can fail the build with a [`FailureReason`]. Steps already
//! written to disk stay written.
//!
//! # Usage Example
//!
//! ```ignore
//! use apk_versioning::services::{perform, BuildLog, ProcessEnvironment};
//!
//! let env = ProcessEnvironment::new("/var/builds/app");
//! let mut log = BuildLog::new();
//! let outcome = perform(&config, &env, &mut log)?;
//! ```

pub mod counter;
pub mod environment;
pub mod manifest;
pub mod resolver;
pub mod versioning;

pub use counter::StoreError;
pub use environment::{BuildEnvironment, ProcessEnvironment, StaticEnvironment, workspace_path};
pub use manifest::{ANDROID_NS, ManifestDocument, ManifestError};
pub use resolver::{ResolutionError, resolve};
pub use versioning::{BuildLog, FailureReason, VersioningOutcome, perform};
