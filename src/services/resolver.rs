//! Working out which version code and name a build should stamp.
//!
//! Resolution only reads: the counter file (file mode) and the build
//! environment. Nothing is written here.

use crate::models::{VersionState, VersioningConfig};
use crate::services::counter::{self, StoreError};
use crate::services::environment::{BuildEnvironment, workspace_path};
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that stop a version from being resolved
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Counter file not found: {0}")]
    MissingCounterFile(Utf8PathBuf),

    #[error("Invalid version number from {source_name}: {value:?}")]
    InvalidCounterValue { source_name: String, value: String },

    #[error("Environment variable not available: {0}")]
    MissingEnvVar(String),

    #[error("Failed to read counter file {path}: {reason}")]
    CounterUnreadable { path: Utf8PathBuf, reason: String },
}

/// Resolve the version for this build from `config` and `env`.
///
/// File mode takes the number from the counter file; environment mode takes
/// it from `version_number_env_var`. The name always comes from
/// `version_name_env_var`.
pub fn resolve(
    config: &VersioningConfig,
    env: &dyn BuildEnvironment,
) -> Result<VersionState, ResolutionError> {
    let version_number = if config.read_from_file_enabled {
        let counter_path = workspace_path(&env.workspace_root(), &config.counter_file_path);
        read_counter(counter_path)?
    } else {
        let raw = read_env_var(env, &config.version_number_env_var, "version number")?;
        counter::parse_version_number(&raw).ok_or_else(|| {
            ResolutionError::InvalidCounterValue {
                source_name: format!("${}", config.version_number_env_var),
                value: raw.clone(),
            }
        })?
    };

    let version_name = read_env_var(env, &config.version_name_env_var, "version name")?;

    Ok(VersionState {
        version_number,
        version_name,
    })
}

fn read_counter(path: Utf8PathBuf) -> Result<u64, ResolutionError> {
    counter::read(&path).map_err(|e| match e {
        StoreError::FileNotFound(path) => ResolutionError::MissingCounterFile(path),
        StoreError::InvalidValue { path, value } => ResolutionError::InvalidCounterValue {
            source_name: path.to_string(),
            value,
        },
        other => ResolutionError::CounterUnreadable {
            path,
            reason: other.to_string(),
        },
    })
}

/// Look up a configured variable; an unconfigured name is as good as undefined.
fn read_env_var(
    env: &dyn BuildEnvironment,
    name: &str,
    role: &str,
) -> Result<String, ResolutionError> {
    if name.trim().is_empty() {
        return Err(ResolutionError::MissingEnvVar(format!(
            "<no {} variable configured>",
            role
        )));
    }

    env.env_var(name)
        .ok_or_else(|| ResolutionError::MissingEnvVar(name.to_string()))
}
