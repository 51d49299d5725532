use serde::{Deserialize, Serialize};

/// Default manifest location relative to the workspace root.
pub const DEFAULT_MANIFEST_PATH: &str = "AndroidManifest.xml";

/// Manifest paths shorter than this are suspicious ("AndroidManifest.xml" is 19).
pub const MANIFEST_PATH_MIN_LENGTH: usize = 14;

/// Versioning settings for one job definition.
///
/// Built once by the host and passed into every build. Paths are relative to
/// the build workspace; empty strings mean "not configured".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersioningConfig {
    /// Take the version number from the counter file instead of the environment
    pub read_from_file_enabled: bool,

    /// Write `version number + 1` to the counter file after a successful update
    pub auto_increment_enabled: bool,

    /// Counter file, relative to the workspace root
    pub counter_file_path: String,

    /// AndroidManifest.xml, relative to the workspace root
    pub manifest_path: String,

    /// Environment variable holding the version number (environment mode only)
    pub version_number_env_var: String,

    /// Environment variable holding the version name (always consulted)
    pub version_name_env_var: String,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            read_from_file_enabled: false,
            auto_increment_enabled: false,
            counter_file_path: String::new(),
            manifest_path: DEFAULT_MANIFEST_PATH.to_string(),
            version_number_env_var: String::new(),
            version_name_env_var: String::new(),
        }
    }
}

/// Outcome of the advisory manifest path check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestPathCheck {
    Ok,
    Warning(String),
    Error(String),
}

impl VersioningConfig {
    /// Validate the manifest path the way the job configuration form does.
    ///
    /// Never consulted by the build itself; a bad path fails later when the
    /// manifest cannot be opened.
    pub fn check_manifest_path(&self) -> ManifestPathCheck {
        let path = self.manifest_path.trim();
        if path.is_empty() {
            ManifestPathCheck::Error("Path to AndroidManifest.xml can not be empty".to_string())
        } else if path.chars().count() < MANIFEST_PATH_MIN_LENGTH {
            ManifestPathCheck::Warning(format!(
                "Isn't the name too short? ({} is under {} characters)",
                path, MANIFEST_PATH_MIN_LENGTH
            ))
        } else {
            ManifestPathCheck::Ok
        }
    }

    /// Lines describing the effective configuration, for the build log.
    pub fn describe(&self) -> Vec<String> {
        vec![
            "********* AndroidApkVersioning - CONFIG *********".to_string(),
            format!("env var to read version number from: {:?}", self.version_number_env_var),
            format!("env var to read version name from: {:?}", self.version_name_env_var),
            format!("read version number from file: {}", self.read_from_file_enabled),
            format!("auto-increment version number: {}", self.auto_increment_enabled),
            format!("counter file path: {:?}", self.counter_file_path),
            format!("AndroidManifest file path: {:?}", self.manifest_path),
            "********* CONFIG END *********".to_string(),
        ]
    }
}
