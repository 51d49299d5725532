use crate::models::{ManifestPathCheck, VersioningConfig};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File holding a job's versioning settings
pub const CONFIG_FILE_NAME: &str = "apk-versioning.yaml";

/// Prefix of environment variables overriding config fields (`APKVER_MANIFEST_PATH`, ...)
pub const ENV_PREFIX: &str = "APKVER";

/// Loads and saves the job's [`VersioningConfig`].
///
/// Settings come from `apk-versioning.yaml` in the config directory, with
/// `APKVER_*` environment variables layered on top.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager, creating `config_dir` if needed.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
            config_dir,
        })
    }

    /// Load the versioning config.
    ///
    /// A missing file yields the defaults (plus any environment overrides).
    pub fn load_versioning_config(&self) -> Result<VersioningConfig> {
        if !self.config_path.exists() {
            tracing::warn!(
                "Versioning config not found at {}, using defaults",
                self.config_path
            );
        }

        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(self.config_path.as_std_path())
                    .format(::config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read versioning config: {}", self.config_path))?;

        let config: VersioningConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse versioning config: {}", self.config_path))?;

        match config.check_manifest_path() {
            ManifestPathCheck::Ok => {}
            ManifestPathCheck::Warning(msg) => tracing::warn!("manifest_path: {}", msg),
            ManifestPathCheck::Error(msg) => tracing::error!("manifest_path: {}", msg),
        }

        tracing::info!("Loaded versioning config from {}", self.config_path);
        Ok(config)
    }

    /// Save the versioning config as YAML.
    pub fn save_versioning_config(&self, config: &VersioningConfig) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(config)
            .context("Failed to serialize versioning config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write versioning config: {}", self.config_path))?;

        tracing::info!("Saved versioning config to {}", self.config_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_create_config_manager_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = Utf8PathBuf::try_from(temp_dir.path().join("ci").join("versioning")).unwrap();

        let manager = ConfigManager::new(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(manager.config_path(), nested.join(CONFIG_FILE_NAME).as_path());
    }

    #[test]
    fn test_save_and_load_versioning_config() {
        let (manager, _temp_dir) = create_test_config_manager();

        let config = VersioningConfig {
            read_from_file_enabled: true,
            auto_increment_enabled: true,
            counter_file_path: "build/version.txt".to_string(),
            manifest_path: "app/src/main/AndroidManifest.xml".to_string(),
            version_number_env_var: "BUILD_NUMBER".to_string(),
            version_name_env_var: "VERSION_NAME".to_string(),
        };
        manager.save_versioning_config(&config).unwrap();

        let loaded = manager.load_versioning_config().unwrap();
        assert_eq!(loaded, config);
    }
}
