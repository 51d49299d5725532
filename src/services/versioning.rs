//! One versioning run: resolve, stamp the manifest, advance the counter.
//!
//! [`perform`] is the entry point the CLI calls once per build.

use crate::models::{VersionState, VersioningConfig, VersioningStage};
use crate::services::counter::{self, StoreError};
use crate::services::environment::{BuildEnvironment, workspace_path};
use crate::services::manifest::{ManifestDocument, ManifestError};
use crate::services::resolver::{self, ResolutionError};
use thiserror::Error;

/// Why a versioning run failed the build
#[derive(Error, Debug)]
pub enum FailureReason {
    #[error("Resolution failed: {0}")]
    ResolutionFailed(#[from] ResolutionError),

    #[error("Manifest update failed: {0}")]
    ManifestUpdateFailed(#[from] ManifestError),

    #[error("Counter write failed: {0}")]
    CounterWriteFailed(#[from] StoreError),
}

impl FailureReason {
    /// Short category name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            FailureReason::ResolutionFailed(_) => "ResolutionFailed",
            FailureReason::ManifestUpdateFailed(_) => "ManifestUpdateFailed",
            FailureReason::CounterWriteFailed(_) => "CounterWriteFailed",
        }
    }
}

/// Console output of a run, meant for the build log.
///
/// Every line is mirrored to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct BuildLog {
    lines: Vec<String>,
}

impl BuildLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::info!("{}", line);
        self.lines.push(line);
    }

    pub fn error(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::error!("{}", line);
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersioningOutcome {
    /// The version stamped into the manifest
    pub state: VersionState,

    /// Value written to the counter file, when auto-increment is on
    pub next_counter: Option<u64>,

    pub stage: VersioningStage,
}

/// Run versioning for one build.
///
/// Resolves the version, stamps it into the manifest and, with
/// auto-increment on, stores `version number + 1` in the counter file. The
/// first failure ends the run. Nothing is rolled back: a manifest written
/// before a failed counter write stays written.
pub fn perform(
    config: &VersioningConfig,
    env: &dyn BuildEnvironment,
    log: &mut BuildLog,
) -> Result<VersioningOutcome, FailureReason> {
    for line in config.describe() {
        log.info(line);
    }

    let mut stage = VersioningStage::Init;
    let result = run(config, env, log, &mut stage);

    match &result {
        Ok(_) => log.info("android apk versioning SUCCESS"),
        Err(reason) => log.error(format!(
            "android apk versioning FAILED after stage {}: [{}] {}",
            stage,
            reason.kind(),
            reason
        )),
    }
    result
}

fn run(
    config: &VersioningConfig,
    env: &dyn BuildEnvironment,
    log: &mut BuildLog,
    stage: &mut VersioningStage,
) -> Result<VersioningOutcome, FailureReason> {
    let state = resolver::resolve(config, env)?;
    log.info(state.to_string());
    advance(stage, VersioningStage::Resolved);

    let workspace = env.workspace_root();
    let manifest_path = workspace_path(&workspace, &config.manifest_path);
    let mut manifest = ManifestDocument::open(&manifest_path)?;

    if state.touches_version_code() {
        manifest.set_version_number(state.version_number)?;
        log.info(format!(
            "versionCode set to {} in {}",
            state.version_number, manifest_path
        ));
    }
    if state.touches_version_name() {
        manifest.set_version_name(&state.version_name)?;
        log.info(format!(
            "versionName set to {:?} in {}",
            state.version_name, manifest_path
        ));
    }
    advance(stage, VersioningStage::ManifestUpdated);

    let mut next_counter = None;
    if config.auto_increment_enabled {
        let next = counter::next_value(state.version_number)?;
        let counter_path = workspace_path(&workspace, &config.counter_file_path);

        // File mode requires the counter to exist already; environment mode may seed it
        counter::write(&counter_path, next, !config.read_from_file_enabled)?;
        log.info(format!("counter advanced to {} in {}", next, counter_path));

        next_counter = Some(next);
        advance(stage, VersioningStage::CounterAdvanced);
    }

    advance(stage, VersioningStage::Done);
    Ok(VersioningOutcome {
        state,
        next_counter,
        stage: *stage,
    })
}

fn advance(stage: &mut VersioningStage, next: VersioningStage) {
    tracing::debug!("versioning stage {} -> {}", stage, next);
    *stage = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::environment::StaticEnvironment;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"<manifest xmlns:android="http://schemas.android.com/apk/res/android" android:versionCode="1" android:versionName="0.1"/>"#;

    fn workspace() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        fs::write(root.join("AndroidManifest.xml"), MANIFEST).unwrap();
        (temp_dir, root)
    }

    #[test]
    fn test_failure_kinds() {
        let reason = FailureReason::from(ResolutionError::MissingEnvVar("X".to_string()));
        assert_eq!(reason.kind(), "ResolutionFailed");

        let reason = FailureReason::from(StoreError::CounterOverflow(counter::MAX_VERSION_NUMBER));
        assert_eq!(reason.kind(), "CounterWriteFailed");
    }

    #[test]
    fn test_zero_and_empty_leave_manifest_untouched() {
        let (_temp_dir, root) = workspace();
        let config = VersioningConfig {
            version_number_env_var: "BUILD_NUM".to_string(),
            version_name_env_var: "VERSION_NAME".to_string(),
            ..Default::default()
        };
        let env = StaticEnvironment::new(&root)
            .with_var("BUILD_NUM", "0")
            .with_var("VERSION_NAME", "");
        let mut log = BuildLog::new();

        let outcome = perform(&config, &env, &mut log).unwrap();

        assert_eq!(outcome.stage, VersioningStage::Done);
        assert_eq!(outcome.next_counter, None);
        assert_eq!(
            fs::read_to_string(root.join("AndroidManifest.xml")).unwrap(),
            MANIFEST
        );
    }

    #[test]
    fn test_log_records_config_and_result() {
        let (_temp_dir, root) = workspace();
        let config = VersioningConfig {
            version_number_env_var: "BUILD_NUM".to_string(),
            version_name_env_var: "VERSION_NAME".to_string(),
            ..Default::default()
        };
        let env = StaticEnvironment::new(&root)
            .with_var("BUILD_NUM", "9")
            .with_var("VERSION_NAME", "0.9");
        let mut log = BuildLog::new();

        perform(&config, &env, &mut log).unwrap();

        let text = log.lines().join("\n");
        assert!(text.contains("CONFIG"));
        assert!(text.contains("versionNumber>>9<< versionName>>0.9<<"));
        assert!(text.ends_with("android apk versioning SUCCESS"));
    }

    #[test]
    fn test_counter_overflow_fails_after_manifest_update() {
        let (_temp_dir, root) = workspace();
        let config = VersioningConfig {
            auto_increment_enabled: true,
            counter_file_path: "version.txt".to_string(),
            version_number_env_var: "BUILD_NUM".to_string(),
            version_name_env_var: "VERSION_NAME".to_string(),
            ..Default::default()
        };
        let env = StaticEnvironment::new(&root)
            .with_var("BUILD_NUM", counter::MAX_VERSION_NUMBER.to_string())
            .with_var("VERSION_NAME", "max");
        let mut log = BuildLog::new();

        let err = perform(&config, &env, &mut log).unwrap_err();

        assert!(matches!(
            err,
            FailureReason::CounterWriteFailed(StoreError::CounterOverflow(_))
        ));
        assert!(!root.join("version.txt").exists());
        let manifest = fs::read_to_string(root.join("AndroidManifest.xml")).unwrap();
        assert!(manifest.contains(&counter::MAX_VERSION_NUMBER.to_string()));
        assert!(log.lines().last().unwrap().contains("manifest-updated"));
    }
}
