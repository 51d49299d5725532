//! apk-versioning - command-line build step.
//!
//! Stamps `android:versionCode` / `android:versionName` into a workspace's
//! AndroidManifest.xml and optionally advances a persisted build counter.
//!
//! # Execution Flow
//!
//! 1. Initialize logging (stderr, plus rotating files with `--log-dir`)
//! 2. Load `apk-versioning.yaml` from `--config-dir` (APKVER_* variables override it)
//! 3. Apply command-line overrides, optionally saving the result (`--save-config`)
//! 4. Run [`apk_versioning::perform`] against the process environment
//! 5. Print the build log to stdout; exit 1 if versioning failed
//!
//! # Example
//!
//! ```text
//! apk-versioning --workspace . --manifest app/src/main/AndroidManifest.xml \
//!     --version-number-var BUILD_NUMBER --version-name-var VERSION_NAME
//! ```

use anyhow::Result;
use apk_versioning::services::ProcessEnvironment;
use apk_versioning::{APP_NAME, BuildLog, ConfigManager, VERSION, VersioningConfig};
use camino::Utf8PathBuf;
use clap::Parser;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "apk-versioning", version, about)]
struct Cli {
    /// Build workspace that manifest and counter paths are relative to
    #[arg(long, default_value = ".")]
    workspace: Utf8PathBuf,

    /// Directory holding apk-versioning.yaml
    #[arg(long, default_value = ".")]
    config_dir: Utf8PathBuf,

    /// Also write rotating log files to this directory
    #[arg(long)]
    log_dir: Option<Utf8PathBuf>,

    /// Debug-level diagnostics
    #[arg(short, long)]
    verbose: bool,

    /// Read the version number from the counter file
    #[arg(long)]
    read_from_file: Option<bool>,

    /// Write version number + 1 to the counter file afterwards
    #[arg(long)]
    auto_increment: Option<bool>,

    /// Counter file, relative to the workspace
    #[arg(long)]
    counter_file: Option<String>,

    /// AndroidManifest.xml, relative to the workspace
    #[arg(long)]
    manifest: Option<String>,

    /// Environment variable holding the version number
    #[arg(long)]
    version_number_var: Option<String>,

    /// Environment variable holding the version name
    #[arg(long)]
    version_name_var: Option<String>,

    /// Persist the effective configuration to apk-versioning.yaml
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut VersioningConfig) {
        if let Some(enabled) = self.read_from_file {
            config.read_from_file_enabled = enabled;
        }
        if let Some(enabled) = self.auto_increment {
            config.auto_increment_enabled = enabled;
        }
        if let Some(path) = &self.counter_file {
            config.counter_file_path = path.clone();
        }
        if let Some(path) = &self.manifest {
            config.manifest_path = path.clone();
        }
        if let Some(name) = &self.version_number_var {
            config.version_number_env_var = name.clone();
        }
        if let Some(name) = &self.version_name_var {
            config.version_name_env_var = name.clone();
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _guard = apk_versioning::logging::init_logging(cli.log_dir.as_deref(), cli.verbose)?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let mut config = config_manager.load_versioning_config()?;
    cli.apply_overrides(&mut config);

    if cli.save_config {
        config_manager.save_versioning_config(&config)?;
    }

    let env = ProcessEnvironment::new(&cli.workspace);
    let mut log = BuildLog::new();
    let result = apk_versioning::perform(&config, &env, &mut log);

    for line in log.lines() {
        println!("{}", line);
    }

    match result {
        Ok(outcome) => {
            tracing::debug!("Versioning finished at stage {}", outcome.stage);
            Ok(ExitCode::SUCCESS)
        }
        Err(reason) => {
            tracing::debug!("Versioning failed: {:?}", reason);
            Ok(ExitCode::FAILURE)
        }
    }
}
