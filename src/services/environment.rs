//! The slice of the build host that versioning needs: a workspace root and
//! environment variables.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;

/// Access to the invoking build's workspace and environment.
#[cfg_attr(test, mockall::automock)]
pub trait BuildEnvironment {
    /// Root directory that configured paths are relative to
    fn workspace_root(&self) -> Utf8PathBuf;

    /// Value of an environment variable, `None` if undefined
    fn env_var(&self, name: &str) -> Option<String>;
}

/// Reads variables from the current process environment.
#[derive(Debug, Clone)]
pub struct ProcessEnvironment {
    workspace: Utf8PathBuf,
}

impl ProcessEnvironment {
    pub fn new<P: AsRef<Utf8Path>>(workspace: P) -> Self {
        Self {
            workspace: workspace.as_ref().to_path_buf(),
        }
    }
}

impl BuildEnvironment for ProcessEnvironment {
    fn workspace_root(&self) -> Utf8PathBuf {
        self.workspace.clone()
    }

    fn env_var(&self, name: &str) -> Option<String> {
        // Non-UTF-8 values are treated as undefined
        std::env::var(name).ok()
    }
}

/// A fixed snapshot of variables, for hosts that hand over an explicit
/// environment.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    workspace: Utf8PathBuf,
    vars: IndexMap<String, String>,
}

impl StaticEnvironment {
    pub fn new<P: AsRef<Utf8Path>>(workspace: P) -> Self {
        Self {
            workspace: workspace.as_ref().to_path_buf(),
            vars: IndexMap::new(),
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn vars(&self) -> &IndexMap<String, String> {
        &self.vars
    }
}

impl BuildEnvironment for StaticEnvironment {
    fn workspace_root(&self) -> Utf8PathBuf {
        self.workspace.clone()
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Join a configured path onto the workspace root.
///
/// The configured path is always treated as a suffix of the workspace, even
/// when it starts with a separator.
pub fn workspace_path(root: &Utf8Path, relative: &str) -> Utf8PathBuf {
    root.join(relative.trim_start_matches(['/', '\\']))
}
