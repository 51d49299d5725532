use std::fmt;

/// Version values resolved for a single build.
///
/// A `version_number` of 0 leaves `android:versionCode` untouched and an
/// empty `version_name` leaves `android:versionName` untouched. Numbers never
/// exceed `i64::MAX`; see `services::counter::MAX_VERSION_NUMBER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionState {
    pub version_number: u64,
    pub version_name: String,
}

impl VersionState {
    pub fn new(version_number: u64, version_name: impl Into<String>) -> Self {
        Self {
            version_number,
            version_name: version_name.into(),
        }
    }

    /// Whether the version code should be written to the manifest
    pub fn touches_version_code(&self) -> bool {
        self.version_number != 0
    }

    /// Whether the version name should be written to the manifest
    pub fn touches_version_name(&self) -> bool {
        !self.version_name.is_empty()
    }
}

impl fmt::Display for VersionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "versionNumber>>{}<< versionName>>{}<<",
            self.version_number, self.version_name
        )
    }
}

/// Progress of one versioning run.
///
/// Runs move strictly forward; a failure stops the run at whatever stage
/// was last reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersioningStage {
    Init,
    Resolved,
    ManifestUpdated,
    CounterAdvanced,
    Done,
}

impl fmt::Display for VersioningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersioningStage::Init => "init",
            VersioningStage::Resolved => "resolved",
            VersioningStage::ManifestUpdated => "manifest-updated",
            VersioningStage::CounterAdvanced => "counter-advanced",
            VersioningStage::Done => "done",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        let untouched = VersionState::new(0, "");
        assert!(!untouched.touches_version_code());
        assert!(!untouched.touches_version_name());

        let full = VersionState::new(7, "1.0.7");
        assert!(full.touches_version_code());
        assert!(full.touches_version_name());
    }

    #[test]
    fn test_display() {
        let state = VersionState::new(42, "2.1");
        assert_eq!(state.to_string(), "versionNumber>>42<< versionName>>2.1<<");
    }

    #[test]
    fn test_stage_order() {
        assert!(VersioningStage::Init < VersioningStage::Resolved);
        assert!(VersioningStage::ManifestUpdated < VersioningStage::CounterAdvanced);
        assert_eq!(VersioningStage::CounterAdvanced.to_string(), "counter-advanced");
    }
}
