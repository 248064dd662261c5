// src/types.rs

/// Parameter that opts a configuration in as an owner of automatically
/// managed snapshot dependencies.
pub const OPT_IN_KEY: &str = "AutoSetSnapshotDependenciesFromIvy";

/// Parameter that stops a configuration from being picked as a dependency
/// target by any owner.
pub const OPT_OUT_KEY: &str = "DisableAutoDependFromMe";

/// Changed files whose path ends with this are treated as descriptors.
pub const DESCRIPTOR_FILE_NAME: &str = "ivy.xml";

/// Glob used to find a configuration's published descriptor among its
/// build artifacts. `*` crosses directory separators.
pub const ARTIFACT_PATTERN: &str = "ivy*.xml";

/// Parameter names that control auto-management for a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyKeys {
    pub opt_in: String,
    pub opt_out: String,
}

impl Default for PolicyKeys {
    fn default() -> Self {
        Self {
            opt_in: OPT_IN_KEY.to_string(),
            opt_out: OPT_OUT_KEY.to_string(),
        }
    }
}
