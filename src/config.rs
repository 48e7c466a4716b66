//! Configuration for revstore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, RevError};

/// Main configuration for a database directory
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the revision files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── v00000000      (revision 0)
    ///     ├── v00000001      (revision 1)
    ///     └── v.tmp          (only while a commit is in flight)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Recovery Configuration
    // -------------------------------------------------------------------------
    /// What to do when the newest revision file can't be decoded
    pub recovery_policy: RecoveryPolicy,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// fsync the directory after renaming a new revision into place
    pub sync_directory: bool,
}

/// Recovery behaviour when the newest revision file is unreadable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Fail the open (never silently resurrect older data)
    #[default]
    Strict,

    /// Skip corrupt or unknown-format files and use the newest one that decodes
    FallBackToOlder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./revstore_data"),
            recovery_policy: RecoveryPolicy::Strict,
            sync_directory: cfg!(unix),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(RevError::Config("data_dir must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the recovery policy
    pub fn recovery_policy(mut self, policy: RecoveryPolicy) -> Self {
        self.config.recovery_policy = policy;
        self
    }

    /// Enable or disable the directory fsync after each commit
    pub fn sync_directory(mut self, enabled: bool) -> Self {
        self.config.sync_directory = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
