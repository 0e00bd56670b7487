use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::config_store::BackupPolicy;
use super::constants::{DEFAULT_CONFIG_NAME, DEFAULT_PROJECT_ROOT, PROJECT_ROOT_VAR};
use super::error::SettingsError;

/// Structure representing the front end settings: which configuration file to edit and how
/// to treat the backup copy. Settings are serializable and deserializable to YAML using
/// serde and serde_yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub config_path: PathBuf,
    #[serde(default)]
    pub backup_policy: BackupPolicy,
}

impl Default for Settings {
    /// Point at lcm.conf in the project root
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            backup_policy: BackupPolicy::default(),
        }
    }
}

impl Settings {
    /// Read the settings in a YAML file
    /// Returns Settings if successful
    pub fn read_settings_file(settings_path: &Path) -> Result<Self, SettingsError> {
        if !settings_path.exists() {
            return Err(SettingsError::BadFilePath(settings_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(settings_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the settings to a YAML file, replacing it if it exists
    pub fn write_settings_file(&self, settings_path: &Path) -> Result<(), SettingsError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(settings_path, yaml_str)?;
        Ok(())
    }
}

/// `$PROJECT_ROOT/lcm.conf`, with the project root defaulting to the parent directory
pub fn default_config_path() -> PathBuf {
    let root = std::env::var(PROJECT_ROOT_VAR).unwrap_or(String::from(DEFAULT_PROJECT_ROOT));
    PathBuf::from(root).join(DEFAULT_CONFIG_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yml");
        let settings = Settings {
            config_path: PathBuf::from("/data/lcm.conf"),
            backup_policy: BackupPolicy::Required,
        };
        settings.write_settings_file(&path).unwrap();
        assert_eq!(Settings::read_settings_file(&path).unwrap(), settings);
    }

    #[test]
    fn test_backup_policy_defaults() {
        let settings: Settings = serde_yaml::from_str("config_path: ./lcm.conf\n").unwrap();
        assert_eq!(settings.backup_policy, BackupPolicy::BestEffort);
    }

    #[test]
    fn test_missing_settings() {
        assert!(matches!(
            Settings::read_settings_file(Path::new("/no/such/settings.yml")),
            Err(SettingsError::BadFilePath(_))
        ));
    }
}
