//! The line-oriented `key = value;` store behind the calibration module configuration.
//!
//! A configuration file is read as a sequence of lines. A line is a *directive* when it
//! does not start with `#` or `//` and contains an `=`; everything else is passed through
//! untouched. Loading only keeps the directives (as a [`ConfigMap`]); saving re-reads the
//! file from disk and rewrites the directive values in place, so comments, blank lines
//! and ordering survive an edit.
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::constants::{BACKUP_EXTENSION, COMMENT_PREFIXES, KEY_VALUE_SEPARATOR, VALUE_TERMINATOR};
use super::error::ConfigStoreError;

/// What to do when the `.bak` copy cannot be written during a save
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackupPolicy {
    /// Warn and keep going (the historical behavior)
    #[default]
    BestEffort,
    /// Abort the save before the original file is overwritten
    Required,
}

/// A single `key = value` pair decoded from a directive line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

impl ConfigEntry {
    /// Decode a raw line. Returns None for pass-through lines.
    pub fn parse(line: &str) -> Option<Self> {
        if !is_directive(line) {
            return None;
        }
        let (key, rest) = line.split_once(KEY_VALUE_SEPARATOR)?;
        let value = match rest.split_once(VALUE_TERMINATOR) {
            Some((v, _)) => v,
            None => rest,
        };
        Some(Self {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        })
    }
}

/// Check if a raw line carries a key/value pair
pub fn is_directive(line: &str) -> bool {
    !COMMENT_PREFIXES.iter().any(|p| line.starts_with(p)) && line.contains(KEY_VALUE_SEPARATOR)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLine {
    Directive { raw: String, entry: ConfigEntry },
    PassThrough(String),
}

impl ConfigLine {
    fn raw(&self) -> &str {
        match self {
            Self::Directive { raw, .. } => raw,
            Self::PassThrough(raw) => raw,
        }
    }
}

/// The raw lines of a configuration file, terminators included, in file order
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    lines: Vec<ConfigLine>,
}

impl ConfigFile {
    /// Read and classify every line of the file at path
    pub fn read(path: &Path) -> Result<Self, ConfigStoreError> {
        if !path.exists() {
            return Err(ConfigStoreError::FileNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&contents))
    }

    pub fn from_text(contents: &str) -> Self {
        let lines = contents
            .split_inclusive('\n')
            .map(|raw| match ConfigEntry::parse(raw) {
                Some(entry) => ConfigLine::Directive {
                    raw: raw.to_string(),
                    entry,
                },
                None => ConfigLine::PassThrough(raw.to_string()),
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[ConfigLine] {
        &self.lines
    }

    /// Build the key/value map. Later duplicates overwrite earlier ones.
    pub fn to_map(&self) -> ConfigMap {
        let mut map = ConfigMap::default();
        for line in self.lines.iter() {
            if let ConfigLine::Directive { entry, .. } = line {
                map.set(&entry.key, &entry.value);
            }
        }
        map
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.lines.iter().any(|line| match line {
            ConfigLine::Directive { entry, .. } => entry.key == key,
            ConfigLine::PassThrough(_) => false,
        })
    }

    /// Render the file with the directive values replaced by those in map.
    ///
    /// Directives whose key is unchanged from the loaded map (or not in map at all) are
    /// emitted verbatim; edited directives become `key = value;` with the original line
    /// ending. Every occurrence of an edited duplicate key is rewritten.
    pub fn render(&self, map: &ConfigMap) -> String {
        let loaded = self.to_map();
        let mut text = String::new();
        for line in self.lines.iter() {
            match line {
                ConfigLine::Directive { raw, entry } => match map.get(&entry.key) {
                    Some(value) if Some(value) != loaded.get(&entry.key) => {
                        text.push_str(&format!(
                            "{} {KEY_VALUE_SEPARATOR} {}{VALUE_TERMINATOR}{}",
                            entry.key,
                            value,
                            line_ending(raw)
                        ));
                    }
                    _ => text.push_str(raw),
                },
                ConfigLine::PassThrough(_) => text.push_str(line.raw()),
            }
        }
        text
    }
}

fn line_ending(raw: &str) -> &'static str {
    if raw.ends_with("\r\n") {
        "\r\n"
    } else if raw.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// The editable key/value view of a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    map: FxHashMap<String, String>,
}

impl ConfigMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|v| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.map.keys()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Path of the backup copy written next to the configuration file
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(BACKUP_EXTENSION);
    PathBuf::from(name)
}

/// Load the configuration file at path into a fresh ConfigMap
pub fn load(path: &Path) -> Result<ConfigMap, ConfigStoreError> {
    let map = ConfigFile::read(path)?.to_map();
    spdlog::info!("Loaded {} keys from {}", map.len(), path.display());
    Ok(map)
}

/// Write map back into the configuration file at path.
///
/// The original file is re-read from disk and copied to `<path>.bak` before being
/// overwritten. Every key in map must already exist in the file.
pub fn save(path: &Path, map: &ConfigMap, policy: BackupPolicy) -> Result<(), ConfigStoreError> {
    let file = ConfigFile::read(path)?;
    if let Some(key) = map.keys().find(|k| !file.has_key(k)) {
        return Err(ConfigStoreError::UnknownKey(key.clone()));
    }
    let text = file.render(map);

    let bak = backup_path(path);
    if let Err(e) = std::fs::copy(path, &bak) {
        match policy {
            BackupPolicy::BestEffort => {
                spdlog::warn!("Could not write backup {}: {e}", bak.display())
            }
            BackupPolicy::Required => return Err(ConfigStoreError::BackupFailed(bak, e)),
        }
    }

    std::fs::write(path, text)?;
    spdlog::info!("Saved configuration to {}", path.display());
    Ok(())
}
