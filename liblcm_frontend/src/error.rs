use std::path::PathBuf;
use thiserror::Error;

use super::constants::TRIGGER_ROW_COLUMNS;

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Could not access configuration because file {0:?} does not exist")]
    FileNotFound(PathBuf),
    #[error("ConfigStore was asked to save key {0} which does not exist in the original file")]
    UnknownKey(String),
    #[error("ConfigStore failed to write backup {0:?}: {1}")]
    BackupFailed(PathBuf, std::io::Error),
    #[error("ConfigStore failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Input {text:?} for {field} is not a number")]
    NotANumber { field: String, text: String },
    #[error("{field} value {value} is not within [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} value {text:?} is not one of the allowed options {options:?}")]
    NotAnOption {
        field: String,
        text: String,
        options: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegisterError {
    #[error("Register range is degenerate -- domain [{0}, {1}], code [{2:#x}, {3:#x}]")]
    BadRange(f64, f64, u32, u32),
    #[error("Could not parse {0:?} as a hexadecimal register value")]
    BadRegister(String),
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Form could not be populated because field {0} is missing from the configuration file")]
    MissingField(String),
    #[error("Form failed due to validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Form failed due to register error: {0}")]
    Register(#[from] RegisterError),
    #[error("Form failed due to ConfigStore error: {0}")]
    Store(#[from] ConfigStoreError),
    #[error("Form has no field with key {0}")]
    UnknownField(String),
    #[error("Edit {0:?} is not of the form KEY=VALUE")]
    BadEdit(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Settings failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Settings failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum TriggerRateError {
    #[error("Could not open trigger data because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Trigger rate failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Trigger rate failed to parse an integer on row {0}: {1}")]
    ParsingError(usize, std::num::ParseIntError),
    #[error("Trigger rate needs at least two {cols}-column rows spanning a positive time; found {0} events spanning {1} ticks", cols=TRIGGER_ROW_COLUMNS)]
    InsufficientData(usize, i128),
}
