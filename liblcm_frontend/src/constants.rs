// Config file syntax
pub const COMMENT_PREFIXES: [&str; 2] = ["#", "//"];
pub const KEY_VALUE_SEPARATOR: char = '=';
pub const VALUE_TERMINATOR: char = ';';
pub const BACKUP_EXTENSION: &str = ".bak";

// Environment / default locations
pub const PROJECT_ROOT_VAR: &str = "PROJECT_ROOT";
pub const DEFAULT_PROJECT_ROOT: &str = "..";
pub const DEFAULT_CONFIG_NAME: &str = "lcm.conf";

// Trigger CSV export
pub const TRIGGER_ROW_COLUMNS: usize = 37;
pub const TIMESTAMP_LOW_COLUMN: usize = 25;
pub const TIMESTAMP_MID_COLUMN: usize = 26;
pub const TIMESTAMP_HIGH_COLUMN: usize = 27;
pub const CLOCK_FREQUENCY_HZ: f64 = 150.0e6;
