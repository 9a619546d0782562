//! Store layout constants

/// Default store directory under the project root
pub const DEFAULT_STORE_DIR: &str = ".origami";

/// Fold log document
pub const STATE_FILE: &str = "state.json";

/// Directory holding one detail blob per fold
pub const FOLDS_DIR: &str = "folds";

/// Store configuration file
pub const CONFIG_FILE: &str = "config.toml";

/// Suffix for in-flight writes before they are renamed into place
pub const TEMP_SUFFIX: &str = "tmp";
