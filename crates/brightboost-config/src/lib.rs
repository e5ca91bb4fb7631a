//! Configuration management for brightboost
//!
//! Operators tune the daemon through `CONFIG.prop`, a flat `key=value` file
//! that is re-read at the top of every cycle. Each read produces a fresh
//! [`ConfigSnapshot`]; nothing is carried over from the previous cycle, so a
//! key deleted from the file falls back to its default on the next cycle.
//!
//! Default brightness levels live next to the config in `yule/FDBRI` and
//! `yule/MAXBRI` and are read once at startup ([`DefaultLevels`]).

mod levels;
mod paths;
mod snapshot;
mod store;

pub use levels::{DefaultLevels, EffectiveLevels, read_int_or_zero};
pub use paths::ModulePaths;
pub use snapshot::{ConfigSnapshot, DISABLED_HOUR, RampMode, SleepWindow};
pub use store::ConfigStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: String, value: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
