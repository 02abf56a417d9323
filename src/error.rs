use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, mutating or writing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to open {}: {source}", path.display())]
    FileNotOpened {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("the configuration file must be loaded first")]
    NotLoaded,

    #[error("invalid variable name: {name:?}")]
    InvalidName { name: String },

    /// The value contains the `;` delimiter, which the format cannot escape.
    #[error("value of {name:?} cannot contain ';'")]
    InvalidValue { name: String },
}

/// Errors raised by the strict typed accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("variable {name:?} is not defined")]
    Missing { name: String },

    #[error("variable {name:?} has {len} value(s), index {index} is out of range")]
    IndexOutOfRange {
        name: String,
        index: usize,
        len: usize,
    },

    #[error("cannot convert {token:?} from variable {name:?} to {expected}")]
    Invalid {
        name: String,
        token: String,
        expected: &'static str,
    },
}
