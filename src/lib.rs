#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

//! Read and write semicolon-terminated configuration files.
//!
//! ```text
//! # A comment runs to the end of the line.
//! MyVar 10;
//! MyArray 10 56 38 52 46;
//! MyMultilineValue Dear sir,
//! Yours faithfully;
//! ```
//!
//! Each definition is a name, a single space or tab, and a value running up to the next `;`.
//! Rewriting a loaded file keeps its comments and layout and only swaps the values.

pub mod codec;
mod error;
pub mod parser;
mod store;
mod value;

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub use crate::error::{ConfigError, ValueError};
pub use crate::parser::{COMMENT, DELIMITER};
pub use crate::store::{Entry, Store};
pub use crate::value::ConfigValue;

/// Byte Order Mark (BOM) is used to signal the endianness of an encoding. The order `0xFF 0xFE`
/// strongly suggests that the encoding is using little-endian byte order.
///
/// <https://en.wikipedia.org/wiki/Byte_order_mark>
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Width of the name column, dashes included, in [`ConfigFile::dump`].
const DUMP_COLUMN: usize = 28;

/// How [`ConfigFile::write_to_file_with`] lays out the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Reuse the comments and whitespace of the loaded file, appending new variables at the end.
    Preserve,
    /// One `name value;` line per variable.
    Canonical,
}

/// Entry order used by [`ConfigFile::dump`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DumpOrder {
    #[default]
    ByName,
    Stored,
}

/// A configuration file loaded in memory.
#[derive(Debug, Default)]
pub struct ConfigFile {
    path: Option<PathBuf>,
    store: Store,
    /// Text of the loaded file, kept as a template for [`RenderMode::Preserve`].
    source: Option<String>,
}

impl ConfigFile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and parse the file at `path`, replacing anything previously loaded.
    ///
    /// With `create_if_missing`, a missing file is created empty and loads as an empty
    /// configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::FileNotFound`] if the file does not exist and may not be created, and
    /// [`ConfigError::FileNotOpened`] if it cannot be read or created.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        create_if_missing: bool,
    ) -> Result<(), ConfigError> {
        let path = path.as_ref();

        let text = match fs::read(path) {
            Ok(data) => decode_data(&data),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                if !create_if_missing {
                    return Err(ConfigError::FileNotFound {
                        path: path.to_owned(),
                    });
                }

                debug!(path = %path.display(), "creating missing configuration file");
                fs::File::create(path).map_err(|source| ConfigError::FileNotOpened {
                    path: path.to_owned(),
                    source,
                })?;
                String::new()
            }
            Err(source) => {
                return Err(ConfigError::FileNotOpened {
                    path: path.to_owned(),
                    source,
                });
            }
        };

        self.store = codec::parse(&text);
        self.source = Some(text);
        self.path = Some(path.to_owned());
        debug!(path = %path.display(), entries = self.store.len(), "loaded configuration");

        Ok(())
    }

    /// Write the configuration to `path`, or back to the loaded file if `None`.
    ///
    /// Writing to the loaded file keeps its comments and layout; any other destination receives a
    /// canonical rendering.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotLoaded`] if `path` is `None` and nothing was loaded, and
    /// [`ConfigError::FileNotOpened`] if the destination cannot be written.
    pub fn write_to_file(&self, path: Option<&Path>) -> Result<(), ConfigError> {
        let mode = match (path, self.path.as_deref()) {
            (Some(target), Some(loaded)) if target != loaded => RenderMode::Canonical,
            _ => RenderMode::Preserve,
        };

        self.write_to_file_with(path, mode)
    }

    /// Like [`ConfigFile::write_to_file`], with an explicit [`RenderMode`].
    ///
    /// [`RenderMode::Preserve`] falls back to a canonical rendering when no file was loaded.
    ///
    /// # Errors
    ///
    /// See [`ConfigFile::write_to_file`].
    pub fn write_to_file_with(
        &self,
        path: Option<&Path>,
        mode: RenderMode,
    ) -> Result<(), ConfigError> {
        let target = path
            .or(self.path.as_deref())
            .ok_or(ConfigError::NotLoaded)?;

        let text = self.render(mode);

        debug!(
            path = %target.display(),
            ?mode,
            entries = self.store.len(),
            "writing configuration"
        );
        fs::write(target, text).map_err(|source| ConfigError::FileNotOpened {
            path: target.to_owned(),
            source,
        })
    }

    /// Render the configuration as text without touching the filesystem.
    #[must_use]
    pub fn render(&self, mode: RenderMode) -> String {
        match (mode, self.source.as_deref()) {
            (RenderMode::Preserve, Some(source)) => codec::render(source, &self.store),
            _ => codec::render_canonical(&self.store),
        }
    }

    /// True when at least one variable is defined.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        !self.store.is_empty()
    }

    /// Forget every variable and the loaded path.
    pub fn unload(&mut self) {
        self.path = None;
        self.source = None;
        self.store.clear();
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The raw value of `name`, e.g. `"10"`, `"Thibaut CHARLES"` or `"10.5 18.0 80.6"`.
    #[must_use]
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.store.get(name)
    }

    /// The `index`-th token of `name` converted to `T`.
    ///
    /// Returns `T::default()` if the variable is missing, the index is out of range or the token
    /// does not convert. Use [`ConfigFile::try_get_value`] to tell these apart.
    ///
    /// With `MyArray 10 56 38 52 46;`, `get_value::<i32>("MyArray", 3)` is `52`; with
    /// `MyWord azerty;`, `get_value::<char>("MyWord", 2)` is `'e'`.
    #[must_use]
    pub fn get_value<T>(&self, name: &str, index: usize) -> T
    where
        T: ConfigValue + Default,
    {
        match self.try_get_value(name, index) {
            Ok(value) => value,
            Err(ValueError::Missing { .. }) => T::default(),
            Err(err) => {
                warn!(%err, "using default value");
                T::default()
            }
        }
    }

    /// # Errors
    ///
    /// A [`ValueError`] if the variable is missing, has fewer than `index + 1` tokens, or the token
    /// does not convert to `T`.
    pub fn try_get_value<T: ConfigValue>(&self, name: &str, index: usize) -> Result<T, ValueError> {
        let raw = self.store.get(name).ok_or_else(|| ValueError::Missing {
            name: name.to_owned(),
        })?;
        let tokens = T::tokens(raw);
        let token = tokens.get(index).ok_or_else(|| ValueError::IndexOutOfRange {
            name: name.to_owned(),
            index,
            len: tokens.len(),
        })?;

        convert(name, token)
    }

    /// Every token of `name` converted to `T`, in order. Tokens that do not convert become
    /// `T::default()`; a missing or empty variable gives an empty vector.
    #[must_use]
    pub fn get_array<T>(&self, name: &str) -> Vec<T>
    where
        T: ConfigValue + Default,
    {
        let Some(raw) = self.store.get(name) else {
            return Vec::new();
        };

        T::tokens(raw)
            .into_iter()
            .map(|token| {
                convert(name, token).unwrap_or_else(|err| {
                    warn!(%err, "using default value");
                    T::default()
                })
            })
            .collect()
    }

    /// # Errors
    ///
    /// [`ValueError::Missing`] if the variable is not defined, or the first conversion failure.
    pub fn try_get_array<T: ConfigValue>(&self, name: &str) -> Result<Vec<T>, ValueError> {
        let raw = self.store.get(name).ok_or_else(|| ValueError::Missing {
            name: name.to_owned(),
        })?;

        T::tokens(raw)
            .into_iter()
            .map(|token| convert(name, token))
            .collect()
    }

    /// Set the raw value of `name`, adding the variable if it does not exist yet.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidName`] if `name` is empty, starts with the comment marker or contains
    /// whitespace or `;`, and [`ConfigError::InvalidValue`] if `value` contains `;`.
    pub fn set_raw(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid_name = name.is_empty()
            || name.starts_with(COMMENT)
            || name.contains(|c: char| c.is_whitespace() || c == DELIMITER);

        if invalid_name {
            return Err(ConfigError::InvalidName {
                name: name.to_owned(),
            });
        }

        if value.contains(DELIMITER) {
            return Err(ConfigError::InvalidValue {
                name: name.to_owned(),
            });
        }

        self.store.set(name, value);
        Ok(())
    }

    /// Set `name` to the textual form of `value`.
    ///
    /// # Errors
    ///
    /// See [`ConfigFile::set_raw`].
    pub fn set_value<T: ConfigValue>(&mut self, name: &str, value: &T) -> Result<(), ConfigError> {
        self.set_raw(name, &value.to_token())
    }

    /// Format the loaded configuration for display.
    #[must_use]
    pub fn dump(&self, order: DumpOrder) -> String {
        let mut out = String::new();
        let path = self
            .path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_default();

        _ = writeln!(out, ">>>>>>>>>>>>>> ConfigFile >>>>>>>>>>>>>>");
        _ = writeln!(out, "Loaded from '{path}'");
        _ = writeln!(out, "Data:");

        let entries = self
            .store
            .entries()
            .iter()
            .map(|entry| (entry.name(), entry.value()));

        let mut write_entry = |(name, value): (&str, &str)| {
            let dashes = DUMP_COLUMN.saturating_sub(name.chars().count() + 2);
            _ = writeln!(out, "{name}  {}  {value}", "-".repeat(dashes));
        };

        match order {
            DumpOrder::ByName => entries
                .collect::<BTreeMap<_, _>>()
                .into_iter()
                .for_each(&mut write_entry),
            DumpOrder::Stored => entries.for_each(&mut write_entry),
        }

        _ = writeln!(out, "<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<");
        out
    }
}

fn convert<T: ConfigValue>(name: &str, token: &str) -> Result<T, ValueError> {
    T::from_token(token).ok_or_else(|| ValueError::Invalid {
        name: name.to_owned(),
        token: token.to_owned(),
        expected: T::EXPECTED,
    })
}

// Files written by this crate are UTF-8, but hand-edited files on Windows are often saved as
// UTF-16 LE with a BOM.
fn decode_data(data: &[u8]) -> String {
    if let Some(data) = data.strip_prefix(BOM_UTF16_LE) {
        let utf16 = data
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .collect::<Vec<u16>>();

        char::decode_utf16(utf16)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect::<String>()
    } else {
        let data = data.strip_prefix(BOM_UTF8).unwrap_or(data);
        String::from_utf8_lossy(data).into_owned()
    }
}
