//! Reading and writing whole volume files.
//!
//! A [`Codec`] turns a file into a root [`Container`] and back. The registry
//! never looks at file contents itself, so the on-disk format is swappable:
//! [`TomlCodec`] is the default, [`JsonCodec`] is the alternative.
//!
//! `read` distinguishes "no data" (`Ok(None)`: missing file, or a document
//! whose root is an explicit null) from a broken file (`Err`). Callers
//! collapse both into an empty volume. An empty TOML document is a valid empty
//! table and reads as `Some`, empty.
//!
//! Writers create parent directories as needed.

use std::fs;
use std::path::Path;

use crate::error::OptionsError;
use crate::value::{Container, Value};

pub trait Codec: Send {
    /// File extension (without the dot) this codec conventionally uses.
    fn extension(&self) -> &'static str;

    fn read(&self, path: &Path) -> Result<Option<Container>, OptionsError>;

    fn write(&self, path: &Path, container: &Container) -> Result<(), OptionsError>;
}

/// Read a file to a string, mapping "does not exist" to `None`.
fn read_text(path: &Path) -> Result<Option<String>, OptionsError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(OptionsError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn write_text(path: &Path, text: &str) -> Result<(), OptionsError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| OptionsError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, text).map_err(|e| OptionsError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

// -- TOML -------------------------------------------------------------------------

/// TOML volumes. Null values have no TOML representation and are left out
/// when writing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl Codec for TomlCodec {
    fn extension(&self) -> &'static str {
        "toml"
    }

    fn read(&self, path: &Path) -> Result<Option<Container>, OptionsError> {
        let Some(text) = read_text(path)? else {
            return Ok(None);
        };
        let table: toml::Table = toml::from_str(&text).map_err(|e| OptionsError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Some(from_toml_table(table)))
    }

    fn write(&self, path: &Path, container: &Container) -> Result<(), OptionsError> {
        let table = to_toml_table(container);
        let text = toml::to_string_pretty(&table).map_err(|e| OptionsError::SerializeError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        write_text(path, &text)
    }
}

fn from_toml_table(table: toml::Table) -> Container {
    table
        .into_iter()
        .map(|(key, value)| (key, from_toml(value)))
        .collect()
}

fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Integer(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Map(from_toml_table(table)),
    }
}

fn to_toml_table(container: &Container) -> toml::Table {
    container
        .iter()
        .filter_map(|(key, value)| to_toml(value).map(|v| (key.clone(), v)))
        .collect()
}

fn to_toml(value: &Value) -> Option<toml::Value> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(toml::Value::Boolean(*b)),
        Value::Integer(i) => Some(toml::Value::Integer(*i)),
        Value::Float(f) => Some(toml::Value::Float(*f)),
        Value::String(s) => Some(toml::Value::String(s.clone())),
        Value::Sequence(items) => Some(toml::Value::Array(
            items.iter().filter_map(to_toml).collect(),
        )),
        Value::Map(map) => Some(toml::Value::Table(to_toml_table(map))),
    }
}

// -- JSON -------------------------------------------------------------------------

/// Pretty-printed JSON volumes. An empty file or a `null` document is "no data".
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn read(&self, path: &Path) -> Result<Option<Container>, OptionsError> {
        let Some(text) = read_text(path)? else {
            return Ok(None);
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str::<Option<Container>>(&text).map_err(|e| OptionsError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn write(&self, path: &Path, container: &Container) -> Result<(), OptionsError> {
        let text =
            serde_json::to_string_pretty(container).map_err(|e| OptionsError::SerializeError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        write_text(path, &text)
    }
}
