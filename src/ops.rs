//! Options operations: listing, raw value parsing, and result types.
//!
//! Provides the logic behind `list`, `get`, `set`, and `delete` for callers
//! that work from strings (command lines, consoles, scripts), and the
//! `OptionsResult` enum they display.

use std::fmt;

use crate::error::OptionsError;
use crate::options::Options;
use crate::path::{SEGMENT_SEPARATOR, qualify};
use crate::types::{DeleteOutcome, OptionsAction, SetOutcome};
use crate::value::{Container, Value};

/// Result of an options operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsResult {
    /// A key's stored value.
    KeyValue { key: String, value: Value },
    /// Confirmation that a value was written and saved.
    ValueSet {
        key: String,
        value: Value,
        outcome: SetOutcome,
    },
    /// Summary of a delete batch.
    Deleted {
        keys: Vec<String>,
        outcome: DeleteOutcome,
    },
    /// Every leaf of a volume.
    Listing { entries: Vec<(String, Value)> },
}

impl fmt::Display for OptionsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsResult::KeyValue { key, value } => write!(f, "{key} = {value}"),
            OptionsResult::ValueSet {
                key,
                value,
                outcome,
            } => match outcome {
                SetOutcome::Created => write!(f, "Created {key} = {value}"),
                _ => write!(f, "Set {key} = {value}"),
            },
            OptionsResult::Deleted { keys, outcome } => match outcome {
                DeleteOutcome::All => write!(f, "Deleted {}", keys.join(", ")),
                DeleteOutcome::Some => write!(f, "Deleted some of {}", keys.join(", ")),
                DeleteOutcome::None => write!(f, "Nothing deleted"),
            },
            OptionsResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
        }
    }
}

impl Options {
    /// Run an `OptionsAction`. `set` and `delete` save afterwards.
    pub fn handle(&mut self, action: &OptionsAction) -> Result<OptionsResult, OptionsError> {
        match action {
            OptionsAction::List { volume } => {
                let volume = volume.clone().unwrap_or_else(|| self.default_volume());
                let entries = self
                    .entries(&volume)
                    .ok_or(OptionsError::UnknownVolume(volume))?;
                Ok(OptionsResult::Listing { entries })
            }
            OptionsAction::Get { key } => {
                let value = self
                    .try_get(key)
                    .cloned()
                    .ok_or_else(|| OptionsError::KeyNotFound(key.clone()))?;
                Ok(OptionsResult::KeyValue {
                    key: key.clone(),
                    value,
                })
            }
            OptionsAction::Set { key, value } => {
                let value = parse_raw_value(value);
                let outcome = self.set(key, value.clone());
                if !outcome.succeeded() {
                    return Err(OptionsError::Unwritable(key.clone()));
                }
                if !self.save() {
                    return Err(OptionsError::SaveFailed);
                }
                Ok(OptionsResult::ValueSet {
                    key: key.clone(),
                    value,
                    outcome,
                })
            }
            OptionsAction::Delete { keys } => {
                let outcome = self.delete_many(keys);
                if outcome != DeleteOutcome::None && !self.save() {
                    return Err(OptionsError::SaveFailed);
                }
                Ok(OptionsResult::Deleted {
                    keys: keys.clone(),
                    outcome,
                })
            }
        }
    }

    /// Run an `OptionsAction` and print the result to stdout.
    pub fn handle_and_print(&mut self, action: &OptionsAction) -> Result<(), OptionsError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }
}

/// Build an action whose keys are qualified with `volume` when they do not
/// name one themselves.
pub fn scoped(action: OptionsAction, volume: Option<&str>) -> OptionsAction {
    match action {
        OptionsAction::Get { key } => OptionsAction::Get {
            key: qualify(volume, &key),
        },
        OptionsAction::Set { key, value } => OptionsAction::Set {
            key: qualify(volume, &key),
            value,
        },
        OptionsAction::Delete { keys } => OptionsAction::Delete {
            keys: keys.iter().map(|key| qualify(volume, key)).collect(),
        },
        list @ OptionsAction::List { .. } => list,
    }
}

/// Flatten a container into `(colon:path, value)` pairs for every leaf.
/// Empty groups are kept as empty maps so they remain visible.
pub fn flatten(container: &Container) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(container, "", &mut out);
    out
}

fn flatten_into(container: &Container, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in container {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{SEGMENT_SEPARATOR}{key}")
        };
        match value {
            Value::Map(inner) if !inner.is_empty() => flatten_into(inner, &path, out),
            other => out.push((path, other.clone())),
        }
    }
}

/// Parse a raw string value with type heuristics.
/// Tries: bool → integer → float → string.
pub fn parse_raw_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    // Only use float if the string actually contains a dot,
    // to avoid "NaN" / "inf" being parsed as float.
    if s.contains('.')
        && let Ok(f) = s.parse::<f64>()
    {
        return Value::Float(f);
    }
    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{loaded_options, sample_root};
    use tempfile::TempDir;

    #[test]
    fn value_parsing() {
        assert_eq!(parse_raw_value("TRUE"), Value::Bool(true));
        assert_eq!(parse_raw_value("-5"), Value::Integer(-5));
        assert_eq!(parse_raw_value("0.8"), Value::Float(0.8));
        assert_eq!(parse_raw_value("NaN"), Value::from("NaN"));
        assert_eq!(parse_raw_value("Master Volume"), Value::from("Master Volume"));
    }

    #[test]
    fn flatten_nested() {
        let entries = flatten(&sample_root());
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"Device Name"));
        assert!(keys.contains(&"group:display:x"));
        assert!(keys.contains(&"group:one"));
        assert!(!keys.contains(&"group"));
    }

    #[test]
    fn flatten_keeps_empty_groups() {
        let mut root = Container::new();
        root.insert("empty".into(), Value::Map(Container::new()));
        assert_eq!(flatten(&root), vec![("empty".into(), Value::Map(Container::new()))]);
    }

    #[test]
    fn handle_set_get_and_persist() {
        let dir = TempDir::new().unwrap();
        let mut options = loaded_options(&dir);

        let set = OptionsAction::Set {
            key: "Audio:Master Volume".into(),
            value: "0.8".into(),
        };
        let result = options.handle(&set).unwrap();
        assert_eq!(
            result,
            OptionsResult::ValueSet {
                key: "Audio:Master Volume".into(),
                value: Value::Float(0.8),
                outcome: SetOutcome::Created,
            }
        );

        let text = std::fs::read_to_string(dir.path().join("Options.toml")).unwrap();
        assert!(text.contains("0.8"));

        let get = OptionsAction::Get {
            key: "Audio:Master Volume".into(),
        };
        assert_eq!(
            options.handle(&get).unwrap().to_string(),
            "Audio:Master Volume = 0.8"
        );
    }

    #[test]
    fn handle_get_missing_errors() {
        let dir = TempDir::new().unwrap();
        let mut options = loaded_options(&dir);
        let result = options.handle(&OptionsAction::Get { key: "nope".into() });
        assert!(matches!(result, Err(OptionsError::KeyNotFound(_))));
    }

    #[test]
    fn handle_set_unwritable_errors() {
        let dir = TempDir::new().unwrap();
        let mut options = loaded_options(&dir);
        let result = options.handle(&OptionsAction::Set {
            key: "a/b/c".into(),
            value: "1".into(),
        });
        assert!(matches!(result, Err(OptionsError::Unwritable(_))));
    }

    #[test]
    fn handle_delete_reports_outcome() {
        let dir = TempDir::new().unwrap();
        let mut options = loaded_options(&dir);
        options.set("a", 1);

        let result = options
            .handle(&OptionsAction::Delete {
                keys: vec!["a".into(), "b".into()],
            })
            .unwrap();
        assert_eq!(result.to_string(), "Deleted some of a, b");
    }

    #[test]
    fn handle_list_unknown_volume_errors() {
        let dir = TempDir::new().unwrap();
        let mut options = loaded_options(&dir);
        let result = options.handle(&OptionsAction::List {
            volume: Some("Missing".into()),
        });
        assert!(matches!(result, Err(OptionsError::UnknownVolume(_))));
    }

    #[test]
    fn handle_list_default_volume() {
        let dir = TempDir::new().unwrap();
        let mut options = loaded_options(&dir);
        options.set("b", 2);
        options.set("a:x", 1);

        let result = options.handle(&OptionsAction::List { volume: None }).unwrap();
        assert_eq!(result.to_string(), "a:x = 1\nb = 2");
    }

    #[test]
    fn scoped_qualifies_keys() {
        let action = scoped(
            OptionsAction::Delete {
                keys: vec!["Jump".into(), "Other/Crouch".into()],
            },
            Some("Controls"),
        );
        assert_eq!(
            action,
            OptionsAction::Delete {
                keys: vec!["Controls/Jump".into(), "Other/Crouch".into()]
            }
        );

        let list = scoped(OptionsAction::List { volume: None }, Some("Controls"));
        assert_eq!(list, OptionsAction::List { volume: None });
    }
}
