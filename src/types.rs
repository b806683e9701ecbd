use serde::{Deserialize, Serialize};

/// Result of a `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetOutcome {
    /// Nothing was written: the path is invalid, its volume is not loaded,
    /// or it crosses a non-container value.
    Failed,
    /// The key did not exist and was created.
    Created,
    /// An existing value was overwritten.
    Replaced,
}

impl SetOutcome {
    pub fn succeeded(self) -> bool {
        self != SetOutcome::Failed
    }
}

/// Summary of a delete batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteOutcome {
    /// No requested key was deleted (also the result of an empty batch).
    None,
    /// Some, but not all, requested keys were deleted.
    Some,
    /// Every requested key was deleted.
    All,
}

impl DeleteOutcome {
    pub fn summarize(requested: usize, deleted: usize) -> Self {
        if deleted == 0 {
            DeleteOutcome::None
        } else if deleted == requested {
            DeleteOutcome::All
        } else {
            DeleteOutcome::Some
        }
    }
}

/// An options operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsAction {
    /// List every key of a volume (the default volume when `None`).
    List { volume: Option<String> },
    Get { key: String },
    /// Set `key` from a raw string, then save.
    Set { key: String, value: String },
    /// Delete a batch of keys, then save.
    Delete { keys: Vec<String> },
}
