//! Hierarchical, file-backed user options. Point at a file, address values by
//! path, save when you're done.
//!
//! ```ignore
//! let mut options = Options::builder().app_name("mygame").build()?;
//! options.initialize();
//!
//! options.set("Audio:Master Volume", 0.8);
//! let hdr: bool = options.get_as_or("Video:Display:HDR", false);
//! options.save();
//! ```
//!
//! `initialize()` loads `Options.toml` from the platform config directory
//! (`~/.config/mygame/` on Linux) into a volume named `Options`. Every read and
//! write after that addresses a key inside it.
//!
//! # Volumes
//!
//! A volume is one settings file held in memory as a tree of nested maps. Its
//! name is the file name without extension, so `Controls.toml` loads as the
//! volume `Controls`. An application can load as many volumes as it likes;
//! loading a second file with the same name replaces the first.
//!
//! One volume is the **default volume**: the one named after the default file.
//! Keys that don't name a volume resolve against it.
//!
//! # Key paths
//!
//! ```text
//! [volume/]segment(:segment)*
//! ```
//!
//! | Path | Volume | Groups | Key |
//! |------|--------|--------|-----|
//! | `Device Name` | default | |  `Device Name` |
//! | `Video:Resolution:X` | default | `Video` → `Resolution` | `X` |
//! | `Controls/Keyboard:Jump` | `Controls` | `Keyboard` | `Jump` |
//! | `Video:*` | default | `Video` | every key in `Video` |
//!
//! Every segment but the last names a nested group. Writes create missing
//! groups on the way down; they never write through a value that isn't a
//! group. A path with more than one `/` is rejected. There is no escaping, so
//! `/` and `:` cannot appear inside a key name.
//!
//! # Reads
//!
//! - [`get`](Options::get) / [`try_get`](Options::try_get) return the raw
//!   [`Value`] (or `Null` / `None`).
//! - [`get_as`](Options::get_as) / [`try_get_as`](Options::try_get_as) convert
//!   to a Rust type through [`FromValue`]. A value of the wrong shape reads as
//!   absent.
//! - [`get_or`](Options::get_or) / [`get_as_or`](Options::get_as_or) take a
//!   default. When the key is absent (or has the wrong shape), the default is
//!   **written back** to that key and then returned, so the first read of a
//!   new setting also creates it.
//!
//! Whether strings may stand in for numbers and booleans is a [`Coercion`]
//! policy chosen on the builder; the default is strict.
//!
//! # Writes and deletes
//!
//! [`set`](Options::set) reports [`SetOutcome::Created`],
//! [`Replaced`](SetOutcome::Replaced), or [`Failed`](SetOutcome::Failed).
//! [`delete_many`](Options::delete_many) reports whether
//! [`All`](DeleteOutcome::All), [`Some`](DeleteOutcome::Some), or
//! [`None`](DeleteOutcome::None) of a batch was deleted; deleting a key that
//! isn't there is not an error. A final `*` segment clears a whole group, and
//! [`delete_all`](Options::delete_all) clears the default volume.
//!
//! # Persistence
//!
//! Nothing touches the disk until you ask:
//!
//! - [`load`](Options::load) reads one file into a volume. A missing or
//!   unreadable file becomes an empty volume rather than an error; the return
//!   value tells you whether data was read.
//! - [`save`](Options::save) writes every loaded volume back to its file.
//! - [`refresh`](Options::refresh) reloads every volume from disk, dropping
//!   unsaved changes.
//!
//! The file format is a [`Codec`]: TOML by default ([`TomlCodec`]), or JSON
//! ([`JsonCodec`]), or your own.
//!
//! # Notifications
//!
//! [`subscribe`](Options::subscribe) registers a callback (or
//! [`subscribe_channel`](Options::subscribe_channel) a channel) that receives
//! an [`OptionsEvent`] after each successful write or delete batch and after
//! each load. Delivery is synchronous, on the thread that made the change.
//!
//! # Error handling
//!
//! Routine outcomes never surface as errors: the accessors return sentinels
//! and report details through `tracing`. [`OptionsError`] is returned by the
//! builder and by [`Options::handle`], the string-driven entry point behind
//! the optional clap adapter (`cli` module, `clap` feature).

pub mod error;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod codec;
mod coerce;
mod events;
mod ops;
mod options;
mod path;
mod registry;
mod resolve;
mod value;

#[cfg(test)]
mod fixtures;

pub use builder::{DEFAULT_FILE_NAME, DefaultFile, OptionsBuilder};
#[cfg(feature = "clap")]
pub use cli::{OptionsArgs, OptionsSubcommand};
pub use codec::{Codec, JsonCodec, TomlCodec};
pub use coerce::{Coercion, FromValue};
pub use error::OptionsError;
pub use events::{OptionsEvent, SubscriptionId};
pub use ops::{OptionsResult, flatten, parse_raw_value};
pub use options::Options;
pub use path::{KeyPath, SEGMENT_SEPARATOR, VOLUME_SEPARATOR, WILDCARD};
pub use registry::{Registry, Volume};
pub use resolve::{Lookup, Outcome, resolve, resolve_mut};
pub use types::{DeleteOutcome, OptionsAction, SetOutcome};
pub use value::{Container, Value};
