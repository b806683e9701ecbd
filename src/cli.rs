//! Clap adapter for optvol.
//!
//! Compiled only with the `clap` Cargo feature (on by default). Embed
//! [`OptionsArgs`] into your clap derive to get `list|get|set|delete`
//! subcommands over your option volumes; [`OptionsArgs::into_action()`] is the
//! only bridge to the core, producing an [`OptionsAction`] for
//! [`Options::handle()`](crate::Options::handle).

use clap::{Args, Subcommand};

use crate::ops::scoped;
use crate::types::OptionsAction;

/// Clap-derived args for an `options` subcommand group.
///
/// ```ignore
/// #[derive(Subcommand)]
/// enum Commands {
///     Options(OptionsArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct OptionsArgs {
    /// Volume to operate on instead of the default one (e.g. "Controls").
    ///
    /// Keys that already name a volume (`Controls/Jump`) are left as they are.
    #[arg(long, global = true)]
    pub volume: Option<String>,

    #[command(subcommand)]
    pub action: Option<OptionsSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum OptionsSubcommand {
    /// Show every key of the volume.
    List,
    /// Show the value stored at a key.
    Get {
        /// Colon key path (e.g. "Audio:Master Volume").
        key: String,
    },
    /// Store a value and save.
    Set {
        /// Colon key path (e.g. "Audio:Master Volume").
        key: String,
        /// Value; parsed as bool, integer, float, then string.
        value: String,
    },
    /// Delete keys and save. A final `*` segment clears a whole group.
    Delete {
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

impl OptionsArgs {
    /// Bare `options` (no subcommand) and `options list` both list.
    pub fn into_action(self) -> OptionsAction {
        let volume = self.volume;
        let action = match self.action {
            None | Some(OptionsSubcommand::List) => {
                return OptionsAction::List { volume };
            }
            Some(OptionsSubcommand::Get { key }) => OptionsAction::Get { key },
            Some(OptionsSubcommand::Set { key, value }) => OptionsAction::Set { key, value },
            Some(OptionsSubcommand::Delete { keys }) => OptionsAction::Delete { keys },
        };
        scoped(action, volume.as_deref())
    }
}
