//! The options context: typed accessors, persistence, and lifecycle.
//!
//! Accessors are thin callers of the path resolver. None of them
//! return errors: a missing key, an unwritable path, or a value of the wrong
//! shape comes back as a sentinel (`None`, `false`, [`SetOutcome::Failed`],
//! the type's default), with details sent to `tracing`.

use std::fmt;
use std::path::Path;
use std::sync::mpsc::Receiver;

use tracing::{debug, warn};

use crate::builder::{DefaultFile, OptionsBuilder};
use crate::codec::Codec;
use crate::coerce::{Coercion, FromValue};
use crate::events::{OptionsEvent, SubscriptionId, Subscribers};
use crate::path::{KeyPath, WILDCARD};
use crate::registry::{self, Registry};
use crate::resolve::{self, Lookup};
use crate::types::{DeleteOutcome, SetOutcome};
use crate::value::{Container, Value};

/// An in-memory set of option volumes plus the file format used to persist
/// them.
///
/// ```ignore
/// let mut options = Options::builder().app_name("mygame").build()?;
/// options.initialize();
///
/// options.set("Audio:Master Volume", 0.8);
/// let volume: f32 = options.get_as_or("Audio:Master Volume", 1.0);
/// options.save();
/// ```
pub struct Options {
    registry: Registry,
    default_file: DefaultFile,
    codec: Box<dyn Codec>,
    coercion: Coercion,
    subscribers: Subscribers,
    initialized: bool,
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }

    pub(crate) fn from_parts(
        default_file: DefaultFile,
        codec: Box<dyn Codec>,
        coercion: Coercion,
    ) -> Self {
        Self {
            registry: Registry::new(),
            default_file,
            codec,
            coercion,
            subscribers: Subscribers::new(),
            initialized: false,
        }
    }

    // -- Lifecycle ------------------------------------------------------------

    /// Load the default volume if it is enabled and set to auto-load.
    ///
    /// Runs once per context; later calls do nothing and return `false`.
    /// Returns whether the default volume was loaded from its file.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;

        if self.default_file.auto_load() && self.default_file.enabled() {
            self.load_default()
        } else {
            false
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Save every volume, then drop them all from memory. The context can be
    /// initialized again afterwards.
    pub fn shutdown(&mut self) -> bool {
        let saved = self.save();
        self.registry.clear();
        self.initialized = false;
        saved
    }

    // -- Settings ---------------------------------------------------------------

    pub fn default_file(&self) -> &DefaultFile {
        &self.default_file
    }

    pub fn default_file_mut(&mut self) -> &mut DefaultFile {
        &mut self.default_file
    }

    /// Volume that key paths without a `volume/` selector resolve against.
    pub fn default_volume(&self) -> String {
        self.default_file.volume_name()
    }

    pub fn coercion(&self) -> Coercion {
        self.coercion
    }

    pub fn set_coercion(&mut self, coercion: Coercion) {
        self.coercion = coercion;
    }

    // -- Notifications ----------------------------------------------------------

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&OptionsEvent) + Send + 'static,
    {
        self.subscribers.subscribe(listener)
    }

    pub fn subscribe_channel(&mut self) -> (SubscriptionId, Receiver<OptionsEvent>) {
        self.subscribers.subscribe_channel()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // -- Reads --------------------------------------------------------------------

    /// The stored value at `key`, if any.
    ///
    /// A wildcard key has no single stored value and always reads as absent.
    pub fn try_get(&self, key: &str) -> Option<&Value> {
        match resolve::resolve(&self.registry, key, &self.default_volume()) {
            Lookup::Found { container, key: leaf } if leaf != WILDCARD => container.get(&leaf),
            _ => None,
        }
    }

    /// The stored value at `key`, or [`Value::Null`] if there is none.
    pub fn get(&self, key: &str) -> Value {
        self.try_get(key).cloned().unwrap_or_default()
    }

    /// The stored value at `key`. If absent, `default` is written there first
    /// (creating intermediate groups) and then read back. If that write
    /// fails, returns [`Value::Null`].
    pub fn get_or(&mut self, key: &str, default: impl Into<Value>) -> Value {
        if let Some(value) = self.try_get(key) {
            return value.clone();
        }
        if self.set(key, default).succeeded() {
            return self.get(key);
        }
        Value::Null
    }

    pub fn contains(&self, key: &str) -> bool {
        resolve::resolve(&self.registry, key, &self.default_volume()).outcome()
            == resolve::Outcome::Found
    }

    /// The value at `key` converted to `T`. A value of the wrong shape reads
    /// as absent.
    pub fn try_get_as<T: FromValue>(&self, key: &str) -> Option<T> {
        let value = self.try_get(key)?;
        match T::from_value(value, self.coercion) {
            Ok(typed) => Some(typed),
            Err(e) => {
                warn!(key, error = %e, "option has the wrong type");
                None
            }
        }
    }

    /// The value at `key` converted to `T`, or `T::default()`.
    pub fn get_as<T: FromValue + Default>(&self, key: &str) -> T {
        self.try_get_as(key).unwrap_or_default()
    }

    /// The value at `key` converted to `T`. If it is absent or has the wrong
    /// shape, `default` is written there and read back; if that write fails,
    /// returns `T::default()`.
    pub fn get_as_or<T>(&mut self, key: &str, default: T) -> T
    where
        T: FromValue + Into<Value> + Default,
    {
        if let Some(typed) = self.try_get_as(key) {
            return typed;
        }
        if self.set(key, default).succeeded() {
            return self.get_as(key);
        }
        T::default()
    }

    // -- Writes -------------------------------------------------------------------

    /// Write `value` at `key`, creating intermediate groups as needed.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> SetOutcome {
        let volume = self.default_volume();
        // Checked before walking so a rejected write creates no groups.
        if KeyPath::parse(key, &volume).is_ok_and(|path| path.is_wildcard()) {
            warn!(key, "cannot assign to a wildcard key");
            return SetOutcome::Failed;
        }
        let outcome = match resolve::resolve_mut(&mut self.registry, key, &volume, true) {
            Lookup::Found { container, key: leaf } => {
                container.insert(leaf, value.into());
                SetOutcome::Replaced
            }
            Lookup::ContainerOnly { container, key: leaf } => {
                container.insert(leaf, value.into());
                SetOutcome::Created
            }
            Lookup::NotFound => {
                warn!(key, "could not set option");
                SetOutcome::Failed
            }
        };

        if outcome.succeeded() {
            self.subscribers.publish(&OptionsEvent::Changed);
        }
        outcome
    }

    /// Delete one key. `true` only if it existed and was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.delete_many([key]) == DeleteOutcome::All
    }

    /// Delete a batch of keys. A final `*` segment clears its whole group.
    ///
    /// Keys that do not exist are skipped. One [`OptionsEvent::Changed`] is
    /// published after the batch if anything was deleted.
    pub fn delete_many<I, S>(&mut self, keys: I) -> DeleteOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let volume = self.default_volume();
        let mut requested = 0;
        let mut deleted = 0;

        for key in keys {
            let key = key.as_ref();
            requested += 1;
            match resolve::resolve_mut(&mut self.registry, key, &volume, false) {
                Lookup::Found { container, key: leaf } => {
                    if leaf == WILDCARD {
                        container.clear();
                    } else {
                        container.remove(&leaf);
                    }
                    debug!(key, "deleted option");
                    deleted += 1;
                }
                _ => debug!(key, "nothing to delete"),
            }
        }

        if deleted > 0 {
            self.subscribers.publish(&OptionsEvent::Changed);
        }
        DeleteOutcome::summarize(requested, deleted)
    }

    /// Clear every key of the default volume.
    pub fn delete_all(&mut self) -> bool {
        self.delete(WILDCARD)
    }

    // -- Persistence ----------------------------------------------------------------

    /// Load the default file.
    pub fn load_default(&mut self) -> bool {
        if !self.default_file.enabled() {
            warn!("the default file is disabled; enable it to use load_default()");
            return false;
        }
        let path = self.default_file.path().to_path_buf();
        self.load(path, true)
    }

    /// Load `path` as the volume named after its file stem, replacing any
    /// volume of that name.
    ///
    /// A file that is missing, empty of data, or unreadable still installs an
    /// empty volume; the return value (and the published
    /// [`OptionsEvent::VolumeLoaded`]) says whether data was read. What counts
    /// as data is the codec's call: an empty TOML file is a valid empty table
    /// and loads as `true`, while an empty or `null` JSON file loads as
    /// `false`. With `create_if_missing`, an empty file is written first.
    ///
    /// A path without a file stem names no volume: nothing is installed and
    /// no event is published.
    pub fn load(&mut self, path: impl AsRef<Path>, create_if_missing: bool) -> bool {
        let path = path.as_ref();
        let Some(volume) = registry::volume_name(path) else {
            warn!(path = %path.display(), "cannot derive a volume name");
            return false;
        };

        if create_if_missing
            && !path.exists()
            && let Err(e) = self.codec.write(path, &Container::new())
        {
            warn!(path = %path.display(), error = %e, "could not create options file");
        }

        let (root, succeeded) = match self.codec.read(path) {
            Ok(Some(root)) => (root, true),
            Ok(None) => {
                debug!(volume = %volume, path = %path.display(), "no options data; starting empty");
                (Container::new(), false)
            }
            Err(e) => {
                warn!(volume = %volume, path = %path.display(), error = %e, "could not read options file");
                (Container::new(), false)
            }
        };

        self.registry.install(&volume, path, root);
        debug!(volume = %volume, path = %path.display(), "added volume");

        self.subscribers
            .publish(&OptionsEvent::VolumeLoaded { volume, succeeded });
        succeeded
    }

    /// Write every loaded volume to its file. Unloaded volumes are skipped.
    /// Returns `false` if any write failed.
    pub fn save(&self) -> bool {
        let mut all_saved = true;
        for (name, volume) in self.registry.iter() {
            let Some(root) = volume.root() else {
                debug!(volume = name, "skipping unloaded volume");
                continue;
            };
            if let Err(e) = self.codec.write(volume.location(), root) {
                warn!(volume = name, error = %e, "could not save volume");
                all_saved = false;
            }
        }
        all_saved
    }

    /// Reload every known volume from disk, discarding unsaved changes.
    pub fn refresh(&mut self) {
        for (name, location) in self.registry.locations() {
            if !self.load(&location, true) {
                debug!(volume = %name, "volume refreshed without data");
            }
        }
    }

    /// Drop a volume's data from memory but remember its file, so `save`
    /// skips it and `refresh` loads it again.
    pub fn unload(&mut self, volume: &str) -> bool {
        self.registry.unload(volume)
    }

    // -- Inspection -----------------------------------------------------------------

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn volume_names(&self) -> Vec<String> {
        self.registry.names().map(str::to_string).collect()
    }

    pub fn volume(&self, name: &str) -> Option<&Container> {
        self.registry.root(name)
    }

    pub fn file_location(&self, volume: &str) -> Option<&Path> {
        self.registry.location(volume)
    }

    /// Every leaf of a volume as `(colon:path, value)` pairs, sorted by path.
    /// Empty groups are listed as empty maps. `None` if the volume is not loaded.
    pub fn entries(&self, volume: &str) -> Option<Vec<(String, Value)>> {
        self.registry.root(volume).map(crate::ops::flatten)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("registry", &self.registry)
            .field("default_file", &self.default_file)
            .field("codec", &self.codec.extension())
            .field("coercion", &self.coercion)
            .field("subscribers", &self.subscribers)
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, volume)) in self.registry.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{name}]")?;
            match volume.root() {
                Some(root) => {
                    for (key, value) in crate::ops::flatten(root) {
                        writeln!(f, "{key} = {value}")?;
                    }
                }
                None => writeln!(f, "<not loaded>")?,
            }
        }
        Ok(())
    }
}
