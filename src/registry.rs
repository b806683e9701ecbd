//! The in-memory forest of volumes and their backing file locations.
//!
//! Each volume is keyed by name, so the registry can never hold two volumes
//! with the same name. A volume always has a file location; its root
//! container may be absent (unloaded), in which case saving skips it and
//! refreshing loads it again.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::value::Container;

#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    location: PathBuf,
    root: Option<Container>,
}

impl Volume {
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn root(&self) -> Option<&Container> {
        self.root.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    volumes: BTreeMap<String, Volume>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `root` as the volume `name`, recording `location` as its file.
    /// Replaces any existing volume of the same name, location included.
    pub fn install(&mut self, name: &str, location: &Path, root: Container) {
        self.volumes.insert(
            name.to_string(),
            Volume {
                location: location.to_path_buf(),
                root: Some(root),
            },
        );
    }

    /// Drop a volume's root container but keep its file location.
    pub fn unload(&mut self, name: &str) -> bool {
        match self.volumes.get_mut(name) {
            Some(volume) => volume.root.take().is_some(),
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Volume> {
        self.volumes.get(name)
    }

    pub fn root(&self, name: &str) -> Option<&Container> {
        self.volumes.get(name)?.root.as_ref()
    }

    pub fn root_mut(&mut self, name: &str) -> Option<&mut Container> {
        self.volumes.get_mut(name)?.root.as_mut()
    }

    pub fn location(&self, name: &str) -> Option<&Path> {
        self.volumes.get(name).map(|v| v.location.as_path())
    }

    /// Owned copy of the file-location table, safe to iterate while loading.
    pub fn locations(&self) -> Vec<(String, PathBuf)> {
        self.volumes
            .iter()
            .map(|(name, volume)| (name.clone(), volume.location.clone()))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.volumes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Volume)> {
        self.volumes.iter().map(|(name, volume)| (name.as_str(), volume))
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn clear(&mut self) {
        self.volumes.clear();
    }
}

/// Volume name for a file: its file name without the extension.
pub fn volume_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    if stem.is_empty() {
        None
    } else {
        Some(stem.into_owned())
    }
}
