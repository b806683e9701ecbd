//! Path resolution: find the container that holds a key path's final segment.
//!
//! Both read and write operations go through here. A resolution is one-shot
//! and stateless, and classifies what it found into an [`Outcome`]:
//!
//! - [`NotFound`](Outcome::NotFound): the path is invalid, the volume is not
//!   loaded, an intermediate container is missing (and creation was not
//!   requested), or an intermediate segment holds a non-container value.
//! - [`ContainerOnly`](Outcome::ContainerOnly): every intermediate container
//!   exists, but the final key does not.
//! - [`Found`](Outcome::Found): the final key exists, or it is the wildcard
//!   `*`, which always counts as present.
//!
//! With `create_missing`, [`resolve_mut`] inserts an empty container for every
//! missing intermediate segment as it walks. The volume root itself is never
//! created here; only loading installs roots.
//!
//! Walking never panics and never errors: an unparseable path is reported to
//! the diagnostics sink and classified as `NotFound`.

use tracing::warn;

use crate::path::{KeyPath, WILDCARD};
use crate::registry::Registry;
use crate::value::{Container, Value};

/// Classification of a resolution, without the container reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NotFound,
    ContainerOnly,
    Found,
}

/// Result of resolving a path: the outcome plus, when a container was
/// reached, that container and the final segment to use inside it.
///
/// `C` is `&Container` for reads and `&mut Container` for writes.
#[derive(Debug)]
pub enum Lookup<C> {
    NotFound,
    ContainerOnly { container: C, key: String },
    Found { container: C, key: String },
}

impl<C> Lookup<C> {
    pub fn outcome(&self) -> Outcome {
        match self {
            Lookup::NotFound => Outcome::NotFound,
            Lookup::ContainerOnly { .. } => Outcome::ContainerOnly,
            Lookup::Found { .. } => Outcome::Found,
        }
    }

    fn classify(container: C, leaf: &str, present: bool) -> Self {
        let key = leaf.to_string();
        if present || leaf == WILDCARD {
            Lookup::Found { container, key }
        } else {
            Lookup::ContainerOnly { container, key }
        }
    }
}

/// Resolve `raw` for reading. Never mutates the registry.
pub fn resolve<'a>(registry: &'a Registry, raw: &str, default_volume: &str) -> Lookup<&'a Container> {
    match parse(raw, default_volume) {
        Some(path) => walk(registry, &path),
        None => Lookup::NotFound,
    }
}

/// Resolve `raw` for writing, optionally creating missing intermediate
/// containers. Containers created before a later failure stay in place.
pub fn resolve_mut<'a>(
    registry: &'a mut Registry,
    raw: &str,
    default_volume: &str,
    create_missing: bool,
) -> Lookup<&'a mut Container> {
    match parse(raw, default_volume) {
        Some(path) => walk_mut(registry, &path, create_missing),
        None => Lookup::NotFound,
    }
}

fn parse(raw: &str, default_volume: &str) -> Option<KeyPath> {
    KeyPath::parse(raw, default_volume)
        .map_err(|e| warn!(key = raw, error = %e, "unresolvable key path"))
        .ok()
}

/// Walk an already-parsed path for reading.
pub fn walk<'a>(registry: &'a Registry, path: &KeyPath) -> Lookup<&'a Container> {
    let Some(mut current) = registry.root(path.volume()) else {
        return Lookup::NotFound;
    };

    for segment in path.parents() {
        match current.get(segment) {
            Some(Value::Map(next)) => current = next,
            _ => return Lookup::NotFound,
        }
    }

    let present = current.contains_key(path.leaf());
    Lookup::classify(current, path.leaf(), present)
}

/// Walk an already-parsed path for writing.
pub fn walk_mut<'a>(
    registry: &'a mut Registry,
    path: &KeyPath,
    create_missing: bool,
) -> Lookup<&'a mut Container> {
    let Some(mut current) = registry.root_mut(path.volume()) else {
        return Lookup::NotFound;
    };

    for segment in path.parents() {
        let next = if create_missing {
            current
                .entry(segment.clone())
                .or_insert_with(|| Value::Map(Container::new()))
        } else {
            match current.get_mut(segment) {
                Some(next) => next,
                None => return Lookup::NotFound,
            }
        };
        match next {
            Value::Map(map) => current = map,
            _ => return Lookup::NotFound,
        }
    }

    let present = current.contains_key(path.leaf());
    Lookup::classify(current, path.leaf(), present)
}
