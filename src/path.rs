//! Key path grammar: `[volume/]segment(:segment)*`.
//!
//! `/` separates an optional volume selector from the segment chain and `:`
//! separates nested keys. The last segment is the target key; every segment
//! before it names a nested container. A last segment of `*` addresses every
//! direct child of its container. There is no escaping, so segment names
//! cannot contain `/` or `:`.
//!
//! ```text
//! "Audio:Master Volume"        -> default volume, ["Audio"], "Master Volume"
//! "Controls/Keyboard:Jump"     -> "Controls",     ["Keyboard"], "Jump"
//! "group:*"                    -> default volume, ["group"], "*"
//! "a/b/c"                      -> rejected (more than one volume separator)
//! ```

use std::fmt;

use crate::error::OptionsError;

pub const VOLUME_SEPARATOR: char = '/';
pub const SEGMENT_SEPARATOR: char = ':';
pub const WILDCARD: &str = "*";

/// A parsed key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    volume: String,
    parents: Vec<String>,
    leaf: String,
}

impl KeyPath {
    /// Parse `raw`, resolving a missing volume selector to `default_volume`.
    ///
    /// Rejects paths with more than one `/`, an empty volume selector, or an
    /// empty segment chain.
    pub fn parse(raw: &str, default_volume: &str) -> Result<Self, OptionsError> {
        let invalid = |reason: &str| OptionsError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let (volume, chain) = match raw.split_once(VOLUME_SEPARATOR) {
            None => (default_volume, raw),
            Some((_, rest)) if rest.contains(VOLUME_SEPARATOR) => {
                return Err(invalid("more than one volume separator"));
            }
            Some(("", _)) => return Err(invalid("empty volume name")),
            Some((volume, rest)) => (volume, rest),
        };

        if chain.is_empty() {
            return Err(invalid("no key after the volume selector"));
        }

        let mut parents: Vec<String> = chain
            .split(SEGMENT_SEPARATOR)
            .map(str::to_string)
            .collect();
        // split always yields at least one item for a non-empty string
        let leaf = parents.pop().unwrap_or_default();

        Ok(Self {
            volume: volume.to_string(),
            parents,
            leaf,
        })
    }

    pub fn volume(&self) -> &str {
        &self.volume
    }

    /// The intermediate segments naming nested containers, outermost first.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// The final segment: the key looked up inside the innermost container.
    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    pub fn is_wildcard(&self) -> bool {
        self.leaf == WILDCARD
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{VOLUME_SEPARATOR}", self.volume)?;
        for parent in &self.parents {
            write!(f, "{parent}{SEGMENT_SEPARATOR}")?;
        }
        write!(f, "{}", self.leaf)
    }
}

/// Join a volume selector onto a key that does not already carry one.
pub fn qualify(volume: Option<&str>, key: &str) -> String {
    match volume {
        Some(volume) if !key.contains(VOLUME_SEPARATOR) => {
            format!("{volume}{VOLUME_SEPARATOR}{key}")
        }
        _ => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> KeyPath {
        KeyPath::parse(raw, "Options").unwrap()
    }

    #[test]
    fn single_key_uses_default_volume() {
        let path = parse("Device Name");
        assert_eq!(path.volume(), "Options");
        assert!(path.parents().is_empty());
        assert_eq!(path.leaf(), "Device Name");
    }

    #[test]
    fn nested_segments() {
        let path = parse("Video:Resolution:X");
        assert_eq!(path.parents(), ["Video", "Resolution"]);
        assert_eq!(path.leaf(), "X");
    }

    #[test]
    fn explicit_volume() {
        let path = parse("Controls/Keyboard:Jump");
        assert_eq!(path.volume(), "Controls");
        assert_eq!(path.parents(), ["Keyboard"]);
        assert_eq!(path.leaf(), "Jump");
    }

    #[test]
    fn wildcard_leaf() {
        assert!(parse("group:*").is_wildcard());
        assert!(parse("*").is_wildcard());
        assert!(!parse("*:x").is_wildcard());
    }

    #[test]
    fn two_volume_separators_rejected() {
        let err = KeyPath::parse("a/b/c", "Options").unwrap_err();
        assert!(matches!(err, OptionsError::InvalidPath { .. }));
        assert!(err.to_string().contains("more than one volume separator"));
    }

    #[test]
    fn empty_volume_rejected() {
        assert!(KeyPath::parse("/key", "Options").is_err());
    }

    #[test]
    fn empty_chain_rejected() {
        assert!(KeyPath::parse("Controls/", "Options").is_err());
        assert!(KeyPath::parse("", "Options").is_err());
    }

    #[test]
    fn empty_inner_segments_are_kept_verbatim() {
        let path = parse("a::b");
        assert_eq!(path.parents(), ["a", ""]);
        assert_eq!(path.leaf(), "b");
    }

    #[test]
    fn display_is_fully_qualified() {
        assert_eq!(parse("Audio:Master Volume").to_string(), "Options/Audio:Master Volume");
    }

    #[test]
    fn qualify_adds_missing_volume() {
        assert_eq!(qualify(Some("Controls"), "Jump"), "Controls/Jump");
        assert_eq!(qualify(Some("Controls"), "Other/Jump"), "Other/Jump");
        assert_eq!(qualify(None, "Jump"), "Jump");
    }
}
