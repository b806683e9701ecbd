use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::{Codec, TomlCodec};
use crate::coerce::Coercion;
use crate::error::OptionsError;
use crate::options::Options;
use crate::registry;

/// File name of the default volume when derived from an app name.
pub const DEFAULT_FILE_NAME: &str = "Options.toml";

/// Volume name used if the default file path has no usable file stem.
const FALLBACK_VOLUME: &str = "Options";

/// The default volume's file and whether it is used and auto-loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultFile {
    path: PathBuf,
    enabled: bool,
    auto_load: bool,
}

impl DefaultFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Change the default file. Paths that are not absolute are ignored and
    /// the previous path is kept.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if path.is_absolute() {
            self.path = path;
        } else {
            debug!(path = %path.display(), "ignoring non-absolute default file path");
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn auto_load(&self) -> bool {
        self.auto_load
    }

    pub fn set_auto_load(&mut self, auto_load: bool) {
        self.auto_load = auto_load;
    }

    /// Name of the default volume: the default file's name without extension.
    pub fn volume_name(&self) -> String {
        registry::volume_name(&self.path).unwrap_or_else(|| FALLBACK_VOLUME.to_string())
    }
}

/// Builder for an [`Options`] context.
///
/// The default file comes from [`default_file()`](Self::default_file) if set,
/// otherwise from the platform config directory for
/// [`app_name()`](Self::app_name) joined with [`file_name()`](Self::file_name).
pub struct OptionsBuilder {
    app_name: Option<String>,
    file_name: Option<String>,
    default_file: Option<PathBuf>,
    enable_default_file: bool,
    auto_load_default_file: bool,
    codec: Box<dyn Codec>,
    coercion: Coercion,
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self {
            app_name: None,
            file_name: None,
            default_file: None,
            enable_default_file: true,
            auto_load_default_file: true,
            codec: Box::new(TomlCodec),
            coercion: Coercion::default(),
        }
    }

    /// Set the application name, used to find the platform config directory
    /// (e.g. `~/.config/{app_name}/` on Linux).
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the default file name (default: `"Options.toml"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Use an explicit default file. Ignored unless the path is absolute.
    pub fn default_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_absolute() {
            self.default_file = Some(path);
        } else {
            debug!(path = %path.display(), "ignoring non-absolute default file path");
        }
        self
    }

    pub fn enable_default_file(mut self, enabled: bool) -> Self {
        self.enable_default_file = enabled;
        self
    }

    /// Whether [`Options::initialize`] loads the default file (default: `true`).
    pub fn auto_load_default_file(mut self, auto_load: bool) -> Self {
        self.auto_load_default_file = auto_load;
        self
    }

    /// Replace the file format (default: [`TomlCodec`]).
    pub fn codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Set the string-conversion policy for typed reads (default: strict).
    pub fn coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }

    fn effective_file_name(&self) -> String {
        match &self.file_name {
            Some(name) => name.clone(),
            None => DEFAULT_FILE_NAME.to_string(),
        }
    }

    fn effective_default_file(&self) -> Result<PathBuf, OptionsError> {
        if let Some(path) = &self.default_file {
            return Ok(path.clone());
        }
        let app = self
            .app_name
            .as_deref()
            .ok_or(OptionsError::AppNameRequired)?;
        let proj = directories::ProjectDirs::from("", "", app)
            .ok_or_else(|| OptionsError::NoPlatformDir(app.to_string()))?;
        Ok(proj.config_dir().join(self.effective_file_name()))
    }

    /// Build the context. Nothing is loaded until [`Options::initialize`].
    pub fn build(self) -> Result<Options, OptionsError> {
        let default_file = DefaultFile {
            path: self.effective_default_file()?,
            enabled: self.enable_default_file,
            auto_load: self.auto_load_default_file,
        };
        Ok(Options::from_parts(default_file, self.codec, self.coercion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;

    #[test]
    fn missing_app_name_errors() {
        let result = OptionsBuilder::new().build();
        assert!(matches!(result, Err(OptionsError::AppNameRequired)));
    }

    #[test]
    fn app_name_derives_platform_file() {
        let builder = OptionsBuilder::new().app_name("myapp");
        if let Ok(path) = builder.effective_default_file() {
            assert!(path.ends_with(DEFAULT_FILE_NAME));
        }
    }

    #[test]
    fn override_file_name() {
        let builder = OptionsBuilder::new().app_name("myapp").file_name("Prefs.json");
        assert_eq!(builder.effective_file_name(), "Prefs.json");
    }

    #[test]
    fn explicit_default_file_wins() {
        let path = std::env::temp_dir().join("Options.toml");
        let builder = OptionsBuilder::new().app_name("myapp").default_file(&path);
        assert_eq!(builder.effective_default_file().unwrap(), path);
    }

    #[test]
    fn relative_default_file_ignored() {
        let builder = OptionsBuilder::new().default_file("relative/Options.toml");
        assert!(builder.default_file.is_none());
        assert!(matches!(
            builder.effective_default_file(),
            Err(OptionsError::AppNameRequired)
        ));
    }

    #[test]
    fn flags_default_to_enabled() {
        let builder = OptionsBuilder::new();
        assert!(builder.enable_default_file);
        assert!(builder.auto_load_default_file);
        assert_eq!(builder.coercion, Coercion::Strict);
    }

    #[test]
    fn build_carries_settings() {
        let path = std::env::temp_dir().join("Prefs.json");
        let options = OptionsBuilder::new()
            .default_file(&path)
            .auto_load_default_file(false)
            .codec(JsonCodec)
            .coercion(Coercion::Lenient)
            .build()
            .unwrap();

        assert_eq!(options.default_file().path(), path);
        assert!(!options.default_file().auto_load());
        assert_eq!(options.default_volume(), "Prefs");
        assert_eq!(options.coercion(), Coercion::Lenient);
    }

    #[test]
    fn set_path_ignores_relative() {
        let mut file = DefaultFile {
            path: std::env::temp_dir().join("Options.toml"),
            enabled: true,
            auto_load: true,
        };
        let before = file.path().to_path_buf();

        file.set_path("not/rooted.toml");
        assert_eq!(file.path(), before);

        let rooted = std::env::temp_dir().join("Other.toml");
        file.set_path(&rooted);
        assert_eq!(file.path(), rooted);
        assert_eq!(file.volume_name(), "Other");
    }
}
