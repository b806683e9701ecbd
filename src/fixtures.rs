#[cfg(test)]
pub mod test {
    use std::path::Path;

    use tempfile::TempDir;

    use crate::options::Options;
    use crate::registry::Registry;
    use crate::value::{Container, Value};

    /// A context whose default file is `{dir}/Options.toml`. Nothing loaded.
    pub fn options_in(dir: &TempDir) -> Options {
        Options::builder()
            .default_file(dir.path().join("Options.toml"))
            .build()
            .unwrap()
    }

    /// Like [`options_in`], with the default volume already loaded.
    pub fn loaded_options(dir: &TempDir) -> Options {
        let mut options = options_in(dir);
        assert!(options.initialize());
        options
    }

    /// ```text
    /// Device Name = "desk"
    /// [Audio]
    /// "Master Volume" = 0.8
    /// [group]
    /// one = 1
    /// [group.display]
    /// x = 1920
    /// y = 1080
    /// ```
    pub fn sample_root() -> Container {
        let mut display = Container::new();
        display.insert("x".into(), Value::Integer(1920));
        display.insert("y".into(), Value::Integer(1080));

        let mut group = Container::new();
        group.insert("one".into(), Value::Integer(1));
        group.insert("display".into(), Value::Map(display));

        let mut audio = Container::new();
        audio.insert("Master Volume".into(), Value::Float(0.8));

        let mut root = Container::new();
        root.insert("Device Name".into(), Value::from("desk"));
        root.insert("Audio".into(), Value::Map(audio));
        root.insert("group".into(), Value::Map(group));
        root
    }

    /// `Options` holds [`sample_root`]; `Controls` holds `Keyboard:Jump = "space"`.
    pub fn sample_registry() -> Registry {
        let mut keyboard = Container::new();
        keyboard.insert("Jump".into(), Value::from("space"));
        let mut controls = Container::new();
        controls.insert("Keyboard".into(), Value::Map(keyboard));

        let mut registry = Registry::new();
        registry.install("Options", Path::new("/tmp/Options.toml"), sample_root());
        registry.install("Controls", Path::new("/tmp/Controls.toml"), controls);
        registry
    }

    #[test]
    fn sample_registry_has_both_volumes() {
        let registry = sample_registry();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Controls", "Options"]);
    }
}
