// src/config/loader.rs

use std::path::Path;

use tracing::debug;

use crate::config::model::RawSettings;
use crate::errors::{Result, TreerunError};
use crate::fs::FileSystem;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "Treerun.toml";

/// Parse settings from TOML text. Missing keys fall back to defaults.
pub fn parse_settings(contents: &str) -> Result<RawSettings> {
    let settings: RawSettings = toml::from_str(contents)?;
    Ok(settings)
}

/// Load the raw settings for this invocation.
///
/// - An explicit path must exist and parse.
/// - Otherwise `Treerun.toml` in `cwd` is used if present.
/// - Otherwise built-in defaults apply.
///
/// This only performs TOML deserialization; validation happens in
/// `Settings::try_from`.
pub fn load_settings(
    fs: &dyn FileSystem,
    explicit: Option<&Path>,
    cwd: &Path,
) -> Result<RawSettings> {
    let path = match explicit {
        Some(path) => {
            if !fs.exists(path) {
                return Err(TreerunError::ConfigError(format!(
                    "config file {:?} does not exist",
                    path
                )));
            }
            path.to_path_buf()
        }
        None => {
            let candidate = cwd.join(DEFAULT_CONFIG_FILE);
            if !fs.exists(&candidate) {
                debug!(path = ?candidate, "no config file found; using defaults");
                return Ok(RawSettings::default());
            }
            candidate
        }
    };

    debug!(path = ?path, "loading config file");
    let contents = fs.read_to_string(&path)?;
    parse_settings(&contents)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn missing_default_file_yields_defaults() {
        let fs = MockFileSystem::new();
        let raw = load_settings(&fs, None, Path::new("proj")).unwrap();
        assert_eq!(raw, RawSettings::default());
    }

    #[test]
    fn default_file_in_cwd_is_loaded() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "proj/Treerun.toml",
            "task_file = \"Gulpfile.js\"\n[runner]\nglobal = \"/opt/bin/gulp\"\n",
        );

        let raw = load_settings(&fs, None, Path::new("proj")).unwrap();
        assert_eq!(raw.task_file, "Gulpfile.js");
        assert_eq!(raw.default_task, "default");
        assert_eq!(raw.runner.global, PathBuf::from("/opt/bin/gulp"));
        assert_eq!(raw.runner.local, PathBuf::from("node_modules/gulp/bin/gulp.js"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let fs = MockFileSystem::new();
        let err = load_settings(&fs, Some(Path::new("nope.toml")), Path::new(".")).unwrap_err();
        assert!(matches!(err, TreerunError::ConfigError(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_settings("parallelism = 4\n").unwrap_err();
        assert!(matches!(err, TreerunError::TomlError(_)));
    }

    #[test]
    fn cli_overrides_win_over_file_values() {
        let mut raw = parse_settings("task_file = \"a.js\"\n").unwrap();
        raw.apply_overrides(Some(PathBuf::from("/bin/runner")), Some("b.js".to_string()));
        assert_eq!(raw.task_file, "b.js");
        assert_eq!(raw.runner.path, Some(PathBuf::from("/bin/runner")));
    }
}
