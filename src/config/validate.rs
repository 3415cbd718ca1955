// src/config/validate.rs

use std::path::{Component, Path};

use crate::config::model::{RawSettings, Settings};
use crate::errors::{Result, TreerunError};

impl TryFrom<RawSettings> for Settings {
    type Error = TreerunError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        validate_raw_settings(&raw)?;
        Ok(Settings::new_unchecked(raw))
    }
}

fn validate_raw_settings(raw: &RawSettings) -> Result<()> {
    validate_task_file(&raw.task_file)?;
    validate_default_task(&raw.default_task)?;
    validate_local_runner(&raw.runner.local)?;
    Ok(())
}

fn validate_task_file(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(TreerunError::ConfigError(format!(
            "task_file must be a plain file name (got {name:?})"
        ))),
    }
}

fn validate_default_task(task: &str) -> Result<()> {
    if task.trim().is_empty() {
        return Err(TreerunError::ConfigError(
            "default_task must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_local_runner(local: &Path) -> Result<()> {
    if local.as_os_str().is_empty() || local.is_absolute() {
        return Err(TreerunError::ConfigError(format!(
            "[runner].local must be a relative path (got {:?})",
            local
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::try_from(RawSettings::default()).unwrap();
        assert_eq!(settings.task_file, "gulpfile.js");
        assert_eq!(settings.default_task, "default");
    }

    #[test]
    fn task_file_with_separator_is_rejected() {
        let raw = RawSettings {
            task_file: "build/gulpfile.js".to_string(),
            ..RawSettings::default()
        };
        let err = Settings::try_from(raw).unwrap_err();
        assert!(matches!(err, TreerunError::ConfigError(_)));
    }

    #[test]
    fn empty_task_file_is_rejected() {
        let raw = RawSettings {
            task_file: String::new(),
            ..RawSettings::default()
        };
        assert!(Settings::try_from(raw).is_err());
    }

    #[test]
    fn blank_default_task_is_rejected() {
        let raw = RawSettings {
            default_task: "  ".to_string(),
            ..RawSettings::default()
        };
        assert!(Settings::try_from(raw).is_err());
    }

    #[test]
    fn absolute_local_runner_is_rejected() {
        let mut raw = RawSettings::default();
        raw.runner.local = PathBuf::from("/node_modules/gulp/bin/gulp.js");
        assert!(Settings::try_from(raw).is_err());
    }
}
