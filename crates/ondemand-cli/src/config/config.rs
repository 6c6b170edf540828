//! `AppConfig` struct and TOML loading.

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::BIN_NAME;

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Remote endpoint settings.
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Remote endpoint configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Index URL override.
    #[serde(default)]
    pub index_url: Option<String>,
    /// User-Agent override.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl AppConfig {
    /// Loads `config.toml` from `dir`, or from the default location when
    /// `dir` is `None`.
    ///
    /// Without `--dir` the file is optional: if neither `XDG_CONFIG_HOME`
    /// nor `HOME` locates it, defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(dir: Option<&Path>) -> Result<Self> {
        let path = match dir {
            Some(d) => d.join(CONFIG_FILE),
            None => {
                let located = default_config_path(
                    std::env::var_os("XDG_CONFIG_HOME"),
                    std::env::var_os("HOME"),
                );
                let Some(path) = located else {
                    tracing::debug!("no XDG_CONFIG_HOME or HOME, using defaults");
                    return Ok(Self::default());
                };
                path
            }
        };
        Self::load(&path)
    }

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Returns the configured index URL, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if `remote.index_url` is not a valid URL.
    pub fn index_url(&self) -> Result<Option<Url>> {
        self.remote
            .index_url
            .as_deref()
            .map(|raw| Url::parse(raw).with_context(|| format!("invalid remote.index_url {raw:?}")))
            .transpose()
    }

    /// Returns the User-Agent to send, `nhk-radio-ondemand/<version>` by default.
    #[must_use]
    pub fn user_agent(&self) -> Cow<'_, str> {
        self.remote.user_agent.as_deref().map_or_else(
            || Cow::Owned(format!("{BIN_NAME}/{}", env!("CARGO_PKG_VERSION"))),
            Cow::Borrowed,
        )
    }
}

/// Default config file: `$XDG_CONFIG_HOME/nhk-radio-ondemand/config.toml`,
/// else `$HOME/.config/nhk-radio-ondemand/config.toml`.
///
/// Empty or relative values are ignored, as the XDG base directory rules require.
fn default_config_path(
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Option<PathBuf> {
    let usable = |v: OsString| {
        let p = PathBuf::from(v);
        p.is_absolute().then_some(p)
    };
    let base = xdg_config_home
        .and_then(usable)
        .or_else(|| home.and_then(usable).map(|h| h.join(".config")))?;
    Some(base.join(BIN_NAME).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.index_url().unwrap().is_none());
        assert_eq!(
            config.user_agent(),
            concat!("nhk-radio-ondemand/", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn test_default_path_prefers_xdg_config_home() {
        // Arrange & Act
        let path = default_config_path(
            Some(OsString::from("/xdg")),
            Some(OsString::from("/home/listener")),
        );

        // Assert
        assert_eq!(
            path,
            Some(PathBuf::from("/xdg/nhk-radio-ondemand/config.toml"))
        );
    }

    #[test]
    fn test_default_path_falls_back_to_home() {
        // Arrange & Act
        let path = default_config_path(
            Some(OsString::from("relative/xdg")),
            Some(OsString::from("/home/listener")),
        );

        // Assert
        assert_eq!(
            path,
            Some(PathBuf::from(
                "/home/listener/.config/nhk-radio-ondemand/config.toml"
            ))
        );
    }

    #[test]
    fn test_default_path_without_home_is_none() {
        // Arrange & Act
        let unset = default_config_path(None, None);
        let empty = default_config_path(Some(OsString::new()), Some(OsString::new()));

        // Assert
        assert_eq!(unset, None);
        assert_eq!(empty, None);
    }

    #[test]
    fn test_load_from_dir_reads_config_toml() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[remote]\nuser_agent = \"pipe/2.0\"\n",
        )
        .unwrap();

        // Act
        let config = AppConfig::load_from(Some(dir.path())).unwrap();

        // Assert
        assert_eq!(config.user_agent(), "pipe/2.0");
    }

    #[test]
    fn test_load_from_empty_dir_uses_defaults() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();

        // Act
        let config = AppConfig::load_from(Some(dir.path())).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_remote_overrides() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[remote]\nindex_url = \"http://127.0.0.1:8080/index.json\"\nuser_agent = \"pipe/1.0\"\n",
        )
        .unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(
            config.index_url().unwrap().unwrap().as_str(),
            "http://127.0.0.1:8080/index.json"
        );
        assert_eq!(config.user_agent(), "pipe/1.0");
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[remote\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_index_url_fails() {
        // Arrange
        let config = AppConfig {
            remote: RemoteConfig {
                index_url: Some(String::from("not a url")),
                user_agent: None,
            },
        };

        // Act
        let result = config.index_url();

        // Assert
        assert!(result.is_err());
    }
}
