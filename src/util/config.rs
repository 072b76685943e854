//! Configuration file support for Sprig.
//!
//! Sprig supports two configuration file locations:
//! - Global: `~/.sprig/config.toml` - User-wide defaults
//! - Project: `.sprig/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Mode used when nothing else is configured.
pub const DEFAULT_MODE: &str = "global";

/// Locale used for destination paths and locale folders.
pub const DEFAULT_LOCALE: &str = "english";

/// Theme target added to every app.
pub const DEFAULT_THEME: &str = "standard_theme";

/// Default address for `sprig serve`.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port for `sprig serve`.
pub const DEFAULT_PORT: u16 = 4020;

/// Sprig configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Development server settings
    pub serve: ServeConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Buildfile mode used for requirement resolution
    pub mode: Option<String>,

    /// Locale name (e.g. "english")
    pub locale: Option<String>,

    /// Theme target name
    pub theme: Option<String>,

    /// Concatenate each target's files into one bundle
    pub combine: Option<bool>,
}

/// Development server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Interface to bind
    pub host: Option<String>,

    /// Port to bind
    pub port: Option<u16>,
}

/// Resolved settings that drive a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub mode: String,
    pub locale: String,
    pub theme: String,
    pub combine: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        BuildSettings {
            mode: DEFAULT_MODE.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            theme: DEFAULT_THEME.to_string(),
            combine: true,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.mode.is_some() {
            self.build.mode = other.build.mode;
        }
        if other.build.locale.is_some() {
            self.build.locale = other.build.locale;
        }
        if other.build.theme.is_some() {
            self.build.theme = other.build.theme;
        }
        if other.build.combine.is_some() {
            self.build.combine = other.build.combine;
        }

        if other.serve.host.is_some() {
            self.serve.host = other.serve.host;
        }
        if other.serve.port.is_some() {
            self.serve.port = other.serve.port;
        }
    }

    /// Build settings with defaults filled in.
    pub fn build_settings(&self) -> BuildSettings {
        let defaults = BuildSettings::default();
        BuildSettings {
            mode: self.build.mode.clone().unwrap_or(defaults.mode),
            locale: self.build.locale.clone().unwrap_or(defaults.locale),
            theme: self.build.theme.clone().unwrap_or(defaults.theme),
            combine: self.build.combine.unwrap_or(defaults.combine),
        }
    }

    /// Address for the development server.
    pub fn serve_addr(&self) -> String {
        format!(
            "{}:{}",
            self.serve.host.as_deref().unwrap_or(DEFAULT_HOST),
            self.serve.port.unwrap_or(DEFAULT_PORT)
        )
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.sprig/config.toml)
/// 2. Global config (~/.sprig/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global sprig config directory (~/.sprig).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".sprig"))
}

/// Get the global config path (~/.sprig/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.sprig/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".sprig").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Config::default().build_settings();
        assert_eq!(settings.mode, "global");
        assert_eq!(settings.locale, "english");
        assert_eq!(settings.theme, "standard_theme");
        assert!(settings.combine);
        assert_eq!(Config::default().serve_addr(), "127.0.0.1:4020");
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");

        std::fs::write(&global, "[build]\ntheme = \"ace\"\nlocale = \"french\"\n").unwrap();
        std::fs::write(&project, "[build]\ntheme = \"legacy\"\ncombine = false\n").unwrap();

        let settings = load_config(Some(&global), &project).build_settings();
        assert_eq!(settings.theme, "legacy");
        assert_eq!(settings.locale, "french");
        assert!(!settings.combine);
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let config = Config::load_or_default(&path);
        assert!(config.build.mode.is_none());
    }
}
