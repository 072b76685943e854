//! Global context for sprig operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::app::AppRegistry;
use crate::util::config::{self, BuildSettings, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Package roots, relative to `cwd` unless absolute
    roots: Vec<PathBuf>,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            roots: Vec::new(),
            color: true,
        }
    }

    /// Set the package roots. An empty list means the working directory.
    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.roots = roots;
        self
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Package roots as absolute paths.
    pub fn roots(&self) -> Vec<PathBuf> {
        if self.roots.is_empty() {
            return vec![self.cwd.clone()];
        }
        self.roots.iter().map(|r| self.cwd.join(r)).collect()
    }

    /// The first root; project configuration lives here.
    pub fn project_root(&self) -> PathBuf {
        self.roots()
            .into_iter()
            .next()
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// Get the project-local sprig directory.
    pub fn project_sprig_dir(&self) -> PathBuf {
        self.project_root().join(".sprig")
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Load configuration (global + project).
    pub fn config(&self) -> Config {
        config::load_config(
            config::global_config_path().as_deref(),
            &config::project_config_path(&self.project_root()),
        )
    }

    /// Build an app registry over every root.
    pub fn registry(&self, settings: BuildSettings) -> Result<AppRegistry> {
        let combine = settings.combine;
        let mut registry = AppRegistry::new(settings);

        for root in self.roots() {
            if !root.is_dir() {
                bail!("root `{}` is not a directory", root.display());
            }
            registry.add_root(&root, combine)?;
        }

        Ok(registry)
    }
}
