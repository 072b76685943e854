//! Apps and the app registry.
//!
//! An App is the ordered list of targets a page needs: the bootstrap
//! framework, every framework the app requires, the theme and finally the
//! app itself. The registry owns the configuration store, the package roots
//! and every Target, and builds each App once.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};

use crate::builder::bundle::{Artifact, Bundle};
use crate::builder::statics::{StaticAssetRecord, StaticResolver};
use crate::core::buildfile::Buildfile;
use crate::core::config_store::ConfigStore;
use crate::core::entry::EntryKind;
use crate::core::registry::TargetRegistry;
use crate::core::target::{Target, TargetKind};
use crate::resolver::requirements::{RequirementGraph, ALL};
use crate::util::config::BuildSettings;
use crate::util::fs;

/// Framework loaded before anything else when a root provides it.
pub const BOOTSTRAP: &str = "bootstrap";

/// The targets served for one app name.
#[derive(Debug)]
pub struct App {
    name: String,
    locale: String,
    targets: Vec<Arc<Target>>,
    /// Targets of the `all` app; framework and theme bundles resolve
    /// their statics against these only.
    shared: Vec<Arc<Target>>,
}

/// Statics of a list of targets, searched last to first.
struct TargetStatics<'a>(&'a [Arc<Target>]);

impl StaticResolver for TargetStatics<'_> {
    fn find_static(&self, name: &str) -> Option<&StaticAssetRecord> {
        self.0.iter().rev().find_map(|target| target.find_static(name))
    }
}

impl App {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locale name the app was built for.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Targets in load order.
    pub fn targets(&self) -> &[Arc<Target>] {
        &self.targets
    }

    /// Find a target by name, preferring the most specific one.
    pub fn find_target(&self, name: &str) -> Option<&Arc<Target>> {
        self.targets.iter().rev().find(|t| t.name() == name)
    }

    /// The bootstrap target, if any.
    pub fn bootstrap(&self) -> Option<&Arc<Target>> {
        self.targets
            .iter()
            .find(|t| t.kind() == TargetKind::Framework && t.name() == BOOTSTRAP)
    }

    /// Bundle of `kind` for one of this app's targets.
    ///
    /// Stylesheet references a target cannot resolve itself fall back to
    /// this app's statics for the app target, and to the `all` app's
    /// statics for frameworks and themes. Those targets are shared between
    /// apps, so their bundles must not depend on which app asked first.
    pub fn bundle<'a>(&'a self, target: &'a Target, kind: EntryKind) -> Result<&'a Bundle> {
        if target.kind() == TargetKind::App {
            target.bundle(kind, self)
        } else {
            target.bundle(kind, &TargetStatics(&self.shared))
        }
    }

    /// Bundles of `kind` for every target, in load order.
    pub fn bundles(&self, kind: EntryKind) -> Result<Vec<&Bundle>> {
        self.targets
            .iter()
            .map(|target| self.bundle(target, kind))
            .collect()
    }

    /// Find a built artifact by public path.
    pub fn find_artifact(&self, path: &str) -> Result<Option<&Artifact>> {
        for kind in [EntryKind::Script, EntryKind::Stylesheet] {
            for bundle in self.bundles(kind)? {
                if let Some(artifact) = bundle.artifacts().iter().find(|a| a.path == path) {
                    return Ok(Some(artifact));
                }
            }
        }
        Ok(None)
    }

    /// Find a static asset by name, searching the app before its frameworks.
    pub fn find_static(&self, name: &str) -> Option<&StaticAssetRecord> {
        self.targets.iter().rev().find_map(|target| target.find_static(name))
    }

    /// Find a static asset by public path.
    pub fn find_static_by_destination(&self, destination: &str) -> Option<&StaticAssetRecord> {
        self.targets
            .iter()
            .rev()
            .filter_map(|target| target.statics())
            .find_map(|statics| statics.by_destination(destination))
    }
}

impl StaticResolver for App {
    fn find_static(&self, name: &str) -> Option<&StaticAssetRecord> {
        App::find_static(self, name)
    }
}

/// A package root added to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    pub path: PathBuf,
    pub combine: bool,
}

/// Owner of the configuration, targets and apps of a set of roots.
#[derive(Debug)]
pub struct AppRegistry {
    settings: BuildSettings,
    store: ConfigStore,
    roots: Vec<Root>,
    app_names: BTreeSet<String>,
    targets: TargetRegistry,
    apps: Mutex<HashMap<String, Arc<App>>>,
}

impl AppRegistry {
    /// Create a registry with no roots.
    pub fn new(settings: BuildSettings) -> Self {
        AppRegistry {
            settings,
            store: ConfigStore::new(),
            roots: Vec::new(),
            app_names: BTreeSet::new(),
            targets: TargetRegistry::new(),
            apps: Mutex::new(HashMap::new()),
        }
    }

    /// Add a package root.
    ///
    /// Records the apps under `<root>/apps` and evaluates the root's
    /// Buildfile, if any. Roots must be added before the first app is built.
    pub fn add_root(&mut self, path: &Path, combine: bool) -> Result<()> {
        let path = fs::normalize_path(path);

        for dir in fs::list_dirs(&path.join(TargetKind::App.dir_name()))? {
            self.app_names.insert(fs::file_name(&dir));
        }

        if let Some(buildfile) = Buildfile::load_from_root(&path)
            .with_context(|| format!("failed to load Buildfile in {}", path.display()))?
        {
            buildfile.evaluate(&mut self.store);
        }

        tracing::debug!("added root {} (combine: {})", path.display(), combine);
        self.roots.push(Root { path, combine });
        Ok(())
    }

    /// Whether `name` is an app in one of the roots.
    pub fn is_app(&self, name: &str) -> bool {
        self.app_names.contains(name)
    }

    /// App names, sorted.
    pub fn app_names(&self) -> impl Iterator<Item = &str> {
        self.app_names.iter().map(String::as_str)
    }

    pub fn config(&self) -> &ConfigStore {
        &self.store
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    /// Requirement resolver for the configured mode.
    pub fn requirements(&self) -> RequirementGraph<'_> {
        RequirementGraph::new(&self.store, &self.settings.mode)
    }

    /// The app for `name`, building it on first use.
    ///
    /// Names that are not apps map to the shared `all` app.
    pub fn app_for(&self, name: &str) -> Result<Arc<App>> {
        let name = if self.is_app(name) { name } else { ALL };

        let mut apps = self.apps.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(app) = apps.get(name) {
            return Ok(Arc::clone(app));
        }

        let app = Arc::new(self.build_app(name)?);
        apps.insert(name.to_string(), Arc::clone(&app));
        Ok(app)
    }

    fn build_app(&self, name: &str) -> Result<App> {
        let targets = self.app_targets(name)?;
        let shared = if name == ALL {
            targets.clone()
        } else {
            self.app_targets(ALL)?
        };

        tracing::info!(
            "built app {} ({})",
            name,
            targets
                .iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(App {
            name: name.to_string(),
            locale: self.settings.locale.clone(),
            targets,
            shared,
        })
    }

    /// Set-up targets of an app, in load order.
    fn app_targets(&self, name: &str) -> Result<Vec<Arc<Target>>> {
        let required = self.requirements().resolve_for_app(name)?;

        let mut seen = HashSet::new();
        let mut targets = Vec::new();

        for root in &self.roots {
            for dir in self.target_dirs(root, name, &required) {
                if !seen.insert(dir.clone()) {
                    continue;
                }
                let target = self
                    .targets
                    .get_or_create(&dir, root.combine, &self.settings.locale)?;
                target.setup()?;
                targets.push(target);
            }
        }

        Ok(targets)
    }

    /// Existing target directories of `root` for an app, in load order.
    fn target_dirs(&self, root: &Root, app: &str, required: &[String]) -> Vec<PathBuf> {
        let frameworks = root.path.join(TargetKind::Framework.dir_name());

        let mut dirs = vec![frameworks.join(BOOTSTRAP)];
        dirs.extend(required.iter().map(|name| frameworks.join(name)));
        dirs.push(
            root.path
                .join(TargetKind::Theme.dir_name())
                .join(&self.settings.theme),
        );
        if app != ALL {
            dirs.push(root.path.join(TargetKind::App.dir_name()).join(app));
        }

        dirs.retain(|dir| dir.is_dir());
        dirs
    }
}
