//! Target definitions - what gets served.
//!
//! A Target is one framework, theme or app directory inside a package root.
//! Setting a target up scans its static assets, then its scripts and
//! stylesheets, and orders both. Setup happens once; afterwards the target
//! is read-only except for the memoized bundles of its entry sets.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, OnceLock, PoisonError};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::builder::bundle::{self, Bundle};
use crate::builder::statics::{ChainResolver, StaticAssetIndex, StaticAssetRecord, StaticResolver};
use crate::core::entry::{EntryKind, EntrySet};
use crate::resolver::order;
use crate::util::fs;

/// The kind of a target, given by the directory it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// `frameworks/<name>`
    #[serde(alias = "frameworks")]
    Framework,

    /// `themes/<name>`
    #[serde(alias = "themes")]
    Theme,

    /// `apps/<name>`
    #[serde(alias = "apps")]
    App,
}

impl TargetKind {
    /// Directory under the package root holding targets of this kind.
    pub fn dir_name(&self) -> &'static str {
        match self {
            TargetKind::Framework => "frameworks",
            TargetKind::Theme => "themes",
            TargetKind::App => "apps",
        }
    }
}

impl FromStr for TargetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "frameworks" | "framework" => Ok(TargetKind::Framework),
            "themes" | "theme" => Ok(TargetKind::Theme),
            "apps" | "app" => Ok(TargetKind::App),
            other => bail!("unknown target kind `{}`", other),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Identity of a target: package root, name and kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TargetId {
    /// Package root directory
    pub root: PathBuf,
    /// Target name
    pub name: String,
    /// Target kind
    pub kind: TargetKind,
}

impl TargetId {
    /// Create a new target identity.
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>, kind: TargetKind) -> Self {
        TargetId {
            root: root.into(),
            name: name.into(),
            kind,
        }
    }

    /// Split `<root>/<kind>/<name>` into a target identity.
    pub fn from_directory(directory: &Path) -> Result<Self> {
        let name = fs::file_name(directory);
        let kind_dir = directory.parent().map(fs::file_name).unwrap_or_default();
        let root = directory
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf);

        match root {
            Some(root) if !name.is_empty() => Ok(TargetId::new(root, name, kind_dir.parse()?)),
            _ => bail!("`{}` is not a target directory", directory.display()),
        }
    }

    /// The target directory.
    pub fn directory(&self) -> PathBuf {
        self.root.join(self.kind.dir_name()).join(&self.name)
    }

    /// Package name: the basename of the package root.
    pub fn package(&self) -> String {
        fs::file_name(&self.root)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.package(), self.kind, self.name)
    }
}

/// Setup progress of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TargetState {
    /// Nothing scanned yet
    Uninitialized,
    /// Static assets indexed
    Indexed,
    /// Scripts and stylesheets scanned and ordered
    Ordered,
}

/// Ordered entry sets of a target.
#[derive(Debug)]
pub struct TargetContents {
    pub scripts: EntrySet,
    pub stylesheets: EntrySet,
}

/// A framework, theme or app directory.
#[derive(Debug)]
pub struct Target {
    id: TargetId,
    combine: bool,
    locale: String,
    build_lock: Mutex<()>,
    statics: OnceLock<StaticAssetIndex>,
    contents: OnceLock<TargetContents>,
}

impl Target {
    /// Create a target that has not been set up yet.
    pub fn new(id: TargetId, combine: bool, locale: impl Into<String>) -> Self {
        Target {
            id,
            combine,
            locale: locale.into(),
            build_lock: Mutex::new(()),
            statics: OnceLock::new(),
            contents: OnceLock::new(),
        }
    }

    pub fn id(&self) -> &TargetId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn kind(&self) -> TargetKind {
        self.id.kind
    }

    pub fn directory(&self) -> PathBuf {
        self.id.directory()
    }

    pub fn is_combined(&self) -> bool {
        self.combine
    }

    /// Current setup state.
    pub fn state(&self) -> TargetState {
        if self.contents.get().is_some() {
            TargetState::Ordered
        } else if self.statics.get().is_some() {
            TargetState::Indexed
        } else {
            TargetState::Uninitialized
        }
    }

    /// Index statics, then scan and order scripts and stylesheets.
    ///
    /// Runs once; later calls return the cached contents. Concurrent first
    /// calls are serialized on the target's build lock.
    pub fn setup(&self) -> Result<&TargetContents> {
        if let Some(contents) = self.contents.get() {
            return Ok(contents);
        }

        let _guard = self
            .build_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(contents) = self.contents.get() {
            return Ok(contents);
        }

        if self.statics.get().is_none() {
            let index = StaticAssetIndex::index(&self.id, &self.locale)?;
            self.statics.get_or_init(|| index);
        }

        let scripts = self.ordered_entries(EntryKind::Script)?;
        let stylesheets = self.ordered_entries(EntryKind::Stylesheet)?;

        tracing::debug!(
            "set up {} ({} scripts, {} stylesheets)",
            self.id,
            scripts.len(),
            stylesheets.len()
        );

        Ok(self.contents.get_or_init(|| TargetContents {
            scripts,
            stylesheets,
        }))
    }

    fn ordered_entries(&self, kind: EntryKind) -> Result<EntrySet> {
        let mut set = EntrySet::from_directory(kind, self.id.clone(), &self.locale)?;
        if self.combine {
            set = set.combine(kind.bundle_name());
        }
        order::order(&mut set)?;
        Ok(set)
    }

    /// Scripts, once set up.
    pub fn scripts(&self) -> Option<&EntrySet> {
        self.contents.get().map(|c| &c.scripts)
    }

    /// Stylesheets, once set up.
    pub fn stylesheets(&self) -> Option<&EntrySet> {
        self.contents.get().map(|c| &c.stylesheets)
    }

    /// Static asset index, once indexed.
    pub fn statics(&self) -> Option<&StaticAssetIndex> {
        self.statics.get()
    }

    /// Look up a static asset of this target only.
    pub fn find_static(&self, name: &str) -> Option<&StaticAssetRecord> {
        self.statics.get().and_then(|s| s.lookup(name))
    }

    /// Entry set of the given kind, once set up.
    pub fn entries(&self, kind: EntryKind) -> Option<&EntrySet> {
        match kind {
            EntryKind::Script => self.scripts(),
            EntryKind::Stylesheet => self.stylesheets(),
        }
    }

    /// Bundle the entry set of `kind`.
    ///
    /// Static references resolve against this target first, then
    /// `fallback`. Output is memoized, so `fallback` only matters on the
    /// first call.
    pub fn bundle(&self, kind: EntryKind, fallback: &dyn StaticResolver) -> Result<&Bundle> {
        let set = self.setup().map(|c| match kind {
            EntryKind::Script => &c.scripts,
            EntryKind::Stylesheet => &c.stylesheets,
        })?;

        let own = self.statics.get();
        let resolver = ChainResolver::new(own.map(|s| s as &dyn StaticResolver), fallback);
        Ok(bundle::assemble(set, &resolver))
    }
}

impl StaticResolver for Target {
    fn find_static(&self, name: &str) -> Option<&StaticAssetRecord> {
        Target::find_static(self, name)
    }
}
