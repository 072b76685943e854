//! Source entries and entry sets.
//!
//! A [`FileEntry`] is one script or stylesheet together with the names it
//! declares as requirements. An [`EntrySet`] is every entry of one kind
//! found under a target directory, plus what is needed to order and bundle
//! them.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{LazyLock, OnceLock};

use anyhow::Result;
use regex::Regex;
use serde::Serialize;

use crate::builder::bundle::Bundle;
use crate::core::target::{TargetId, TargetKind};
use crate::util::diagnostic::Warning;
use crate::util::fs;

/// `require('name')` or `sc_require("name")`.
static REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:sc_)?require\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap()
});

/// Top-level directories of a target that never contribute entries.
const EXCLUDED_DIRS: &[&str] = &["debug", "tests"];

/// The kind of source an entry set holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// JavaScript sources
    Script,
    /// CSS sources
    Stylesheet,
}

impl EntryKind {
    /// File extension scanned for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            EntryKind::Script => "js",
            EntryKind::Stylesheet => "css",
        }
    }

    /// Bundle filename used when a target is combined.
    pub fn bundle_name(&self) -> &'static str {
        match self {
            EntryKind::Script => "javascript.js",
            EntryKind::Stylesheet => "stylesheet.css",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Script => write!(f, "script"),
            EntryKind::Stylesheet => write!(f, "stylesheet"),
        }
    }
}

/// One source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Path relative to the target directory, without extension
    pub name: String,
    /// Names this entry requires, in declaration order
    pub requires: Vec<String>,
    /// Raw file contents
    #[serde(skip)]
    pub source: String,
}

impl FileEntry {
    /// Create an entry, extracting its requirements from `source`.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let requires = parse_requires(&source);
        FileEntry {
            name: name.into(),
            requires,
            source,
        }
    }
}

/// Extract every declared requirement from a source file.
pub fn parse_requires(source: &str) -> Vec<String> {
    REQUIRE_RE
        .captures_iter(source)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Every entry of one kind for one target.
#[derive(Debug)]
pub struct EntrySet {
    kind: EntryKind,
    target: TargetId,
    locale: String,
    combine: Option<String>,
    entries: Vec<FileEntry>,
    lookup: HashMap<String, usize>,
    warnings: Vec<Warning>,
    compiled: OnceLock<Bundle>,
}

impl EntrySet {
    /// Create an empty set.
    pub fn new(kind: EntryKind, target: TargetId, locale: impl Into<String>) -> Self {
        EntrySet {
            kind,
            target,
            locale: locale.into(),
            combine: None,
            entries: Vec::new(),
            lookup: HashMap::new(),
            warnings: Vec::new(),
            compiled: OnceLock::new(),
        }
    }

    /// Scan the target directory for entries of `kind`.
    ///
    /// Entries are added in path order; call
    /// [`order`](crate::resolver::order::order) to sort them.
    pub fn from_directory(kind: EntryKind, target: TargetId, locale: impl Into<String>) -> Result<Self> {
        let mut set = EntrySet::new(kind, target, locale);
        let dir = set.target.directory();

        for path in fs::find_files(&dir, &[kind.extension()])? {
            let Some(name) = entry_name(&dir, &path, kind.extension()) else {
                continue;
            };
            let source = fs::read_to_string(&path)?;
            set.add(FileEntry::new(name, source));
        }

        tracing::debug!(
            "scanned {} {} entries in {}",
            set.len(),
            kind,
            dir.display()
        );
        Ok(set)
    }

    /// Mark the set as combined into one bundle named `file`.
    pub fn combine(mut self, file: impl Into<String>) -> Self {
        self.combine = Some(file.into());
        self
    }

    /// Add an entry. An entry with the same name replaces the old lookup.
    pub fn add(&mut self, entry: FileEntry) {
        self.lookup.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&FileEntry> {
        self.lookup.get(name).map(|&i| &self.entries[i])
    }

    /// Whether an entry with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// Entries in their current order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Entry names in their current order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn target(&self) -> &TargetId {
        &self.target
    }

    pub fn target_name(&self) -> &str {
        &self.target.name
    }

    pub fn target_kind(&self) -> TargetKind {
        self.target.kind
    }

    /// Name of the package the target belongs to.
    pub fn package(&self) -> String {
        self.target.package()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn extension(&self) -> &'static str {
        self.kind.extension()
    }

    /// Bundle filename, if the set is combined.
    pub fn combined_name(&self) -> Option<&str> {
        self.combine.as_deref()
    }

    /// Warnings collected while ordering.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub(crate) fn record_warnings(&mut self, warnings: Vec<Warning>) {
        self.warnings = warnings;
    }

    /// Move entries into the given order of current positions.
    ///
    /// `order` must be a permutation of `0..len()`. Invalidates any compiled
    /// output.
    pub(crate) fn reorder(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.entries.len());

        let mut slots: Vec<Option<FileEntry>> = self.entries.drain(..).map(Some).collect();
        self.entries = order.iter().filter_map(|&i| slots[i].take()).collect();

        self.lookup = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        self.compiled = OnceLock::new();
    }

    /// The memoized compiled output slot.
    pub(crate) fn compiled(&self) -> &OnceLock<Bundle> {
        &self.compiled
    }
}

impl fmt::Display for EntrySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<Entries: {}>", self.names().join(", "))
    }
}

/// Relative entry name of `path`, or `None` if it sits in an excluded
/// directory.
fn entry_name(dir: &Path, path: &Path, extension: &str) -> Option<String> {
    let relative = fs::relative_name(dir, path);

    let first = relative.split('/').next().unwrap_or_default();
    if relative.contains('/') && EXCLUDED_DIRS.contains(&first) {
        return None;
    }

    let name = relative
        .strip_suffix(extension)
        .and_then(|n| n.strip_suffix('.'))
        .unwrap_or(&relative);
    Some(name.to_string())
}
