//! Load order of the entries of one target.
//!
//! Ordering runs in two passes. Entries are first sorted by a heuristic rank
//! (strings before core before everything else, the main file last) with
//! ties broken by name. That order then seeds a dependency sort over the
//! declared `require` edges, so declared dependencies always win over the
//! heuristic.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::entry::{EntryKind, EntrySet};
use crate::resolver::errors::CyclicDependencyError;
use crate::resolver::graph::DependencyGraph;
use crate::util::diagnostic::Warning;

static STRINGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+\.lproj/strings$").unwrap());

static PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\w+\.lproj|lproj|resources)/.+_page$").unwrap());

/// Heuristic rank of an entry; lower loads earlier.
pub fn rank(kind: EntryKind, name: &str) -> i32 {
    if kind == EntryKind::Stylesheet {
        return 0;
    }

    match name {
        "core" => -2,
        "utils" => -1,
        "main" => 2,
        _ if STRINGS_RE.is_match(name) => -3,
        _ if PAGE_RE.is_match(name) => 1,
        _ => 0,
    }
}

/// Put the entries of `set` into load order.
///
/// Requirements naming an entry that is not in the set are skipped and
/// reported once per entry and name. The warnings are stored on the set and
/// returned.
pub fn order(set: &mut EntrySet) -> Result<Vec<Warning>, CyclicDependencyError> {
    let kind = set.kind();

    let mut seed: Vec<usize> = (0..set.len()).collect();
    seed.sort_by(|&a, &b| {
        let (a, b) = (&set.entries()[a], &set.entries()[b]);
        rank(kind, &a.name)
            .cmp(&rank(kind, &b.name))
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut graph = DependencyGraph::new();
    for &i in &seed {
        graph.add_node(&set.entries()[i].name);
    }

    let mut warnings = Vec::new();
    let mut reported = HashSet::new();
    for &i in &seed {
        let entry = &set.entries()[i];
        for requirement in &entry.requires {
            if set.contains(requirement) {
                graph.add_edge(&entry.name, requirement);
            } else if reported.insert((entry.name.clone(), requirement.clone())) {
                let warning = Warning::MissingDependency {
                    target: set.target_name().to_string(),
                    entry: entry.name.clone(),
                    requirement: requirement.clone(),
                };
                warning.log();
                warnings.push(warning);
            }
        }
    }

    // graph positions follow the seed
    let positions: Vec<usize> = graph
        .sort_indices()?
        .into_iter()
        .map(|node| seed[node])
        .collect();

    set.reorder(&positions);
    set.record_warnings(warnings.clone());
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::FileEntry;
    use crate::core::target::{TargetId, TargetKind};

    fn set_of(kind: EntryKind, files: &[(&str, &str)]) -> EntrySet {
        let id = TargetId::new("/pkg", "todos", TargetKind::App);
        let mut set = EntrySet::new(kind, id, "english");
        for (name, source) in files {
            set.add(FileEntry::new(*name, *source));
        }
        set
    }

    #[test]
    fn test_rank_table() {
        assert_eq!(rank(EntryKind::Script, "english.lproj/strings"), -3);
        assert_eq!(rank(EntryKind::Script, "core"), -2);
        assert_eq!(rank(EntryKind::Script, "utils"), -1);
        assert_eq!(rank(EntryKind::Script, "views/button"), 0);
        assert_eq!(rank(EntryKind::Script, "english.lproj/main_page"), 1);
        assert_eq!(rank(EntryKind::Script, "resources/detail_page"), 1);
        assert_eq!(rank(EntryKind::Script, "main"), 2);
        assert_eq!(rank(EntryKind::Stylesheet, "main"), 0);
        assert_eq!(rank(EntryKind::Stylesheet, "core"), 0);
    }

    #[test]
    fn test_heuristic_order() {
        let mut set = set_of(
            EntryKind::Script,
            &[
                ("main", ""),
                ("widgets/button", ""),
                ("core", ""),
                ("english.lproj/strings", ""),
                ("english.lproj/main_page", ""),
            ],
        );

        let warnings = order(&mut set).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(
            set.names(),
            vec![
                "english.lproj/strings",
                "core",
                "widgets/button",
                "english.lproj/main_page",
                "main"
            ]
        );
    }

    #[test]
    fn test_dependency_beats_heuristic() {
        let mut set = set_of(
            EntryKind::Script,
            &[("core", "require('models/base');"), ("models/base", "")],
        );

        order(&mut set).unwrap();

        assert_eq!(set.names(), vec!["models/base", "core"]);
    }

    #[test]
    fn test_stylesheets_sort_by_name() {
        let mut set = set_of(
            EntryKind::Stylesheet,
            &[("main", ""), ("buttons", ""), ("core", "")],
        );

        order(&mut set).unwrap();

        assert_eq!(set.names(), vec!["buttons", "core", "main"]);
    }

    #[test]
    fn test_missing_dependency_warns_once() {
        let mut set = set_of(
            EntryKind::Script,
            &[(
                "views/list",
                "require('views/missing'); require('views/missing');",
            )],
        );

        let warnings = order(&mut set).unwrap();

        assert_eq!(
            warnings,
            vec![Warning::MissingDependency {
                target: "todos".to_string(),
                entry: "views/list".to_string(),
                requirement: "views/missing".to_string(),
            }]
        );
        assert_eq!(set.warnings(), warnings.as_slice());
        assert_eq!(set.names(), vec!["views/list"]);
    }

    #[test]
    fn test_order_is_stable() {
        let files = [
            ("main", "require('views/a');"),
            ("views/b", ""),
            ("views/a", "require('views/b');"),
            ("core", ""),
        ];
        let mut first = set_of(EntryKind::Script, &files);
        let mut second = set_of(EntryKind::Script, &files);

        order(&mut first).unwrap();
        order(&mut second).unwrap();
        assert_eq!(first.names(), second.names());
        assert_eq!(first.names(), vec!["core", "views/b", "views/a", "main"]);

        order(&mut first).unwrap();
        assert_eq!(first.names(), second.names());
    }

    #[test]
    fn test_cycle_names_entries() {
        let mut set = set_of(
            EntryKind::Script,
            &[("a", "require('b');"), ("b", "require('a');"), ("c", "")],
        );

        let err = order(&mut set).unwrap_err();
        assert!(err.involves("a"));
        assert!(err.involves("b"));
        assert!(!err.involves("c"));
    }

    #[test]
    fn test_self_requirement_ignored() {
        let mut set = set_of(EntryKind::Script, &[("a", "require('a');")]);

        assert!(order(&mut set).unwrap().is_empty());
        assert_eq!(set.names(), vec!["a"]);
    }
}
