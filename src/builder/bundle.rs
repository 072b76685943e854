//! Bundle assembly.
//!
//! An ordered entry set becomes either one combined artifact or one artifact
//! per entry, each at a public path under `/static/<locale>/<target>`.
//! Stylesheets get their static references resolved either way; scripts are
//! only rewritten when combined. The result is memoized on the entry set,
//! so assembling twice returns the same bundle.

use serde::Serialize;

use crate::builder::rewrite;
use crate::builder::statics::StaticResolver;
use crate::core::entry::{EntryKind, EntrySet};
use crate::util::diagnostic::Warning;

/// One servable output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Public path
    pub path: String,
    /// File contents
    #[serde(skip)]
    pub content: String,
}

/// Output of one entry set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bundle {
    artifacts: Vec<Artifact>,
    warnings: Vec<Warning>,
}

impl Bundle {
    /// Artifacts in load order.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Public paths in load order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(|a| a.path.as_str())
    }

    /// Content served at `path`.
    pub fn content_for(&self, path: &str) -> Option<&str> {
        self.artifacts
            .iter()
            .find(|a| a.path == path)
            .map(|a| a.content.as_str())
    }

    /// Warnings raised while assembling.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Short code used in public paths for a locale name.
///
/// Unknown names are used as they are.
pub fn locale_code(locale: &str) -> &str {
    match locale {
        "english" => "en",
        "french" => "fr",
        "german" => "de",
        "japanese" => "ja",
        "spanish" => "es",
        "italian" => "it",
        other => other,
    }
}

/// Public directory of a target's output.
pub fn destination_root(locale: &str, target: &str) -> String {
    format!("/static/{}/{}", locale_code(locale), target)
}

/// Assemble `set`, memoizing the result on the set.
pub fn assemble<'a>(set: &'a EntrySet, resolver: &dyn StaticResolver) -> &'a Bundle {
    set.compiled().get_or_init(|| build(set, resolver))
}

fn build(set: &EntrySet, resolver: &dyn StaticResolver) -> Bundle {
    if set.is_empty() {
        return Bundle::default();
    }

    let root = destination_root(set.locale(), set.target_name());

    match set.combined_name() {
        Some(file) => {
            let (content, warnings) = compile(set, resolver);
            Bundle {
                artifacts: vec![Artifact {
                    path: format!("{}/{}", root, file),
                    content,
                }],
                warnings,
            }
        }
        None => {
            let (sources, warnings) = match set.kind() {
                EntryKind::Script => (
                    set.entries().iter().map(|e| e.source.clone()).collect(),
                    Vec::new(),
                ),
                EntryKind::Stylesheet => rewrite::resolve_style_references(set, resolver),
            };
            Bundle {
                artifacts: set
                    .entries()
                    .iter()
                    .zip(sources)
                    .map(|(entry, content)| Artifact {
                        path: format!("{}/{}.{}", root, entry.name, set.extension()),
                        content,
                    })
                    .collect(),
                warnings,
            }
        }
    }
}

/// Concatenate every entry of `set` into one file.
///
/// Each file is preceded by a `BEGIN` marker comment. Script bundles get
/// `sc_super()` rewritten and end with a `SC.bundleDidLoad` call;
/// stylesheet bundles get their static references resolved.
pub fn compile(set: &EntrySet, resolver: &dyn StaticResolver) -> (String, Vec<Warning>) {
    let (sources, warnings) = match set.kind() {
        EntryKind::Script => (
            set.entries()
                .iter()
                .map(|e| rewrite::rewrite_super_calls(&e.source).into_owned())
                .collect::<Vec<_>>(),
            Vec::new(),
        ),
        EntryKind::Stylesheet => rewrite::resolve_style_references(set, resolver),
    };

    let mut output = String::new();
    for (entry, source) in set.entries().iter().zip(&sources) {
        output.push_str(&format!(
            "/* >>>>>>>>>> BEGIN {}.{} */\n",
            entry.name,
            set.extension()
        ));
        output.push_str(source);
        output.push('\n');
    }

    if set.kind() == EntryKind::Script {
        output.push_str(&format!(
            "\nSC.bundleDidLoad(\"{}/{}\");\n",
            set.package(),
            set.target_name()
        ));
    }

    (output, warnings)
}
