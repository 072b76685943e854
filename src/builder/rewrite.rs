//! Textual rewrite passes applied while bundling.
//!
//! These are syntactic substitutions on source text. They do not parse
//! JavaScript or CSS and only recognize the exact call shapes below.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::builder::statics::StaticResolver;
use crate::core::entry::EntrySet;
use crate::util::diagnostic::Warning;

/// `sc_super()` with optional whitespace between the parentheses.
static SUPER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"sc_super\(\s*\)").unwrap());

/// `sc_static('x')`, `static_url("x")` or `sc_target('x')`.
static STATIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:sc_static|static_url|sc_target)\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap()
});

/// Base-method invocation `sc_super()` stands for.
pub const SUPER_CALL: &str = "arguments.callee.base.apply(this, arguments)";

/// Replace every `sc_super()` with the base-method invocation.
pub fn rewrite_super_calls(source: &str) -> Cow<'_, str> {
    SUPER_RE.replace_all(source, SUPER_CALL)
}

/// Replace static references in one stylesheet with `url('<destination>')`.
///
/// Unresolved references are removed from the output and reported as
/// warnings.
pub fn rewrite_static_references(
    source: &str,
    target: &str,
    entry: &str,
    resolver: &dyn StaticResolver,
    warnings: &mut Vec<Warning>,
) -> String {
    STATIC_RE
        .replace_all(source, |caps: &Captures<'_>| {
            let reference = &caps[1];
            match resolver.find_static(reference) {
                Some(record) => format!("url('{}')", record.destination),
                None => {
                    let warning = Warning::UnresolvedStatic {
                        target: target.to_string(),
                        entry: entry.to_string(),
                        reference: reference.to_string(),
                    };
                    warning.log();
                    warnings.push(warning);
                    String::new()
                }
            }
        })
        .into_owned()
}

/// Resolve the static references of every stylesheet in `set`.
///
/// Returns the rewritten sources in entry order together with one warning
/// per unresolved reference.
pub fn resolve_style_references(
    set: &EntrySet,
    resolver: &dyn StaticResolver,
) -> (Vec<String>, Vec<Warning>) {
    let mut warnings = Vec::new();
    let sources = set
        .entries()
        .iter()
        .map(|entry| {
            rewrite_static_references(
                &entry.source,
                set.target_name(),
                &entry.name,
                resolver,
                &mut warnings,
            )
        })
        .collect();
    (sources, warnings)
}
