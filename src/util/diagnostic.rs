//! User-friendly diagnostic messages.
//!
//! Recoverable problems found while scanning and bundling (a missing
//! dependency, an unresolved static reference) are collected as typed
//! [`Warning`]s and returned next to the primary result. Each warning can be
//! rendered as a [`Diagnostic`] for terminal output.

use std::fmt;

use serde::Serialize;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when a required file cannot be found in the target.
    pub const MISSING_DEPENDENCY: &str =
        "help: Check the spelling of the `require(...)` name, it is relative to the target directory";

    /// Suggestion when a static asset cannot be found.
    pub const UNRESOLVED_STATIC: &str =
        "help: Place the image under the target, its `images/` folder or a shared framework";

    /// Suggestion when a target is not found.
    pub const TARGET_NOT_FOUND: &str = "help: Run `sprig requirements` to see resolved targets";

    /// Suggestion when a dependency cycle is found.
    pub const BREAK_CYCLE: &str = "help: Remove one of the `required` or `require(...)` edges";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        for ctx in &self.context {
            output.push_str(&format!("  → {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// A recoverable problem found while ordering or bundling a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// An entry declared a requirement on a name absent from its entry set.
    MissingDependency {
        target: String,
        entry: String,
        requirement: String,
    },

    /// A stylesheet referenced a static asset nobody provides.
    UnresolvedStatic {
        target: String,
        entry: String,
        reference: String,
    },
}

impl Warning {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Warning::MissingDependency {
                target,
                entry,
                requirement,
            } => Diagnostic::warning(format!(
                "`{}` required `{}`, but it could not be found",
                entry, requirement
            ))
            .with_context(format!("in target `{}`", target))
            .with_suggestion(suggestions::MISSING_DEPENDENCY),

            Warning::UnresolvedStatic {
                target,
                entry,
                reference,
            } => Diagnostic::warning(format!("static not found: `{}`", reference))
                .with_context(format!("referenced from `{}` in target `{}`", entry, target))
                .with_suggestion(suggestions::UNRESOLVED_STATIC),
        }
    }

    /// Log the warning through `tracing`.
    pub fn log(&self) {
        match self {
            Warning::MissingDependency {
                target,
                entry,
                requirement,
            } => tracing::warn!(
                "{}: {} required {}, but it could not be found",
                target,
                entry,
                requirement
            ),
            Warning::UnresolvedStatic {
                target,
                entry,
                reference,
            } => tracing::warn!("{}: static not found: {} (from {})", target, reference, entry),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingDependency {
                entry, requirement, ..
            } => write!(f, "{} required {}, but it could not be found", entry, requirement),
            Warning::UnresolvedStatic {
                entry, reference, ..
            } => write!(f, "static not found: {} (from {})", reference, entry),
        }
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

/// Print every warning to stderr.
pub fn emit_warnings<'a>(warnings: impl IntoIterator<Item = &'a Warning>, color: bool) {
    for warning in warnings {
        emit(&warning.to_diagnostic(), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("cyclic dependency between `a` and `b`")
            .with_context("a -> b -> a")
            .with_suggestion("Remove the `required` entry on `b`");

        let output = diag.format(false);
        assert!(output.contains("error: cyclic dependency"));
        assert!(output.contains("a -> b -> a"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("1. Remove the"));
    }

    #[test]
    fn test_missing_dependency_warning() {
        let warning = Warning::MissingDependency {
            target: "foundation".to_string(),
            entry: "views/view".to_string(),
            requirement: "views/missing".to_string(),
        };

        let output = warning.to_diagnostic().format(false);
        assert!(output.starts_with("warning: `views/view` required `views/missing`"));
        assert!(output.contains("in target `foundation`"));
        assert_eq!(
            warning.to_string(),
            "views/view required views/missing, but it could not be found"
        );
    }

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let warning = Warning::UnresolvedStatic {
            target: "app".to_string(),
            entry: "main".to_string(),
            reference: "logo.png".to_string(),
        };

        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "unresolved_static");
        assert_eq!(json["reference"], "logo.png");
    }
}
