//! Resolution error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// A cycle among targets or among the files of one entry set.
///
/// A cycle means no valid order exists, so resolution of the affected
/// target stops here instead of returning a partial order.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
#[error("cyclic dependency between {}", quoted(.nodes))]
#[diagnostic(
    code(sprig::resolve::cycle),
    help("Break the cycle by removing one of the declared requirements")
)]
pub struct CyclicDependencyError {
    /// The nodes taking part in the cycle, in discovery order.
    pub nodes: Vec<String>,
}

fn quoted(nodes: &[String]) -> String {
    nodes
        .iter()
        .map(|n| format!("`{}`", n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CyclicDependencyError {
    /// Whether `name` is part of the cycle.
    pub fn involves(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n == name)
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut cycle = self.nodes.clone();
        if let Some(first) = self.nodes.first() {
            cycle.push(first.clone());
        }

        Diagnostic::error(self.to_string())
            .with_context(format!("cycle: {}", cycle.join(" -> ")))
            .with_suggestion(suggestions::BREAK_CYCLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message() {
        let err = CyclicDependencyError {
            nodes: vec!["a".to_string(), "b".to_string()],
        };

        assert_eq!(err.to_string(), "cyclic dependency between `a`, `b`");
        assert!(err.involves("b"));
        assert!(!err.involves("c"));

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("cycle: a -> b -> a"));
    }
}
