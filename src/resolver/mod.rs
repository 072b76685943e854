//! Dependency resolution.
//!
//! Two kinds of ordering happen here: targets are ordered by the `required`
//! declarations of the Buildfile, and the files inside a target are ordered
//! by their inline `require(...)` declarations. Both share one graph sort
//! and are pure; all scanning happens before resolution.

pub mod errors;
pub mod graph;
pub mod order;
pub mod requirements;

pub use errors::CyclicDependencyError;
pub use graph::DependencyGraph;
pub use requirements::RequirementGraph;
