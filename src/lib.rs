//! Sprig - a build pipeline for SproutCore-style JavaScript applications
//!
//! This crate provides the core library functionality for sprig: target
//! requirement resolution, file ordering, bundling, static asset indexing
//! and the operations the `sprig` binary exposes.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities for sprig unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides package fixtures written to temporary
/// directories.
#[cfg(test)]
pub mod test_support;

pub use core::{App, AppRegistry, ConfigStore, EntryKind, EntrySet, Target, TargetKind};
pub use resolver::{CyclicDependencyError, RequirementGraph};
pub use util::diagnostic::Warning;
