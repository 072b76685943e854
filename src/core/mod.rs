//! Core data structures for sprig.
//!
//! This module contains the foundational types used throughout sprig:
//! - The layered configuration store and the Buildfile that fills it
//! - Source entries and entry sets
//! - Targets, the target registry and apps

pub mod app;
pub mod buildfile;
pub mod config_store;
pub mod entry;
pub mod registry;
pub mod target;

pub use app::{App, AppRegistry};
pub use buildfile::{Buildfile, BUILDFILE_NAME};
pub use config_store::{ConfigStore, ConfigValue, Mode};
pub use entry::{EntryKind, EntrySet, FileEntry};
pub use registry::TargetRegistry;
pub use target::{Target, TargetId, TargetKind, TargetState};
