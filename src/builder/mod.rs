//! Bundle building.
//!
//! This module turns ordered entry sets into servable artifacts and indexes
//! the static assets they reference.

pub mod bundle;
pub mod rewrite;
pub mod statics;

pub use bundle::{Artifact, Bundle};
pub use statics::{StaticAssetIndex, StaticAssetRecord, StaticResolver};
