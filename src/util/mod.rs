//! Utility modules.

pub mod config;
pub mod context;
pub mod diagnostic;
pub mod fs;

pub use config::{BuildSettings, Config};
pub use context::GlobalContext;
pub use diagnostic::{Diagnostic, Warning};
