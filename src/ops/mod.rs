//! High-level operations.
//!
//! This module contains the implementation of sprig commands.

pub mod export;
pub mod html;
pub mod inspect;
pub mod serve;

pub use export::{export, ExportOptions, ExportReport};
pub use html::HtmlContext;
pub use inspect::{order, requirements, OrderReport};
pub use serve::{lookup, serve, Served};
