//! Command implementations

pub mod build;
pub mod order;
pub mod requirements;
pub mod serve;
