//! Test utilities for unit tests.
//!
//! Tests that touch the filesystem build a package root from a
//! [`PackageFixture`] and work against the written copy.
//!
//! # Example
//!
//! ```rust,ignore
//! use sprig::test_support::PackageFixture;
//!
//! let package = PackageFixture::new("sproutcore")
//!     .file("frameworks/runtime/core.js", "var SC = {};")
//!     .write();
//! assert!(package.root().join("frameworks/runtime").is_dir());
//! ```

pub mod fixtures;

// Re-export fixtures for convenience
pub use fixtures::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buildfile::BUILDFILE_NAME;

    #[test]
    fn test_fixture_layout() {
        let package = PackageFixture::new("sproutcore")
            .buildfile(buildfiles::sproutcore())
            .file("frameworks/runtime/core.js", "var SC = {};")
            .write();

        assert!(package.root().ends_with("sproutcore"));
        assert!(package.root().join(BUILDFILE_NAME).is_file());
        assert_eq!(
            std::fs::read_to_string(package.root().join("frameworks/runtime/core.js")).unwrap(),
            "var SC = {};"
        );
    }
}
