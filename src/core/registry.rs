//! Target registry - one Target per directory.
//!
//! Targets are memoized by their normalized directory, so every app that
//! includes a framework shares the same set-up Target and its bundles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;

use crate::core::target::{Target, TargetId};
use crate::util::fs;

/// Memoized targets keyed by directory.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    targets: Mutex<HashMap<PathBuf, Arc<Target>>>,
}

impl TargetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        TargetRegistry::default()
    }

    /// Get the target for `directory`, creating it on first use.
    ///
    /// `combine` and `locale` only apply when the target is created.
    pub fn get_or_create(&self, directory: &Path, combine: bool, locale: &str) -> Result<Arc<Target>> {
        let key = fs::normalize_path(directory);
        let mut targets = self.targets.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(target) = targets.get(&key) {
            return Ok(Arc::clone(target));
        }

        let target = Arc::new(Target::new(TargetId::from_directory(&key)?, combine, locale));
        tracing::debug!("registered target {}", target.id());
        targets.insert(key, Arc::clone(&target));
        Ok(target)
    }

    /// Look up an existing target.
    pub fn get(&self, directory: &Path) -> Option<Arc<Target>> {
        let targets = self.targets.lock().unwrap_or_else(PoisonError::into_inner);
        targets.get(&fs::normalize_path(directory)).cloned()
    }

    /// Number of registered targets.
    pub fn len(&self) -> usize {
        self.targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::target::{TargetContents, TargetKind};
    use crate::test_support::PackageFixture;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_targets_are_memoized() {
        let registry = TargetRegistry::new();
        let dir = Path::new("/code/sproutcore/frameworks/runtime");

        let first = registry.get_or_create(dir, true, "english").unwrap();
        let second = registry.get_or_create(dir, false, "french").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(second.is_combined());
        assert_eq!(first.kind(), TargetKind::Framework);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(dir).is_some());
    }

    #[test]
    fn test_rejects_non_target_directory() {
        let registry = TargetRegistry::new();
        assert!(registry
            .get_or_create(Path::new("/code/sproutcore/lib/runtime"), true, "english")
            .is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_first_requests_share_one_setup() {
        let package = PackageFixture::new("sproutcore")
            .file("frameworks/runtime/core.js", "var SC = {};")
            .file("frameworks/runtime/main.js", "sc_require('core');")
            .file("frameworks/runtime/images/logo.png", "png")
            .write();
        let dir = package.root().join("frameworks/runtime");

        let registry = TargetRegistry::new();
        let barrier = Barrier::new(8);

        let results: Vec<(Arc<Target>, usize)> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        let target = registry.get_or_create(&dir, true, "english").unwrap();
                        let contents = target.setup().unwrap() as *const TargetContents as usize;
                        (target, contents)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let (first, contents) = &results[0];
        for (target, other) in &results[1..] {
            assert!(Arc::ptr_eq(first, target));
            assert_eq!(contents, other);
        }
        assert_eq!(registry.len(), 1);
        assert_eq!(first.scripts().unwrap().names(), vec!["core", "main"]);
    }
}
