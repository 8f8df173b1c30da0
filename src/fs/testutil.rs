//! Test-only helpers. Kept dependency-free: a unique path under the system temp directory,
//! removed on drop, standing in for a `tempfile` crate we don't otherwise need.

#![cfg(test)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// A path under `std::env::temp_dir()` unique to this process and call site, removed when
/// dropped.
pub struct TempPath(PathBuf);

impl TempPath {
    pub fn new(tag: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("f16fs-test-{}-{}-{n}", std::process::id(), tag));
        Self(path)
    }
}

impl AsRef<Path> for TempPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempPath {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}
