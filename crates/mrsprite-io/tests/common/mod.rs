//! Scratch directories for file tests, shared by the unit tests in `src/`
//! and the integration tests in `tests/`.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::path::PathBuf;

/// A per-test scratch directory under the system temp dir, removed on
/// drop so a failing assertion does not leave it behind.
pub struct ScratchDir(pub PathBuf);

impl ScratchDir {
    pub fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "mrsprite-io-{}-{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    pub fn join(&self, file: &str) -> PathBuf {
        self.0.join(file)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[test]
fn scratch_dir_is_removed_when_a_test_panics() {
    let path = std::panic::catch_unwind(|| {
        let dir = ScratchDir::new("unwind");
        std::fs::write(dir.join("partial.json"), "[").unwrap();
        assert!(dir.0.exists());
        let path = dir.0.clone();
        std::panic::panic_any(path);
    })
    .unwrap_err()
    .downcast::<PathBuf>()
    .unwrap();
    assert!(!path.exists());
}
