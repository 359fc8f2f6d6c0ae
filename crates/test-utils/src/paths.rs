//! Path utilities for locating committed test data files.

use std::path::PathBuf;

/// Returns the workspace root directory.
///
/// Walks up from the test-utils manifest directory (`crates/test-utils`).
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns the path to `crates/{crate_name}/testdata/`.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Returns the path to a file in a crate's testdata directory.
pub fn testdata_file(crate_name: &str, file_name: &str) -> PathBuf {
    crate_testdata_dir(crate_name).join(file_name)
}
