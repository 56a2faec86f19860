// Test utilities used across `contrail-cli` tests.
// Kept under `#[cfg(test)]` so it is not part of the public crate API.
use std::path::PathBuf;

/// Path to a file under the shared `docs/fixtures` directory.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
}
