//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binary crates can prepare the data
//! directory through `service::runtime::ensure_env` without depending on `common`.

/// Ensure the data directory exists before the stores are opened.
pub async fn ensure_env(data_dir: &str, expected_files: &[&str]) -> anyhow::Result<()> {
    common::env::ensure_env(data_dir, expected_files).await
}
