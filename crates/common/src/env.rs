//! Environment/runtime helpers
//!
//! Sanity checks to ensure the data directory exists at startup.

use tracing::{info, warn};

/// Create the data directory if missing and warn when it already holds
/// neither of the expected store files.
pub async fn ensure_env(data_dir: &str, expected_files: &[&str]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;

    let mut found = 0;
    for name in expected_files {
        let path = std::path::Path::new(data_dir).join(name);
        if tokio::fs::metadata(&path).await.is_ok() {
            found += 1;
        }
    }
    if found == 0 && !expected_files.is_empty() {
        warn!(%data_dir, "no existing store files; starting with empty stores");
    } else {
        info!(%data_dir, found, "data directory ready");
    }
    Ok(())
}
