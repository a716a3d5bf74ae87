#![cfg(test)]
use std::path::PathBuf;

/// Unique path under the system temp dir; the file itself is not created.
pub fn temp_json_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}_{}.json", uuid::Uuid::new_v4()))
}

pub async fn cleanup(path: &PathBuf) {
    let _ = tokio::fs::remove_file(path).await;
}
