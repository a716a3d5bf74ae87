use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, error};

use crate::errors::ServiceError;

/// Append-only JSON array persisted to a single file.
///
/// Every append rewrites the whole array (O(n) per write). The
/// read-append-write cycle runs under `write_lock`, so concurrent appends
/// through the same store never drop each other's items. Writes go to a
/// sibling temp file that is renamed over the target, so readers only ever
/// observe a complete array.
pub struct JsonArrayStore<T> {
    file_path: PathBuf,
    write_lock: Mutex<()>,
    _item: PhantomData<fn() -> T>,
}

impl<T> JsonArrayStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send,
{
    /// Open the store at `path`, creating parent directories and an empty
    /// array file if nothing exists there yet. An existing file is left as is.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ServiceError::storage("create data dir", e))?;
            }
        }

        if fs::metadata(&file_path).await.is_err() {
            write_array::<T>(&file_path, &[]).await?;
            debug!(path = %file_path.display(), "initialized empty store file");
        }

        Ok(Arc::new(Self { file_path, write_lock: Mutex::new(()), _item: PhantomData }))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Full contents in file order. Missing or blank file reads as empty.
    pub async fn list(&self) -> Result<Vec<T>, ServiceError> {
        read_array(&self.file_path).await
    }

    /// Append one item and persist the complete array.
    pub async fn append(&self, item: T) -> Result<T, ServiceError> {
        self.append_with::<_, ServiceError>(|_| Ok(item)).await
    }

    /// Build the next item from the current contents and persist it, all
    /// while holding the write lock. Returning an error from `make` aborts
    /// without touching the file.
    pub async fn append_with<F, E>(&self, make: F) -> Result<T, E>
    where
        F: FnOnce(&[T]) -> Result<T, E>,
        E: From<ServiceError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut items: Vec<T> = read_array(&self.file_path).await?;
        let item = make(&items)?;
        items.push(item.clone());
        write_array(&self.file_path, &items).await?;
        debug!(path = %self.file_path.display(), len = items.len(), "store appended");
        Ok(item)
    }
}

/// Read the array at `path` without taking any lock.
pub async fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ServiceError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            error!(path = %path.display(), error = %e, "store read failed");
            return Err(ServiceError::storage("read store", e));
        }
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&bytes).map_err(|e| {
        error!(path = %path.display(), error = %e, "store file is not a valid JSON array");
        ServiceError::storage("parse store", e)
    })
}

/// Replace the contents of `path` with `items`, pretty-printed, without
/// taking any lock.
///
/// The temp file is flushed to disk before the rename and the directory
/// entry afterwards, so the target is either the old array or the new one,
/// never an empty file.
pub async fn write_array<T: Serialize>(path: &Path, items: &[T]) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(items).map_err(|e| ServiceError::storage("encode store", e))?;
    let tmp = temp_sibling(path);

    if let Err(e) = write_synced(&tmp, &data).await {
        error!(path = %tmp.display(), error = %e, "store write failed");
        let _ = fs::remove_file(&tmp).await;
        return Err(ServiceError::storage("write store", e));
    }
    if let Err(e) = fs::rename(&tmp, path).await {
        error!(path = %path.display(), error = %e, "store replace failed");
        let _ = fs::remove_file(&tmp).await;
        return Err(ServiceError::storage("replace store", e));
    }
    sync_parent_dir(path).await;
    Ok(())
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await
}

#[cfg(unix)]
async fn sync_parent_dir(path: &Path) {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else { return };
    let res = match fs::File::open(parent).await {
        Ok(dir) => dir.sync_all().await,
        Err(e) => Err(e),
    };
    if let Err(e) = res {
        debug!(dir = %parent.display(), error = %e, "store dir sync skipped");
    }
}

#[cfg(not(unix))]
async fn sync_parent_dir(_path: &Path) {}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
}
