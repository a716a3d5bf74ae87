use std::{path::PathBuf, sync::Arc};

use crate::errors::ServiceError;
use crate::records::domain::FormRecord;
use crate::records::repository::RecordRepository;
use crate::storage::JsonArrayStore;

/// Records persisted as one pretty-printed JSON array file.
#[derive(Clone)]
pub struct JsonFileRecordRepository {
    store: Arc<JsonArrayStore<FormRecord>>,
}

impl JsonFileRecordRepository {
    /// Open the records file, creating it as `[]` if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonArrayStore::<FormRecord>::new(path).await?;
        Ok(Arc::new(Self { store }))
    }

    pub fn path(&self) -> &std::path::Path {
        self.store.path()
    }
}

#[async_trait::async_trait]
impl RecordRepository for JsonFileRecordRepository {
    async fn append(&self, record: FormRecord) -> Result<FormRecord, ServiceError> {
        self.store.append(record).await
    }

    async fn list_all(&self) -> Result<Vec<FormRecord>, ServiceError> {
        self.store.list().await
    }
}
