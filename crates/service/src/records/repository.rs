use async_trait::async_trait;

use super::domain::FormRecord;
use crate::errors::ServiceError;

/// Persistence seam for form records.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Persist `record` after every record already stored. On error the
    /// record must be treated as not stored.
    async fn append(&self, record: FormRecord) -> Result<FormRecord, ServiceError>;
    /// All records in insertion order.
    async fn list_all(&self) -> Result<Vec<FormRecord>, ServiceError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryRecordRepository {
        records: Mutex<Vec<FormRecord>>,
        fail_writes: AtomicBool,
    }

    impl InMemoryRecordRepository {
        /// Repository whose appends always fail with a storage error.
        pub fn failing() -> Self {
            Self { records: Mutex::default(), fail_writes: AtomicBool::new(true) }
        }

        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        fn records(&self) -> std::sync::MutexGuard<'_, Vec<FormRecord>> {
            self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    #[async_trait]
    impl RecordRepository for InMemoryRecordRepository {
        async fn append(&self, record: FormRecord) -> Result<FormRecord, ServiceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ServiceError::Storage("in-memory store rejected write".into()));
            }
            self.records().push(record.clone());
            Ok(record)
        }

        async fn list_all(&self) -> Result<Vec<FormRecord>, ServiceError> {
            Ok(self.records().clone())
        }
    }
}
