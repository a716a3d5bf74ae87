use std::sync::Arc;

use chrono::{DateTime, Utc};
use configs::TimestampFormat;
use tracing::{error, info, instrument};

use super::domain::{FormInput, FormRecord};
use super::repository::RecordRepository;
use super::timestamp::format_timestamp;
use crate::errors::ServiceError;

/// Form submission workflow, independent of the web framework.
#[derive(Clone)]
pub struct FormService {
    repo: Arc<dyn RecordRepository>,
    timestamps: TimestampFormat,
}

impl FormService {
    pub fn new(repo: Arc<dyn RecordRepository>, timestamps: TimestampFormat) -> Self {
        Self { repo, timestamps }
    }

    /// Validate and persist a submission stamped with the current time.
    ///
    /// # Examples
    /// ```
    /// use service::records::{FormService, domain::FormInput, repository::mock::InMemoryRecordRepository};
    /// use std::sync::Arc;
    /// let svc = FormService::new(Arc::new(InMemoryRecordRepository::default()), configs::TimestampFormat::Iso);
    /// let rec = tokio_test::block_on(svc.submit(FormInput::new("Ana", "ana@example.com", "hola"), None)).unwrap();
    /// assert_eq!(rec.name, "Ana");
    /// assert!(rec.submitted_by.is_none());
    /// ```
    pub async fn submit(&self, input: FormInput, submitted_by: Option<String>) -> Result<FormRecord, ServiceError> {
        self.submit_at(input, submitted_by, Utc::now()).await
    }

    /// Same as [`FormService::submit`] with an explicit append instant.
    #[instrument(skip(self, input, submitted_by), fields(by = submitted_by.as_deref().unwrap_or("-")))]
    pub async fn submit_at(
        &self,
        input: FormInput,
        submitted_by: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<FormRecord, ServiceError> {
        let form = input.validate()?;
        let record = FormRecord {
            name: form.name,
            email: form.email,
            message: form.message,
            submitted_at: format_timestamp(now, self.timestamps),
            submitted_by,
        };

        match self.repo.append(record).await {
            Ok(stored) => {
                info!(email = %stored.email, submitted_at = %stored.submitted_at, "form_submitted");
                Ok(stored)
            }
            Err(e) => {
                error!(error = %e, "form submission not persisted");
                Err(e)
            }
        }
    }

    pub async fn list_all(&self) -> Result<Vec<FormRecord>, ServiceError> {
        self.repo.list_all().await
    }
}
