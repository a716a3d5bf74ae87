use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Client payload for a submission. The Spanish keys used by the web
/// form (`nombre`, `mensaje`) are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "mensaje")]
    pub message: Option<String>,
}

/// A submission that passed validation; all three fields are non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FormInput {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self { name: Some(name.into()), email: Some(email.into()), message: Some(message.into()) }
    }

    /// Reject missing, empty or whitespace-only fields. Email format is not checked.
    pub fn validate(self) -> Result<ValidForm, ServiceError> {
        fn required(value: Option<String>, field: &str) -> Result<String, ServiceError> {
            match value {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(ServiceError::missing_field(field)),
            }
        }
        Ok(ValidForm {
            name: required(self.name, "name")?,
            email: required(self.email, "email")?,
            message: required(self.message, "message")?,
        })
    }
}

/// Persisted submission, one element of the records file.
///
/// Legacy files written with `nombre`/`mensaje`/`fecha` keys still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    #[serde(alias = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(alias = "mensaje")]
    pub message: String,
    #[serde(alias = "fecha")]
    pub submitted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
}

impl FormRecord {
    /// `submitted_at` as an instant, when it was written in ISO form.
    pub fn submitted_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.submitted_at).ok().map(|d| d.with_timezone(&Utc))
    }
}
