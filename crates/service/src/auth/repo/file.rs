use std::{path::PathBuf, sync::Arc};

use crate::auth::domain::Credential;
use crate::auth::errors::AuthError;
use crate::auth::repository::CredentialRepository;
use crate::errors::ServiceError;
use crate::storage::JsonArrayStore;

/// Credentials persisted as one pretty-printed JSON array file.
#[derive(Clone)]
pub struct JsonFileCredentialRepository {
    store: Arc<JsonArrayStore<Credential>>,
}

impl JsonFileCredentialRepository {
    /// Open the credentials file, creating it as `[]` if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonArrayStore::<Credential>::new(path).await?;
        Ok(Arc::new(Self { store }))
    }
}

#[async_trait::async_trait]
impl CredentialRepository for JsonFileCredentialRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, AuthError> {
        let creds = self.store.list().await?;
        Ok(creds.into_iter().find(|c| c.username == username))
    }

    async fn insert_unique(&self, credential: Credential) -> Result<Credential, AuthError> {
        self.store
            .append_with(|existing| {
                if existing.iter().any(|c| c.username == credential.username) {
                    return Err(AuthError::DuplicateUser);
                }
                Ok(credential)
            })
            .await
    }

    async fn list(&self) -> Result<Vec<Credential>, AuthError> {
        Ok(self.store.list().await?)
    }
}
