use async_trait::async_trait;

use super::domain::Credential;
use super::errors::AuthError;

/// Repository abstraction for credential persistence.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Case-sensitive lookup.
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, AuthError>;
    /// Persist `credential` unless its username is already taken; the check
    /// and the write happen atomically.
    async fn insert_unique(&self, credential: Credential) -> Result<Credential, AuthError>;
    async fn list(&self) -> Result<Vec<Credential>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCredentialRepository {
        creds: Mutex<Vec<Credential>>,
    }

    impl MockCredentialRepository {
        fn creds(&self) -> std::sync::MutexGuard<'_, Vec<Credential>> {
            self.creds.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    #[async_trait]
    impl CredentialRepository for MockCredentialRepository {
        async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, AuthError> {
            Ok(self.creds().iter().find(|c| c.username == username).cloned())
        }

        async fn insert_unique(&self, credential: Credential) -> Result<Credential, AuthError> {
            let mut creds = self.creds();
            if creds.iter().any(|c| c.username == credential.username) {
                return Err(AuthError::DuplicateUser);
            }
            creds.push(credential.clone());
            Ok(credential)
        }

        async fn list(&self) -> Result<Vec<Credential>, AuthError> {
            Ok(self.creds().clone())
        }
    }
}
