use std::sync::{Arc, OnceLock};

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use tracing::{info, debug, warn, instrument};

use super::domain::{Credential, LoginInput, RegisterInput, SessionToken, TokenUser};
use super::errors::AuthError;
use super::repository::CredentialRepository;
use super::token;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl: Duration::hours(1) }
    }
}

/// Auth business service independent of web framework
#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn CredentialRepository>,
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(repo: Arc<dyn CredentialRepository>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockCredentialRepository};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockCredentialRepository::default()), AuthConfig::new("secret"));
    /// let cred = tokio_test::block_on(svc.register("alice", "pw1")).unwrap();
    /// assert_eq!(cred.username, "alice");
    /// assert_ne!(cred.password_hash, "pw1");
    /// ```
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<Credential, AuthError> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(AuthError::Validation("username and password are required".into()));
        }
        // skip the expensive hash when the name is obviously taken
        if self.repo.find_by_username(username).await?.is_some() {
            debug!("username already registered");
            return Err(AuthError::DuplicateUser);
        }

        let password_hash = hash_password(password.to_string()).await?;
        let cred = self
            .repo
            .insert_unique(Credential { username: username.to_string(), password_hash })
            .await?;
        info!(username = %cred.username, "user_registered");
        Ok(cred)
    }

    pub async fn register_input(&self, input: RegisterInput) -> Result<Credential, AuthError> {
        self.register(&input.username, &input.password).await
    }

    /// Check a username/password pair. Unknown users and wrong passwords
    /// produce the same [`AuthError::Unauthorized`].
    #[instrument(skip(self, password))]
    pub async fn verify(&self, username: &str, password: &str) -> Result<Credential, AuthError> {
        let cred = match self.repo.find_by_username(username).await? {
            Some(c) => c,
            None => {
                // spend the same argon2 cost as a wrong password
                let _ = verify_password(password.to_string(), dummy_hash().await?).await;
                warn!("login_failed");
                return Err(AuthError::Unauthorized);
            }
        };
        if !verify_password(password.to_string(), cred.password_hash.clone()).await? {
            warn!("login_failed");
            return Err(AuthError::Unauthorized);
        }
        Ok(cred)
    }

    /// Authenticate a user and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockCredentialRepository};
    /// use service::auth::domain::LoginInput;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockCredentialRepository::default()), AuthConfig::new("secret"));
    /// tokio_test::block_on(svc.register("alice", "pw1")).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "alice".into(), password: "pw1".into() })).unwrap();
    /// assert_eq!(svc.verify_token(&session.token).unwrap().username, "alice");
    /// ```
    pub async fn login(&self, input: LoginInput) -> Result<SessionToken, AuthError> {
        let cred = self.verify(&input.username, &input.password).await?;
        let session = self.issue_token(&cred.username)?;
        info!(username = %cred.username, expires_at = %session.expires_at, "login_succeeded");
        Ok(session)
    }

    pub fn issue_token(&self, username: &str) -> Result<SessionToken, AuthError> {
        self.issue_token_at(username, Utc::now())
    }

    pub fn issue_token_at(&self, username: &str, now: DateTime<Utc>) -> Result<SessionToken, AuthError> {
        token::issue(username, self.cfg.jwt_secret.as_bytes(), now, self.cfg.token_ttl)
    }

    pub fn verify_token(&self, token: &str) -> Result<TokenUser, AuthError> {
        self.verify_token_at(token, Utc::now())
    }

    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenUser, AuthError> {
        token::verify(token, self.cfg.jwt_secret.as_bytes(), now)
    }
}

/// Hashing and verification both run on the blocking pool.
async fn hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashError(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::HashError(e.to_string()))?
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Hash compared against when the username is unknown.
async fn dummy_hash() -> Result<String, AuthError> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash.clone());
    }
    let hash = hash_password("unknown-user".to_string()).await?;
    Ok(DUMMY_HASH.get_or_init(|| hash).clone())
}

async fn verify_password(password: String, stored: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored).map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    })
    .await
    .map_err(|e| AuthError::HashError(e.to_string()))?
}
