//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{
    AuthServiceError, IssuedSession, NewSession, UserUuid, generate_session_token, hash_token,
    repository::PgAuthRepository,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new session for the given user, returning the raw token.
    ///
    /// The raw token is shown once and never stored; lookups go through
    /// its SHA-256 hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insertion fails.
    pub async fn issue_session(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedSession, AuthServiceError> {
        let token = generate_session_token();

        let session = self
            .repository
            .create_session(&NewSession {
                uuid: Uuid::now_v7(),
                user_uuid: user,
                token_hash: hash_token(&token),
                expires_at,
            })
            .await?;

        Ok(IssuedSession { token, session })
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, token: &str) -> Result<UserUuid, AuthServiceError> {
        self.repository
            .find_session_by_token_hash(&hash_token(token))
            .await?
            .map(|session| session.user_uuid)
            .ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the user it authenticates.
    async fn authenticate_bearer(&self, token: &str) -> Result<UserUuid, AuthServiceError>;
}
