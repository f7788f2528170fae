//! Auth Models

use jiff::Timestamp;
use uuid::Uuid;

use crate::uuids::TypedUuid;

/// Marker for user identifiers issued by the external identity provider.
///
/// Users themselves are not stored here; sessions reference them by UUID.
#[derive(Debug, Clone)]
pub struct UserId;

/// User UUID
pub type UserUuid = TypedUuid<UserId>;

/// A stored session: maps a hashed bearer token to its user.
#[derive(Debug, Clone)]
pub struct Session {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub token_hash: String,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// New Session Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub token_hash: String,
    pub expires_at: Option<Timestamp>,
}

/// A freshly issued session with its raw token.
///
/// The raw token is only available at issue time; storage keeps the hash.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}
