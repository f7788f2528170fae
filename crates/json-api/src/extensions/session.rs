//! Depot extensions for the authenticated session.

use cradle_app::auth::UserUuid;
use salvo::prelude::{Depot, StatusError};

const USER_UUID_KEY: &str = "session.user_uuid";

/// Accessors for the user identity stored by the auth middleware.
pub(crate) trait SessionExt {
    fn insert_user_uuid(&mut self, user: UserUuid);

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError>;
}

impl SessionExt for Depot {
    fn insert_user_uuid(&mut self, user: UserUuid) {
        self.insert(USER_UUID_KEY, user);
    }

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError> {
        self.get::<UserUuid>(USER_UUID_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
