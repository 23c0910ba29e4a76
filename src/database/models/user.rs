use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public view of a user. The password hash lives only in [`UserCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

/// Row used by login only
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password: String,
}

/// A user payload that already passed validation. The password travels
/// separately, hashed, so this type can never hold plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl NewUser {
    pub fn with_id(self, id: i32) -> User {
        User {
            id,
            fullname: self.fullname,
            username: self.username,
            email: self.email,
            is_admin: self.is_admin,
        }
    }
}
