use serde_json::Value;

use super::{Payload, Text, ValidationError};
use crate::database::models::NewUser;

/// bcrypt ignores everything past 72 bytes
const MAX_PASSWORD_BYTES: usize = 72;
const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    Required,
    /// Absent means keep the stored password
    Optional,
}

/// A validated user plus the plaintext password still to be hashed
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub user: NewUser,
    pub password: Option<String>,
}

pub fn validate_user(body: &Value, rule: PasswordRule) -> Result<UserDraft, ValidationError> {
    let mut p = Payload::new(body)?;

    let fullname = p.string("fullname", Text::trimmed(1, 100));
    let username = p.string("username", Text::trimmed(1, 20));
    if matches!(&username, Some(u) if u.chars().any(char::is_whitespace)) {
        p.violate("username", "Must not contain spaces");
    }
    let email = p.email("email");
    let is_admin = p.optional_boolean("is_admin");
    let password = read_password(&mut p, rule);

    match (fullname, username, email, is_admin, password) {
        (Some(fullname), Some(username), Some(email), Some(is_admin), Some(password)) => {
            p.finish(UserDraft {
                user: NewUser {
                    fullname,
                    username,
                    email,
                    is_admin: is_admin.unwrap_or(false),
                },
                password,
            })
        }
        _ => Err(p.into_error()),
    }
}

/// Passwords are taken verbatim: no trimming, length checked before hashing
fn read_password(p: &mut Payload<'_>, rule: PasswordRule) -> Option<Option<String>> {
    let Some(raw) = p.get("password") else {
        return match rule {
            PasswordRule::Required => {
                p.violate("password", "Required");
                None
            }
            PasswordRule::Optional => Some(None),
        };
    };

    let Some(password) = raw.as_str() else {
        p.violate("password", "Expected a string");
        return None;
    };
    if password.chars().count() < MIN_PASSWORD_CHARS {
        p.violate(
            "password",
            format!("Must be at least {} characters long", MIN_PASSWORD_CHARS),
        );
        return None;
    }
    if password.len() > MAX_PASSWORD_BYTES {
        p.violate(
            "password",
            format!("Must be at most {} bytes long", MAX_PASSWORD_BYTES),
        );
        return None;
    }
    Some(Some(password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn password_required_on_create() {
        let body = json!({ "fullname": "Ana Souza", "username": "ana", "email": "ana@example.com" });
        let err = validate_user(&body, PasswordRule::Required).unwrap_err();
        assert!(err.has_field("password"));

        let draft = validate_user(&body, PasswordRule::Optional).unwrap();
        assert!(draft.password.is_none());
        assert!(!draft.user.is_admin);
    }

    #[test]
    fn rejects_short_password_and_spaced_username() {
        let body = json!({
            "fullname": "Ana Souza",
            "username": "ana souza",
            "email": "ana@example.com",
            "password": "short",
            "is_admin": true
        });
        let err = validate_user(&body, PasswordRule::Required).unwrap_err();
        assert!(err.has_field("password"));
        assert!(err.has_field("username"));
        assert!(!err.has_field("is_admin"));
    }

    #[test]
    fn keeps_plaintext_for_hashing() {
        let body = json!({
            "fullname": "Ana Souza",
            "username": "ana",
            "email": "ana@example.com",
            "password": "s3cret-pass",
            "is_admin": true
        });
        let draft = validate_user(&body, PasswordRule::Required).unwrap();
        assert_eq!(draft.password.as_deref(), Some("s3cret-pass"));
        assert!(draft.user.is_admin);
    }
}
