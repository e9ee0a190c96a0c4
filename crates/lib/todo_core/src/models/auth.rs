//! Authentication domain models.
//!
//! These are internal domain models, distinct from the API request/response
//! shapes in `todo_api::models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;
use crate::auth::password::CredentialHash;

/// Longest accepted email address.
const MAX_EMAIL_LEN: usize = 255;

/// Domain user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User with password hash (for internal auth flows).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserWithPassword {
    #[sqlx(flatten)]
    pub user: User,
    pub hashed_password: String,
}

impl UserWithPassword {
    pub fn credential_hash(&self) -> CredentialHash {
        CredentialHash::from_stored(self.hashed_password.clone())
    }
}

/// Fields needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: CredentialHash,
}

/// Trim, lower-case and sanity-check an email address.
///
/// Accepts `local@domain.tld` where the local part uses `[A-Za-z0-9._%+-]`,
/// the domain `[A-Za-z0-9.-]`, and the TLD is at least two letters.
pub fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim();
    let invalid = || AuthError::ValidationError("Invalid email format".into());

    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c));
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    if local_ok && host_ok && tld_ok {
        Ok(email.to_lowercase())
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Jane.Doe+todo@Example.COM ").unwrap(),
            "jane.doe+todo@example.com"
        );
    }

    #[test]
    fn bad_emails_are_rejected() {
        for bad in [
            "",
            "plain",
            "@example.com",
            "user@",
            "user@example",
            "user@example.c",
            "user@exa mple.com",
            "us er@example.com",
            "user@@example.com",
        ] {
            assert!(normalize_email(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
