//! Password hashing via bcrypt, plus the registration strength policy.

use tracing::debug;

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Characters that satisfy the "special character" rule.
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// A bcrypt hash string (`$2b$<cost>$<salt><digest>`).
///
/// Never decoded back to plaintext; only compared via [`verify_password`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap a hash loaded from storage.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Hash a password with bcrypt (cost 10). A fresh salt is drawn on every call.
pub fn hash_password(password: &str) -> Result<CredentialHash, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map(CredentialHash)
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
///
/// A malformed hash is a mismatch, not an error.
pub fn verify_password(password: &str, hash: &CredentialHash) -> bool {
    match bcrypt::verify(password, hash.as_str()) {
        Ok(matches) => matches,
        Err(e) => {
            debug!("bcrypt verify rejected stored hash: {e}");
            false
        }
    }
}

/// Check a candidate password against the registration policy.
///
/// Returns the first rule that fails, phrased for the client.
pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
    let fail = |msg: &str| Err(AuthError::ValidationError(msg.to_string()));

    if password.chars().count() < MIN_PASSWORD_LEN {
        return fail("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return fail("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return fail("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return fail("Password must contain at least one digit");
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return fail("Password must contain at least one special character");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = hash_password("S3cret!pass").unwrap();
        assert!(hash.as_str().starts_with("$2"));
        assert!(verify_password("S3cret!pass", &hash));
        assert!(!verify_password("wrong-pass", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("S3cret!pass").unwrap();
        let b = hash_password("S3cret!pass").unwrap();
        assert_ne!(a, b, "salts must differ between calls");
        assert!(verify_password("S3cret!pass", &a));
        assert!(verify_password("S3cret!pass", &b));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        let bogus = CredentialHash::from_stored("not-a-bcrypt-hash");
        assert!(!verify_password("anything", &bogus));
        assert!(!verify_password("anything", &CredentialHash::from_stored("")));
    }

    #[test]
    fn strength_policy_reports_first_failing_rule() {
        let msg = |p: &str| match validate_password_strength(p) {
            Err(AuthError::ValidationError(m)) => m,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert!(msg("Ab1!").contains("at least 8 characters"));
        assert!(msg("abcdefg1!").contains("uppercase"));
        assert!(msg("ABCDEFG1!").contains("lowercase"));
        assert!(msg("Abcdefgh!").contains("digit"));
        assert!(msg("Abcdefgh1").contains("special character"));
        assert!(validate_password_strength("Abcdefg1!").is_ok());
    }
}
