//! Token verification policy: signature, expiry and required claims.

use chrono::Utc;

use super::jwt::{
    Claims, DecodeError, EXP_CLAIM, RawClaims, coerce_timestamp, decode_token,
    decode_token_unverified,
};

/// Result of verifying a bearer token.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    Valid(Claims),
    SignatureInvalid,
    Malformed,
    Expired,
    MissingClaims,
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid(_))
    }
}

/// Verify `token` against the system clock.
pub fn verify_token(token: &str, secret: &[u8]) -> VerificationOutcome {
    verify_token_at(token, secret, Utc::now().timestamp())
}

/// Verify `token` as of `now` (unix seconds). No clock-skew leeway.
///
/// A token whose signature fails but whose embedded `exp` has passed is
/// reported as [`VerificationOutcome::Expired`]: the client-facing answer for
/// any stale token is "expired", whatever else is wrong with it.
pub fn verify_token_at(token: &str, secret: &[u8], now: i64) -> VerificationOutcome {
    let raw = match decode_token(token, secret) {
        Ok(raw) => raw,
        Err(DecodeError::Malformed) => return VerificationOutcome::Malformed,
        Err(DecodeError::SignatureInvalid) => {
            return match decode_token_unverified(token) {
                Ok(unverified) if is_expired(&unverified, now) => VerificationOutcome::Expired,
                _ => VerificationOutcome::SignatureInvalid,
            };
        }
    };

    if is_expired(&raw, now) {
        return VerificationOutcome::Expired;
    }

    match Claims::from_raw(raw) {
        Some(claims) => VerificationOutcome::Valid(claims),
        None => VerificationOutcome::MissingClaims,
    }
}

/// A token without a readable `exp` is not "expired"; it fails the
/// required-claims check instead.
fn is_expired(raw: &RawClaims, now: i64) -> bool {
    raw.get(EXP_CLAIM)
        .and_then(coerce_timestamp)
        .is_some_and(|exp| now >= exp)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::auth::jwt::encode_token;

    const SECRET: &[u8] = b"validator-secret";

    /// Sign an arbitrary JSON payload with HS256.
    fn sign_raw(payload: serde_json::Value, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &payload,
            &jsonwebtoken::EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn fresh_token_is_valid_with_owner_id() {
        for user_id in [1_i64, 42, 9_000_000_000] {
            let exp = (Utc::now() + Duration::minutes(5)).timestamp();
            let token = encode_token(&Claims::new(user_id, exp), SECRET).unwrap();
            match verify_token(&token, SECRET) {
                VerificationOutcome::Valid(c) => assert_eq!(c.user_id, user_id),
                other => panic!("expected Valid, got {other:?}"),
            }
        }
    }

    #[test]
    fn past_exp_is_expired() {
        let token = encode_token(&Claims::new(1, 1_000), SECRET).unwrap();
        assert_eq!(verify_token(&token, SECRET), VerificationOutcome::Expired);
    }

    #[test]
    fn past_exp_is_expired_even_with_bad_signature() {
        let token = encode_token(&Claims::new(1, 1_000), b"someone-elses-secret").unwrap();
        assert_eq!(verify_token(&token, SECRET), VerificationOutcome::Expired);
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let token = encode_token(&Claims::new(1, 5_000), SECRET).unwrap();
        assert!(verify_token_at(&token, SECRET, 4_999).is_valid());
        assert_eq!(
            verify_token_at(&token, SECRET, 5_000),
            VerificationOutcome::Expired
        );
    }

    #[test]
    fn foreign_signature_on_live_token_is_signature_invalid() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        let token = encode_token(&Claims::new(1, exp), b"someone-elses-secret").unwrap();
        assert_eq!(
            verify_token(&token, SECRET),
            VerificationOutcome::SignatureInvalid
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(verify_token("nope", SECRET), VerificationOutcome::Malformed);
        assert_eq!(verify_token("a.b.c.d", SECRET), VerificationOutcome::Malformed);
    }

    #[test]
    fn missing_user_id_is_missing_claims() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        let token = sign_raw(serde_json::json!({ "exp": exp, "email": "x@y.z" }), SECRET);
        assert_eq!(
            verify_token(&token, SECRET),
            VerificationOutcome::MissingClaims
        );
    }

    #[test]
    fn missing_exp_is_missing_claims() {
        let token = sign_raw(serde_json::json!({ "user_id": 1 }), SECRET);
        assert_eq!(
            verify_token(&token, SECRET),
            VerificationOutcome::MissingClaims
        );
    }

    #[test]
    fn string_user_id_is_coerced() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        let token = sign_raw(serde_json::json!({ "user_id": "17", "exp": exp }), SECRET);
        match verify_token(&token, SECRET) {
            VerificationOutcome::Valid(c) => assert_eq!(c.user_id, 17),
            other => panic!("expected Valid, got {other:?}"),
        }
    }
}
