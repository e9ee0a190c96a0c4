//! JWT encoding and signature-checked decoding (HS256).
//!
//! This layer knows nothing about expiry or required claims; see
//! [`super::validator`] for the policy built on top of it.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde_json::Value;

use super::AuthError;

/// Default access token lifetime: 30 minutes.
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 30;

/// Claim carrying the owner id.
pub const USER_ID_CLAIM: &str = "user_id";

/// Claim carrying the expiry (unix seconds).
pub const EXP_CLAIM: &str = "exp";

/// Untyped payload as decoded from the wire.
pub type RawClaims = serde_json::Map<String, Value>;

/// Typed claims with the two required fields lifted out.
///
/// Anything else (e.g. `email`) rides along in `extra` and is flattened into
/// the payload on encode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claims {
    pub user_id: i64,
    /// Expiry (unix timestamp, seconds).
    pub exp: i64,
    #[serde(flatten)]
    pub extra: RawClaims,
}

impl Claims {
    pub fn new(user_id: i64, exp: i64) -> Self {
        Self {
            user_id,
            exp,
            extra: RawClaims::new(),
        }
    }

    /// Attach an optional claim.
    pub fn with_claim(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn email(&self) -> Option<&str> {
        self.extra.get("email").and_then(Value::as_str)
    }

    /// Build typed claims from a decoded payload.
    ///
    /// `user_id` may be an integer or a decimal string; `exp` may be an
    /// integer or a float (truncated). Returns `None` when either is absent or
    /// not coercible.
    pub fn from_raw(mut raw: RawClaims) -> Option<Self> {
        let user_id = raw.remove(USER_ID_CLAIM).as_ref().and_then(coerce_user_id)?;
        let exp = raw.remove(EXP_CLAIM).as_ref().and_then(coerce_timestamp)?;
        Some(Self {
            user_id,
            exp,
            extra: raw,
        })
    }
}

fn coerce_user_id(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a unix-seconds claim, accepting integer or float encodings.
pub(crate) fn coerce_timestamp(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    }
}

/// Why a token could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Wrong segment count, bad base64, bad JSON, or unsupported algorithm.
    Malformed,
    /// Structurally fine but the HMAC does not match.
    SignatureInvalid,
}

/// Sign `claims` as `header.payload.signature` with HMAC-SHA256.
pub fn encode_token(claims: &Claims, secret: &[u8]) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
}

/// Decode a token and check its signature. Expiry is NOT checked.
pub fn decode_token(token: &str, secret: &[u8]) -> Result<RawClaims, DecodeError> {
    if token.split('.').count() != 3 {
        return Err(DecodeError::Malformed);
    }
    decode::<RawClaims>(token, &DecodingKey::from_secret(secret), &structural_validation())
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => DecodeError::SignatureInvalid,
            _ => DecodeError::Malformed,
        })
}

/// Decode a token WITHOUT checking its signature.
///
/// Only for classifying an already-rejected token (e.g. reporting "expired"
/// rather than "bad signature"). Never authorize on this result.
pub fn decode_token_unverified(token: &str) -> Result<RawClaims, DecodeError> {
    if token.split('.').count() != 3 {
        return Err(DecodeError::Malformed);
    }
    let mut validation = structural_validation();
    validation.insecure_disable_signature_validation();
    decode::<RawClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|_| DecodeError::Malformed)
}

/// HS256 only, and no registered-claim checks: those belong to the validator.
fn structural_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims = HashSet::new();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation
}

/// Mint an access token for a user, expiring `ttl` from now.
pub fn issue_access_token(
    user_id: i64,
    email: &str,
    ttl: Duration,
    secret: &[u8],
) -> Result<String, AuthError> {
    let exp = (Utc::now() + ttl).timestamp();
    let claims = Claims::new(user_id, exp).with_claim("email", email);
    encode_token(&claims, secret)
}
