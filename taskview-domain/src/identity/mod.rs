//! Identity extraction from a bearer credential.
//!
//! The credential is a three-segment signed token whose middle segment is a
//! base64url JSON claims object. Payloads in the standard base64 alphabet are
//! accepted too. Only the payload is decoded; the signature is not
//! checked here (the store verifies it on every request), so the result is only
//! good for scoping what the view shows.

pub mod errors;

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::credentials::Credential;
use crate::tasks::UserId;

pub use errors::IdentityError;

/// Claims read from a credential payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialClaims {
    pub subject: UserId,
    /// `exp`, when present. Informational only; nothing is rejected because of it.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CredentialClaims {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |exp| exp <= now)
    }
}

#[derive(Deserialize)]
struct RawClaims {
    #[serde(rename = "userId")]
    user_id: Option<UserId>,
    sub: Option<UserId>,
    exp: Option<Value>,
}

/// Decodes the claims of a non-blank credential.
///
/// The subject is the `userId` claim, falling back to the standard `sub`.
pub fn decode_claims(credential: &Credential) -> Result<CredentialClaims, IdentityError> {
    let token = credential.as_str().trim();
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(IdentityError::Malformed(format!(
            "expected 3 dot-separated segments, found {}",
            segments.len()
        )));
    }

    let encoded = segments[1].trim_end_matches('=');
    let payload = URL_SAFE_NO_PAD
        .decode(encoded)
        .or_else(|_| STANDARD_NO_PAD.decode(encoded))
        .map_err(|e| IdentityError::Malformed(format!("payload is not base64: {}", e)))?;

    let value: Value = serde_json::from_slice(&payload)
        .map_err(|e| IdentityError::Malformed(format!("payload is not JSON: {}", e)))?;
    if !value.is_object() {
        return Err(IdentityError::Malformed("payload is not a JSON object".to_string()));
    }
    let raw: RawClaims = serde_json::from_value(value)
        .map_err(|e| IdentityError::Malformed(format!("unreadable claims: {}", e)))?;

    let subject = raw
        .user_id
        .or(raw.sub)
        .ok_or_else(|| IdentityError::Malformed("no userId or sub claim".to_string()))?;
    let expires_at = raw
        .exp
        .as_ref()
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

    Ok(CredentialClaims { subject, expires_at })
}

/// The identity a credential asserts.
///
/// `Ok(None)` for an absent or blank credential; [`IdentityError::Malformed`] when
/// a present credential cannot be decoded. Never returns a partial identity.
pub fn extract_identity(credential: Option<&Credential>) -> Result<Option<UserId>, IdentityError> {
    match credential {
        Some(credential) if !credential.is_blank() => decode_claims(credential).map(|c| Some(c.subject)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn token_with(claims: Value) -> Credential {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        Credential::new(format!("{}.{}.c2lnbmF0dXJl", header, payload))
    }

    #[test]
    fn test_extracts_numeric_user_id() {
        let credential = token_with(json!({ "userId": 7, "iat": 1700000000 }));
        assert_eq!(extract_identity(Some(&credential)).unwrap(), Some(UserId::from(7)));
    }

    #[test]
    fn test_falls_back_to_sub() {
        let credential = token_with(json!({ "sub": "alice" }));
        assert_eq!(extract_identity(Some(&credential)).unwrap(), Some(UserId::new("alice").unwrap()));
    }

    #[test]
    fn test_user_id_wins_over_sub() {
        let credential = token_with(json!({ "userId": "7", "sub": "alice" }));
        assert_eq!(extract_identity(Some(&credential)).unwrap(), Some(UserId::from(7)));
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let header = URL_SAFE_NO_PAD.encode(b"{}");
        let payload = URL_SAFE.encode(json!({ "userId": 12 }).to_string());
        let credential = Credential::new(format!("{}.{}.sig", header, payload));
        assert_eq!(extract_identity(Some(&credential)).unwrap(), Some(UserId::from(12)));
    }

    #[test]
    fn test_standard_alphabet_payload_is_accepted() {
        let payload = "eyJ1c2VySWQiOjEyLCJub3RlIjoiPj4+Pz8/In0";
        assert!(payload.contains('+') && payload.contains('/'));
        let credential = Credential::new(format!("e30.{}.sig", payload));
        assert_eq!(extract_identity(Some(&credential)).unwrap(), Some(UserId::from(12)));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(Credential::new("")))]
    #[case(Some(Credential::new("  \t")))]
    fn test_absent_credential_yields_no_identity(#[case] credential: Option<Credential>) {
        assert_eq!(extract_identity(credential.as_ref()).unwrap(), None);
    }

    #[rstest]
    #[case("garbage")]
    #[case("a.b")]
    #[case("a.!!!.c")]
    #[case("a.bm90IGpzb24.c")]
    fn test_malformed_credential(#[case] token: &str) {
        let result = extract_identity(Some(&Credential::new(token)));
        assert!(matches!(result, Err(IdentityError::Malformed(_))), "{:?}", result);
    }

    #[test]
    fn test_payload_without_subject_is_malformed() {
        let credential = token_with(json!({ "role": "admin" }));
        assert!(matches!(extract_identity(Some(&credential)), Err(IdentityError::Malformed(_))));
    }

    #[test]
    fn test_array_payload_is_malformed() {
        let credential = token_with(json!([7, "alice"]));
        assert!(matches!(extract_identity(Some(&credential)), Err(IdentityError::Malformed(_))));
    }

    #[test]
    fn test_expiry_is_informational() {
        let credential = token_with(json!({ "userId": 7, "exp": 1000 }));
        let claims = decode_claims(&credential).unwrap();
        let exp = DateTime::<Utc>::from_timestamp(1000, 0).unwrap();
        assert_eq!(claims.expires_at, Some(exp));
        assert!(claims.is_expired_at(Utc::now()));
        assert_eq!(extract_identity(Some(&credential)).unwrap(), Some(UserId::from(7)));
    }
}
