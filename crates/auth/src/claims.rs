use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

use ledger_core::AccountNumber;

/// Identity claims carried by a ledger token.
///
/// Serialized with JWT registered names for the time window (`iat`, `exp`,
/// Unix seconds) so standard tooling can read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Account number the bearer is allowed to act on.
    #[serde(rename = "accountNumber", deserialize_with = "account_number_lenient")]
    pub account_number: AccountNumber,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,

    /// Unique token id (UUIDv7). Not tracked server-side.
    #[serde(rename = "jti")]
    pub token_id: Uuid,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claims' time window against `now`.
///
/// Signature verification happens before this, in [`crate::token`].
pub fn validate_claims(claims: &IdentityClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

/// Accept the account number as an integer, or as a float with no fractional
/// part (loosely-typed JSON encoders emit `12345.0`). Anything else is a
/// malformed claim.
fn account_number_lenient<'de, D>(deserializer: D) -> Result<AccountNumber, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;

    impl serde::de::Visitor<'_> for Visitor {
        type Value = AccountNumber;

        fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str("an integral account number")
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(AccountNumber::new(v))
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v)
                .map(AccountNumber::new)
                .map_err(|_| E::custom(format!("account number {v} out of range")))
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
            // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
            if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(AccountNumber::new(v as i64))
            } else {
                Err(E::custom(format!("account number {v} is not an integer")))
            }
        }
    }

    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;
    use serde_json::json;

    fn claims_at(now: DateTime<Utc>, ttl: Duration) -> IdentityClaims {
        IdentityClaims {
            account_number: AccountNumber::new(4242),
            issued_at: now,
            expires_at: now + ttl,
            token_id: Uuid::now_v7(),
        }
    }

    #[test]
    fn window_checks() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = claims_at(now, Duration::minutes(15));

        assert_eq!(validate_claims(&claims, now), Ok(()));
        assert_eq!(
            validate_claims(&claims, now - Duration::seconds(1)),
            Err(TokenValidationError::NotYetValid)
        );
        assert_eq!(
            validate_claims(&claims, now + Duration::minutes(15)),
            Err(TokenValidationError::Expired)
        );

        let inverted = claims_at(now, Duration::seconds(0));
        assert_eq!(
            validate_claims(&inverted, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn serializes_with_registered_names() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = claims_at(now, Duration::seconds(60));
        let v = serde_json::to_value(&claims).unwrap();
        assert_eq!(v["accountNumber"], 4242);
        assert_eq!(v["iat"], 1_700_000_000i64);
        assert_eq!(v["exp"], 1_700_000_060i64);
        assert!(v["jti"].is_string());
    }

    #[test]
    fn integral_float_account_number_is_normalized() {
        let v = json!({
            "accountNumber": 98765.0,
            "iat": 1_700_000_000,
            "exp": 1_700_000_060,
            "jti": Uuid::now_v7(),
        });
        let claims: IdentityClaims = serde_json::from_value(v).unwrap();
        assert_eq!(claims.account_number, AccountNumber::new(98765));
    }

    #[test]
    fn fractional_or_textual_account_number_is_rejected() {
        for bad in [json!(1.5), json!("12345"), json!(null), json!(1e300)] {
            let v = json!({
                "accountNumber": bad,
                "iat": 1_700_000_000,
                "exp": 1_700_000_060,
                "jti": Uuid::now_v7(),
            });
            assert!(serde_json::from_value::<IdentityClaims>(v).is_err());
        }
    }

    proptest! {
        #[test]
        fn float_and_integer_encodings_agree(n in -(1i64 << 52)..(1i64 << 52)) {
            let as_int: IdentityClaims = serde_json::from_value(json!({
                "accountNumber": n, "iat": 1, "exp": 2, "jti": Uuid::nil(),
            })).unwrap();
            let as_float: IdentityClaims = serde_json::from_value(json!({
                "accountNumber": n as f64, "iat": 1, "exp": 2, "jti": Uuid::nil(),
            })).unwrap();
            prop_assert_eq!(as_int.account_number, as_float.account_number);
        }
    }
}
