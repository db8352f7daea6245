use thiserror::Error;

use ledger_core::AccountNumber;

use crate::IdentityClaims;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("token is bound to account number {claimed}, resource belongs to {actual}")]
    SubjectMismatch {
        claimed: AccountNumber,
        actual: AccountNumber,
    },
}

/// Resource binding: verified claims may act on an account only if they
/// name that account's number.
///
/// - No IO
/// - No panics
/// - Claims must already be verified (signature + time window)
pub fn authorize_account_access(claims: &IdentityClaims, subject: AccountNumber) -> Result<(), AuthzError> {
    if claims.account_number == subject {
        Ok(())
    } else {
        Err(AuthzError::SubjectMismatch {
            claimed: claims.account_number,
            actual: subject,
        })
    }
}
