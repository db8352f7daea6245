//! Service wiring: which store, which number generator, which token codec.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use ledger_auth::{AuthConfig, Hs256Jwt, JwtIssuer, JwtValidator};
use ledger_infra::db::{self, PoolConfig};
use ledger_infra::{
    AccountNumberGenerator, AccountStore, InMemoryAccountStore, PostgresAccountStore, RandomAccountNumbers,
    StoreError,
};
use ledger_core::NewAccount;

use crate::app::dto::CreateAccountResponse;
use crate::app::errors::ApiError;
use crate::config::{ServerConfig, DEFAULT_STORE_TIMEOUT};
use crate::gate::AccessGate;

/// How many account numbers to try before giving up on a create.
pub const MAX_NUMBER_DRAWS: usize = 3;

#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn AccountStore>,
    pub numbers: Arc<dyn AccountNumberGenerator>,
    pub issuer: Arc<dyn JwtIssuer>,
    pub validator: Arc<dyn JwtValidator>,
    pub store_timeout: Duration,
}

impl AppServices {
    pub fn new(store: Arc<dyn AccountStore>, auth: &AuthConfig, store_timeout: Duration) -> Self {
        let jwt = Arc::new(Hs256Jwt::new(auth));
        Self {
            store,
            numbers: Arc::new(RandomAccountNumbers),
            issuer: jwt.clone(),
            validator: jwt,
            store_timeout,
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory(auth: &AuthConfig) -> Self {
        Self::new(Arc::new(InMemoryAccountStore::new()), auth, DEFAULT_STORE_TIMEOUT)
    }

    pub fn with_numbers(mut self, numbers: Arc<dyn AccountNumberGenerator>) -> Self {
        self.numbers = numbers;
        self
    }

    pub fn gate(&self) -> AccessGate {
        AccessGate::new(self.validator.clone(), self.store.clone(), self.store_timeout)
    }

    /// Open an account and mint the token that grants access to it.
    ///
    /// A number already taken by another account is replaced with a fresh
    /// draw, up to [`MAX_NUMBER_DRAWS`] numbers in total.
    pub async fn open_account(&self, first_name: &str, last_name: &str) -> Result<CreateAccountResponse, ApiError> {
        let now = Utc::now();
        let mut new = NewAccount::open(first_name, last_name, self.numbers.next_number(), now)?;

        let mut draws = 1;
        let account = loop {
            match self.store.create_account(new.clone()).await {
                Ok(account) => break account,
                Err(StoreError::Conflict(detail)) if draws < MAX_NUMBER_DRAWS => {
                    tracing::debug!(draws, %detail, "account number taken; drawing another");
                    new = new.with_number(self.numbers.next_number());
                    draws += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        let token = self.issuer.issue(account.number(), now)?;
        tracing::info!(account_id = %account.id(), "account opened");
        Ok(CreateAccountResponse { account, token })
    }
}

/// Pick the store backend from configuration.
///
/// With a database URL the Postgres store is used and its schema is
/// bootstrapped; otherwise everything lives in memory.
pub async fn build_services(config: &ServerConfig) -> Result<AppServices, StoreError> {
    let store: Arc<dyn AccountStore> = match &config.database_url {
        Some(url) => {
            let pool = db::connect(url, &PoolConfig::default()).await?;
            let store = PostgresAccountStore::new(pool);
            store.init().await?;
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; accounts are kept in memory and lost on restart");
            Arc::new(InMemoryAccountStore::new())
        }
    };

    Ok(AppServices::new(store, &config.auth, config.store_timeout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_auth::SigningSecret;
    use ledger_core::AccountNumber;
    use ledger_infra::SequentialAccountNumbers;

    fn auth() -> AuthConfig {
        AuthConfig::new(SigningSecret::new("services-secret").unwrap(), chrono::Duration::minutes(5)).unwrap()
    }

    /// Always proposes the same number.
    struct Fixed(i64);

    impl AccountNumberGenerator for Fixed {
        fn next_number(&self) -> AccountNumber {
            AccountNumber::new(self.0)
        }
    }

    #[tokio::test]
    async fn opened_account_token_validates_to_its_number() {
        let services = AppServices::in_memory(&auth());
        let opened = services.open_account("Ann", "Lee").await.unwrap();

        let claims = services.validator.validate(&opened.token, Utc::now()).unwrap();
        assert_eq!(claims.account_number, opened.account.number());
    }

    #[tokio::test]
    async fn invalid_name_is_a_validation_error() {
        let services = AppServices::in_memory(&auth());
        let err = services.open_account("  ", "Lee").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(services.store.get_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn taken_number_is_redrawn() {
        let services = AppServices::in_memory(&auth());
        let services = services.with_numbers(Arc::new(SequentialAccountNumbers::starting_at(500)));
        let first = services.open_account("Ann", "Lee").await.unwrap();

        // Next draws would be 501, 502; make the first of them collide.
        let squatter = NewAccount::open("Sam", "Q", AccountNumber::new(501), Utc::now()).unwrap();
        services.store.create_account(squatter).await.unwrap();

        let second = services.open_account("Bob", "Kay").await.unwrap();
        assert_eq!(first.account.number(), AccountNumber::new(500));
        assert_eq!(second.account.number(), AccountNumber::new(502));
    }

    #[tokio::test]
    async fn gives_up_after_max_draws() {
        let services = AppServices::in_memory(&auth()).with_numbers(Arc::new(Fixed(42)));
        services.open_account("Ann", "Lee").await.unwrap();

        let err = services.open_account("Bob", "Kay").await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(services.store.get_accounts().await.unwrap().len(), 1);
    }
}
