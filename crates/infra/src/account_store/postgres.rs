//! Postgres-backed account store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | any other | `Persistence` |
//! | PoolClosed / PoolTimedOut / Io / other | N/A | `Persistence` |
//!
//! `RowNotFound` never surfaces: lookups use `fetch_optional` and map `None`
//! to `NotFound` explicitly.
//!
//! ## Thread Safety
//!
//! `PostgresAccountStore` is `Send + Sync` and cheap to clone; the SQLx pool
//! owns connection management and is the only shared mutable resource.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use ledger_core::{Account, AccountId, AccountNumber, Balance, NewAccount};

use super::{AccountStore, StoreError};

const CREATE_ACCOUNT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS account (
    id          BIGSERIAL PRIMARY KEY,
    first_name  VARCHAR(50) NOT NULL,
    last_name   VARCHAR(50) NOT NULL,
    number      BIGINT NOT NULL UNIQUE,
    balance     BIGINT NOT NULL DEFAULT 0 CHECK (balance >= 0),
    created_at  TIMESTAMPTZ NOT NULL
)
"#;

#[derive(Debug, Clone)]
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `account` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_ACCOUNT_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("init", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AccountStore for PostgresAccountStore {
    #[instrument(skip(self, account), fields(number = %account.number()), err)]
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO account (first_name, last_name, number, balance, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(account.first_name())
        .bind(account.last_name())
        .bind(account.number().get())
        .bind(account.balance().minor_units())
        .bind(account.created_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_account", e))?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| StoreError::persistence(format!("failed to read assigned id: {e}")))?;

        Ok(account.into_account(AccountId::new(id)))
    }

    #[instrument(skip(self), fields(account_id = %id), err)]
    async fn get_account_by_id(&self, id: AccountId) -> Result<Account, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, number, balance, created_at
            FROM account
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_account_by_id", e))?;

        match row {
            Some(row) => account_from_row(&row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    #[instrument(skip(self), err)]
    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name, number, balance, created_at
            FROM account
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_accounts", e))?;

        rows.iter().map(account_from_row).collect()
    }

    #[instrument(skip(self), fields(account_id = %id), err)]
    async fn delete_account(&self, id: AccountId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_account", e))?;

        tracing::debug!(rows = result.rows_affected(), "delete_account");
        Ok(())
    }

    async fn update_account(&self, _account: &Account) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("update_account"))
    }
}

fn account_from_row(row: &PgRow) -> Result<Account, StoreError> {
    let decode = |e: sqlx::Error| StoreError::persistence(format!("failed to decode account row: {e}"));

    let id: i64 = row.try_get("id").map_err(decode)?;
    let first_name: String = row.try_get("first_name").map_err(decode)?;
    let last_name: String = row.try_get("last_name").map_err(decode)?;
    let number: i64 = row.try_get("number").map_err(decode)?;
    let balance: i64 = row.try_get("balance").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;

    let balance = Balance::new(balance)
        .map_err(|e| StoreError::persistence(format!("account {id} has invalid balance: {e}")))?;

    Ok(Account::from_parts(
        AccountId::new(id),
        first_name,
        last_name,
        AccountNumber::new(number),
        balance,
        created_at,
    ))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Persistence(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Persistence(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Persistence(format!("timed out acquiring a connection in {}", operation))
        }
        _ => StoreError::Persistence(format!("sqlx error in {}: {}", operation, err)),
    }
}
