//! Account number allocation.
//!
//! Generators only propose numbers. Uniqueness is enforced by the store,
//! which rejects a taken number with `StoreError::Conflict`.

use std::sync::atomic::{AtomicI64, Ordering};

use rand::Rng;

use ledger_core::AccountNumber;

/// Smallest and largest 9-digit account numbers.
pub const MIN_ACCOUNT_NUMBER: i64 = 100_000_000;
pub const MAX_ACCOUNT_NUMBER: i64 = 999_999_999;

pub trait AccountNumberGenerator: Send + Sync {
    fn next_number(&self) -> AccountNumber;
}

/// Uniformly random 9-digit numbers.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAccountNumbers;

impl AccountNumberGenerator for RandomAccountNumbers {
    fn next_number(&self) -> AccountNumber {
        AccountNumber::new(rand::thread_rng().gen_range(MIN_ACCOUNT_NUMBER..=MAX_ACCOUNT_NUMBER))
    }
}

/// Deterministic numbers counting up from a seed. Tests only.
#[derive(Debug)]
pub struct SequentialAccountNumbers {
    next: AtomicI64,
}

impl SequentialAccountNumbers {
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl AccountNumberGenerator for SequentialAccountNumbers {
    fn next_number(&self) -> AccountNumber {
        AccountNumber::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_numbers_have_nine_digits() {
        let numbers = RandomAccountNumbers;
        for _ in 0..1_000 {
            let n = numbers.next_number().get();
            assert!((MIN_ACCOUNT_NUMBER..=MAX_ACCOUNT_NUMBER).contains(&n));
        }
    }

    #[test]
    fn sequential_numbers_count_up() {
        let numbers = SequentialAccountNumbers::starting_at(500);
        assert_eq!(numbers.next_number(), AccountNumber::new(500));
        assert_eq!(numbers.next_number(), AccountNumber::new(501));
    }
}
