use crate::error::PaymentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Stable identifier for a wallet account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A non-negative balance in the smallest currency unit.
///
/// Negative balances are unrepresentable; subtraction only happens through
/// [`Account::debit`], which checks sufficiency first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Balance(pub u64);

impl Balance {
    pub const ZERO: Self = Self(0);

    pub fn new(minor_units: u64) -> Self {
        Self(minor_units)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A strictly positive transaction amount in the smallest currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub fn new(minor_units: u64) -> Result<Self, PaymentError> {
        if minor_units > 0 {
            Ok(Self(minor_units))
        } else {
            Err(PaymentError::InvalidRequest(
                "amount must be greater than 0".to_string(),
            ))
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for Amount {
    type Error = PaymentError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A wallet account owned exclusively by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub balance: Balance,
    /// Fixed per account; no conversion happens anywhere in this system.
    pub currency: String,
}

pub const DEFAULT_CURRENCY: &str = "NGN";

impl Account {
    pub fn new(id: AccountId, balance: Balance, currency: impl Into<String>) -> Self {
        Self {
            id,
            balance,
            currency: currency.into(),
        }
    }

    /// An empty account, as created lazily by a first credit.
    pub fn empty(id: AccountId) -> Self {
        Self::new(id, Balance::ZERO, DEFAULT_CURRENCY)
    }

    /// Adds funds. Always succeeds on a validated amount.
    pub fn credit(&mut self, amount: Amount) -> Balance {
        self.balance += Balance(amount.value());
        self.balance
    }

    /// Removes funds if the balance covers the amount. The caller must hold
    /// this account's lock so the check and the decrement are one step.
    pub fn debit(&mut self, amount: Amount) -> Result<Balance, PaymentError> {
        if self.balance.value() < amount.value() {
            return Err(PaymentError::InsufficientFunds {
                available: self.balance.value(),
                requested: amount.value(),
            });
        }
        self.balance = Balance(self.balance.value() - amount.value());
        Ok(self.balance)
    }
}

/// Read-only view of an account as returned by balance queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceView {
    pub account_id: AccountId,
    pub balance: Balance,
    pub currency: String,
}

impl From<&Account> for BalanceView {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id.clone(),
            balance: account.balance,
            currency: account.currency.clone(),
        }
    }
}
