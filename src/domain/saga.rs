use crate::domain::account::{AccountId, Amount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Saga progression for one purchase request.
///
/// `Completed` and `PurchaseFailedAfterDebit` are terminal. Notification is
/// an orthogonal best-effort annotation on the record, never a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaState {
    Init,
    FundsReserved,
    PurchaseAttempted,
    Completed,
    PurchaseFailedAfterDebit,
}

impl fmt::Display for SagaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::FundsReserved => "funds_reserved",
            Self::PurchaseAttempted => "purchase_attempted",
            Self::Completed => "completed",
            Self::PurchaseFailedAfterDebit => "purchase_failed_after_debit",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseKind {
    Airtime,
    Bill,
    Generic,
}

/// Outcome recorded on the audit trail.
///
/// `ReservedUnconfirmed` marks the designated inconsistency window: the
/// debit stands but the purchase is unconfirmed. `Failed` is part of the
/// audit vocabulary for operator tooling; the current flows never produce it
/// because a pre-debit failure creates no record at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionOutcome {
    Completed,
    #[serde(rename = "reserved-but-unconfirmed")]
    ReservedUnconfirmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
    /// Ids are generated at the moment funds are reserved: a millisecond
    /// timestamp plus a process-wide sequence keeps them unique and
    /// monotonically distinguishable.
    pub fn generate(at: DateTime<Utc>, seq: u64) -> Self {
        Self(format!("TXN-{}-{}", at.timestamp_millis(), seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Audit record of one saga run. Not financial truth (the ledger is), but
/// the only artifact that lets an operator reconcile a debit against a
/// purchase outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub amount: Amount,
    pub kind: PurchaseKind,
    pub outcome: TransactionOutcome,
    pub created_at: DateTime<Utc>,
    /// Whether the best-effort notification was acknowledged by the sink.
    pub notified: bool,
}
