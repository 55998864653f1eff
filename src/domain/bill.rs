use crate::domain::account::{AccountId, Amount};
use crate::error::PaymentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Paid,
}

/// A pending obligation in the orchestrator's local catalog.
///
/// This is a side record, not financial truth: the ledger alone owns
/// balances. A bill transitions pending -> paid exactly once and its amount
/// never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub owner: AccountId,
    pub category: String,
    pub provider: String,
    pub amount: Amount,
    pub status: BillStatus,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Bill {
    pub fn pending(
        id: impl Into<String>,
        owner: AccountId,
        category: impl Into<String>,
        provider: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            id: id.into(),
            owner,
            category: category.into(),
            provider: provider.into(),
            amount,
            status: BillStatus::Pending,
            paid_at: None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == BillStatus::Paid
    }

    /// The single allowed transition. A second call fails `AlreadyPaid`,
    /// which the saga treats as a purchase-step failure when it loses a
    /// double-write race.
    pub fn mark_paid(&mut self, at: DateTime<Utc>) -> Result<(), PaymentError> {
        if self.is_paid() {
            return Err(PaymentError::AlreadyPaid(self.id.clone()));
        }
        self.status = BillStatus::Paid;
        self.paid_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bill() -> Bill {
        Bill::pending(
            "bill1",
            AccountId::from("user1"),
            "electricity",
            "EKEDC",
            Amount::new(5000).unwrap(),
        )
    }

    #[test]
    fn test_mark_paid_sets_timestamp_once() {
        let mut bill = sample_bill();
        assert!(!bill.is_paid());

        let now = Utc::now();
        bill.mark_paid(now).unwrap();
        assert_eq!(bill.status, BillStatus::Paid);
        assert_eq!(bill.paid_at, Some(now));
    }

    #[test]
    fn test_mark_paid_twice_fails() {
        let mut bill = sample_bill();
        bill.mark_paid(Utc::now()).unwrap();
        let first_paid_at = bill.paid_at;

        let err = bill.mark_paid(Utc::now()).unwrap_err();
        assert_eq!(err, PaymentError::AlreadyPaid("bill1".to_string()));
        assert_eq!(bill.paid_at, first_paid_at);
    }
}
