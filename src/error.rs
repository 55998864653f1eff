use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

/// Error taxonomy shared by the three services.
///
/// Validation and funds errors abort before any mutation and travel back to
/// the caller unchanged. `PurchaseFailedAfterDebit` is the one deliberate
/// inconsistency state: the debit stands, the purchase did not happen, and
/// the caller must be able to tell it apart from a pre-debit failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    /// Malformed or missing input. The client must fix the request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown account, bill, or notification.
    #[error("{0} not found")]
    NotFound(String),

    /// Business-rule violation. Carries both figures so the caller can
    /// present them without re-querying the ledger.
    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: u64, requested: u64 },

    /// Paying a bill that already transitioned to paid.
    #[error("bill {0} already paid")]
    AlreadyPaid(String),

    /// Transport-level failure talking to a downstream before any debit.
    #[error("downstream unavailable: {0}")]
    DownstreamUnavailable(String),

    /// The purchase step failed after the ledger debit succeeded. Funds are
    /// reserved but the purchase is unconfirmed; no automatic refund is
    /// issued. The transaction id lets an operator reconcile.
    #[error("purchase failed after debit; funds reserved under {transaction_id}: {reason}")]
    PurchaseFailedAfterDebit {
        transaction_id: String,
        reason: String,
    },
}

impl PaymentError {
    /// Canonical HTTP status for the wire surface. 502 is reserved for the
    /// funds-already-debited failure so operators can spot it in logs.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) | Self::InsufficientFunds { .. } | Self::AlreadyPaid(_) => 400,
            Self::NotFound(_) => 404,
            Self::PurchaseFailedAfterDebit { .. } => 502,
            Self::DownstreamUnavailable(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PaymentError::InvalidRequest("x".into()).status_code(), 400);
        assert_eq!(
            PaymentError::InsufficientFunds {
                available: 100,
                requested: 500
            }
            .status_code(),
            400
        );
        assert_eq!(
            PaymentError::NotFound("account user9".into()).status_code(),
            404
        );
        assert_eq!(PaymentError::AlreadyPaid("bill3".into()).status_code(), 400);
        assert_eq!(
            PaymentError::PurchaseFailedAfterDebit {
                transaction_id: "TXN-1-1".into(),
                reason: "provider timeout".into()
            }
            .status_code(),
            502
        );
        assert_eq!(
            PaymentError::DownstreamUnavailable("ledger".into()).status_code(),
            500
        );
    }

    #[test]
    fn test_insufficient_funds_carries_both_figures() {
        let err = PaymentError::InsufficientFunds {
            available: 100,
            requested: 500,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("500"));
    }
}
