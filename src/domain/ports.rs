use crate::domain::account::{AccountId, Amount, Balance, BalanceView};
use crate::domain::notification::{Notification, NotificationId};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Seam onto the ledger service. The ledger is the single source of truth
/// for balances; callers never cache a balance beyond one request.
#[async_trait]
pub trait WalletLedger: Send + Sync {
    async fn get_balance(&self, account_id: &AccountId) -> Result<BalanceView>;

    /// Atomically checks sufficiency and decreases the balance.
    async fn debit(&self, account_id: &AccountId, amount: Amount) -> Result<Balance>;

    /// Increases the balance, creating the account if absent.
    async fn credit(&self, account_id: &AccountId, amount: Amount) -> Result<Balance>;

    /// Atomic composite debit+credit; a failure mutates neither side.
    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(Balance, Balance)>;
}

/// What the orchestrator hands to the external purchase action.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrder {
    pub account_id: AccountId,
    pub phone_number: String,
    pub amount: Amount,
    pub provider: String,
    pub requested_at: DateTime<Utc>,
}

/// Confirmation reference returned by the external provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfirmation {
    pub reference: String,
}

/// Seam onto the external airtime/bill provider.
#[async_trait]
pub trait PurchaseProvider: Send + Sync {
    async fn purchase(&self, order: &PurchaseOrder) -> Result<ProviderConfirmation>;
}

/// Seam onto the notification sink. Delivery is best-effort from the
/// orchestrator's point of view; the sink itself is append-only.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(
        &self,
        account_id: &AccountId,
        message: &str,
        category: &str,
    ) -> Result<NotificationId>;

    async fn history(&self, account_id: &AccountId) -> Result<Vec<Notification>>;
}

pub type WalletLedgerRef = Arc<dyn WalletLedger>;
pub type PurchaseProviderRef = Arc<dyn PurchaseProvider>;
pub type NotificationSinkRef = Arc<dyn NotificationSink>;
