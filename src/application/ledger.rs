use crate::domain::account::{Account, AccountId, Amount, Balance, BalanceView};
use crate::domain::ports::WalletLedger;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// The wallet ledger: single source of truth for balances.
///
/// The outer `RwLock` guards map membership only; every account sits behind
/// its own `Mutex` so the sufficiency check and the decrement are observed
/// as one atomic step per account. Operations on different accounts run in
/// parallel; `transfer` takes both locks in account-id order so opposing
/// transfers between the same pair cannot deadlock.
pub struct LedgerService {
    accounts: RwLock<HashMap<AccountId, Arc<Mutex<Account>>>>,
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerService {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Pre-provisions accounts at startup.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let map = accounts
            .into_iter()
            .map(|a| (a.id.clone(), Arc::new(Mutex::new(a))))
            .collect();
        Self {
            accounts: RwLock::new(map),
        }
    }

    async fn handle(&self, account_id: &AccountId) -> Option<Arc<Mutex<Account>>> {
        self.accounts.read().await.get(account_id).cloned()
    }

    async fn handle_or_not_found(
        &self,
        account_id: &AccountId,
        role: &str,
    ) -> Result<Arc<Mutex<Account>>> {
        self.handle(account_id)
            .await
            .ok_or_else(|| PaymentError::NotFound(format!("{role} {account_id}")))
    }

    /// Snapshot of every account, for startup listings and demos.
    pub async fn accounts(&self) -> Vec<BalanceView> {
        let map = self.accounts.read().await;
        let mut views = Vec::with_capacity(map.len());
        for handle in map.values() {
            views.push(BalanceView::from(&*handle.lock().await));
        }
        views.sort_by(|a, b| a.account_id.cmp(&b.account_id));
        views
    }
}

#[async_trait]
impl WalletLedger for LedgerService {
    async fn get_balance(&self, account_id: &AccountId) -> Result<BalanceView> {
        let handle = self.handle_or_not_found(account_id, "account").await?;
        let account = handle.lock().await;
        Ok(BalanceView::from(&*account))
    }

    async fn debit(&self, account_id: &AccountId, amount: Amount) -> Result<Balance> {
        let handle = self.handle_or_not_found(account_id, "account").await?;
        let mut account = handle.lock().await;
        let new_balance = account.debit(amount)?;
        tracing::info!(account = %account_id, %amount, %new_balance, "debited");
        Ok(new_balance)
    }

    async fn credit(&self, account_id: &AccountId, amount: Amount) -> Result<Balance> {
        // Credit creates the account if absent. The brief write lock only
        // covers membership; the balance mutation happens under the
        // account's own mutex.
        let handle = {
            let mut map = self.accounts.write().await;
            map.entry(account_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(Account::empty(account_id.clone()))))
                .clone()
        };
        let mut account = handle.lock().await;
        let new_balance = account.credit(amount);
        tracing::info!(account = %account_id, %amount, %new_balance, "credited");
        Ok(new_balance)
    }

    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(Balance, Balance)> {
        let from_handle = self.handle_or_not_found(from, "sender account").await?;

        if from == to {
            // Permitted no-op: existence and amount were validated, nothing
            // moves.
            let account = from_handle.lock().await;
            return Ok((account.balance, account.balance));
        }

        let to_handle = self.handle_or_not_found(to, "recipient account").await?;

        // Consistent lock order by account id prevents deadlock between two
        // transfers moving funds in opposite directions.
        let (mut from_account, mut to_account) = if from < to {
            let f = from_handle.lock().await;
            let t = to_handle.lock().await;
            (f, t)
        } else {
            let t = to_handle.lock().await;
            let f = from_handle.lock().await;
            (f, t)
        };

        // Debit checks sufficiency first, so a failure here leaves both
        // sides untouched.
        let from_balance = from_account.debit(amount)?;
        let to_balance = to_account.credit(amount);
        tracing::info!(%from, %to, %amount, "transferred");
        Ok((from_balance, to_balance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::DEFAULT_CURRENCY;

    fn seeded() -> LedgerService {
        LedgerService::with_accounts([
            Account::new(AccountId::from("user1"), Balance::new(50_000), DEFAULT_CURRENCY),
            Account::new(AccountId::from("user2"), Balance::new(120_000), DEFAULT_CURRENCY),
        ])
    }

    #[tokio::test]
    async fn test_get_balance() {
        let ledger = seeded();
        let view = ledger
            .get_balance(&AccountId::from("user1"))
            .await
            .unwrap();
        assert_eq!(view.balance, Balance::new(50_000));
        assert_eq!(view.currency, DEFAULT_CURRENCY);
    }

    #[tokio::test]
    async fn test_get_balance_unknown_account() {
        let ledger = seeded();
        let err = ledger
            .get_balance(&AccountId::from("ghost"))
            .await
            .unwrap_err();
        assert_eq!(err, PaymentError::NotFound("account ghost".to_string()));
    }

    #[tokio::test]
    async fn test_debit_and_credit_roundtrip() {
        let ledger = seeded();
        let user = AccountId::from("user1");

        let after_debit = ledger.debit(&user, Amount::new(20_000).unwrap()).await.unwrap();
        assert_eq!(after_debit, Balance::new(30_000));

        let after_credit = ledger.credit(&user, Amount::new(5_000).unwrap()).await.unwrap();
        assert_eq!(after_credit, Balance::new(35_000));
    }

    #[tokio::test]
    async fn test_debit_insufficient_reports_both_figures() {
        let ledger = seeded();
        let err = ledger
            .debit(&AccountId::from("user1"), Amount::new(60_000).unwrap())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PaymentError::InsufficientFunds {
                available: 50_000,
                requested: 60_000
            }
        );
    }

    #[tokio::test]
    async fn test_credit_creates_account() {
        let ledger = seeded();
        let newcomer = AccountId::from("user9");

        let balance = ledger.credit(&newcomer, Amount::new(1_000).unwrap()).await.unwrap();
        assert_eq!(balance, Balance::new(1_000));

        let view = ledger.get_balance(&newcomer).await.unwrap();
        assert_eq!(view.balance, Balance::new(1_000));
        assert_eq!(view.currency, DEFAULT_CURRENCY);
    }

    #[tokio::test]
    async fn test_transfer_moves_funds_atomically() {
        let ledger = seeded();
        let (from, to) = ledger
            .transfer(
                &AccountId::from("user1"),
                &AccountId::from("user2"),
                Amount::new(10_000).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(from, Balance::new(40_000));
        assert_eq!(to, Balance::new(130_000));
    }

    #[tokio::test]
    async fn test_failed_transfer_leaves_both_untouched() {
        let ledger = seeded();
        let err = ledger
            .transfer(
                &AccountId::from("user1"),
                &AccountId::from("user2"),
                Amount::new(70_000).unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::InsufficientFunds { .. }));

        let user1 = ledger.get_balance(&AccountId::from("user1")).await.unwrap();
        let user2 = ledger.get_balance(&AccountId::from("user2")).await.unwrap();
        assert_eq!(user1.balance, Balance::new(50_000));
        assert_eq!(user2.balance, Balance::new(120_000));
    }

    #[tokio::test]
    async fn test_transfer_to_unknown_recipient() {
        let ledger = seeded();
        let err = ledger
            .transfer(
                &AccountId::from("user1"),
                &AccountId::from("ghost"),
                Amount::new(1_000).unwrap(),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PaymentError::NotFound("recipient account ghost".to_string())
        );
    }

    #[tokio::test]
    async fn test_self_transfer_is_validated_noop() {
        let ledger = seeded();
        let user = AccountId::from("user1");
        let (from, to) = ledger
            .transfer(&user, &user, Amount::new(10_000).unwrap())
            .await
            .unwrap();
        assert_eq!(from, Balance::new(50_000));
        assert_eq!(to, Balance::new(50_000));
    }

    #[tokio::test]
    async fn test_accounts_snapshot_sorted() {
        let ledger = seeded();
        let views = ledger.accounts().await;
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].account_id, AccountId::from("user1"));
        assert_eq!(views[1].account_id, AccountId::from("user2"));
    }
}
