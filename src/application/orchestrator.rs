use crate::config::SagaConfig;
use crate::domain::account::{AccountId, Amount, Balance};
use crate::domain::bill::Bill;
use crate::domain::ports::{
    NotificationSink, NotificationSinkRef, PurchaseOrder, PurchaseProvider, PurchaseProviderRef,
    WalletLedger, WalletLedgerRef,
};
use crate::domain::saga::{
    PurchaseKind, SagaState, TransactionId, TransactionOutcome, TransactionRecord,
};
use crate::error::{PaymentError, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tokio::time::timeout;

/// Request to purchase airtime for a phone number.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyAirtime {
    pub account_id: AccountId,
    pub phone_number: String,
    pub amount: u64,
    pub provider: String,
}

/// Result payload of a completed purchase saga.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub amount: Amount,
    pub new_balance: Balance,
    pub kind: PurchaseKind,
    pub provider: String,
    pub phone_number: Option<String>,
    pub bill_id: Option<String>,
}

/// The saga coordinator.
///
/// Each purchase runs the sequence validate -> debit -> purchase -> record,
/// with a best-effort notification at the end. No step is wrapped in a
/// distributed lock: once the ledger debit succeeds, a purchase failure
/// leaves funds reserved with no automatic refund. That outcome is recorded
/// as `ReservedUnconfirmed` on the audit trail so an operator can reconcile.
pub struct PaymentOrchestrator {
    ledger: WalletLedgerRef,
    provider: PurchaseProviderRef,
    notifier: NotificationSinkRef,
    bills: RwLock<HashMap<AccountId, Vec<Bill>>>,
    records: RwLock<Vec<TransactionRecord>>,
    txn_seq: AtomicU64,
    config: SagaConfig,
}

impl PaymentOrchestrator {
    pub fn new(
        ledger: WalletLedgerRef,
        provider: PurchaseProviderRef,
        notifier: NotificationSinkRef,
        config: SagaConfig,
    ) -> Self {
        Self {
            ledger,
            provider,
            notifier,
            bills: RwLock::new(HashMap::new()),
            records: RwLock::new(Vec::new()),
            txn_seq: AtomicU64::new(0),
            config,
        }
    }

    /// Loads the bill catalog at startup.
    pub async fn seed_bills(&self, bills: impl IntoIterator<Item = Bill>) {
        let mut catalog = self.bills.write().await;
        for bill in bills {
            catalog.entry(bill.owner.clone()).or_default().push(bill);
        }
    }

    /// Bills for one account plus the count still pending. Unknown accounts
    /// simply have no bills.
    pub async fn bills(&self, account_id: &AccountId) -> (Vec<Bill>, usize) {
        let catalog = self.bills.read().await;
        let bills = catalog.get(account_id).cloned().unwrap_or_default();
        let pending = bills.iter().filter(|b| !b.is_paid()).count();
        (bills, pending)
    }

    /// The full audit trail, oldest first.
    pub async fn transactions(&self) -> Vec<TransactionRecord> {
        self.records.read().await.clone()
    }

    pub async fn transactions_for(&self, account_id: &AccountId) -> Vec<TransactionRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| &r.account_id == account_id)
            .cloned()
            .collect()
    }

    /// Records in the reservation window: debited but never confirmed.
    /// This is the surface a reconciliation job would poll.
    pub async fn unconfirmed(&self) -> Vec<TransactionRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.outcome == TransactionOutcome::ReservedUnconfirmed)
            .cloned()
            .collect()
    }

    pub async fn buy_airtime(&self, request: BuyAirtime) -> Result<PurchaseReceipt> {
        // Step 1: fail fast, no network calls made yet.
        if request.account_id.as_str().is_empty()
            || request.phone_number.is_empty()
            || request.provider.is_empty()
        {
            return Err(PaymentError::InvalidRequest(
                "accountId, phoneNumber and provider are required".to_string(),
            ));
        }
        let amount = Amount::new(request.amount)?;

        // Step 2: reserve funds. A failure here aborts in Init: no record,
        // no notification, the ledger error is surfaced verbatim.
        let new_balance = self.ledger.debit(&request.account_id, amount).await?;
        let transaction_id = self.next_transaction_id();
        tracing::debug!(txn = %transaction_id, state = %SagaState::FundsReserved, "saga transition");

        // Step 3: the external purchase action, bounded.
        let order = PurchaseOrder {
            account_id: request.account_id.clone(),
            phone_number: request.phone_number.clone(),
            amount,
            provider: request.provider.clone(),
            requested_at: Utc::now(),
        };
        tracing::debug!(txn = %transaction_id, state = %SagaState::PurchaseAttempted, "saga transition");
        let purchase = match timeout(self.config.purchase_timeout, self.provider.purchase(&order))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(PaymentError::DownstreamUnavailable(
                "purchase action timed out".to_string(),
            )),
        };

        if let Err(cause) = purchase {
            return self
                .fail_after_debit(
                    transaction_id,
                    &request.account_id,
                    amount,
                    PurchaseKind::Airtime,
                    cause,
                )
                .await;
        }

        // Step 4: completed. Step 5: best-effort notify, never a gate.
        tracing::debug!(txn = %transaction_id, state = %SagaState::Completed, "saga transition");
        let message = format!(
            "Airtime purchase of {amount} for {} succeeded ({transaction_id})",
            request.phone_number
        );
        let notified = self
            .notify_best_effort(&request.account_id, &message, "payment")
            .await;
        self.record(
            transaction_id.clone(),
            &request.account_id,
            amount,
            PurchaseKind::Airtime,
            TransactionOutcome::Completed,
            notified,
        )
        .await;

        Ok(PurchaseReceipt {
            transaction_id,
            account_id: request.account_id,
            amount,
            new_balance,
            kind: PurchaseKind::Airtime,
            provider: request.provider,
            phone_number: Some(request.phone_number),
            bill_id: None,
        })
    }

    pub async fn pay_bill(&self, account_id: &AccountId, bill_id: &str) -> Result<PurchaseReceipt> {
        if account_id.as_str().is_empty() || bill_id.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "accountId and billId are required".to_string(),
            ));
        }

        // Bill resolution precedes any debit.
        let bill = {
            let catalog = self.bills.read().await;
            let bills = catalog
                .get(account_id)
                .ok_or_else(|| PaymentError::NotFound(format!("account {account_id}")))?;
            bills
                .iter()
                .find(|b| b.id == bill_id)
                .cloned()
                .ok_or_else(|| PaymentError::NotFound(format!("bill {bill_id}")))?
        };
        if bill.is_paid() {
            return Err(PaymentError::AlreadyPaid(bill.id));
        }

        // Step 2: reserve the bill's stored amount.
        let new_balance = self.ledger.debit(account_id, bill.amount).await?;
        let transaction_id = self.next_transaction_id();
        tracing::debug!(txn = %transaction_id, state = %SagaState::FundsReserved, "saga transition");

        // Step 3 for bills is the pending -> paid transition itself. The
        // status is re-checked under the write lock; losing a double-write
        // race counts as a purchase failure (funds stay reserved).
        tracing::debug!(txn = %transaction_id, state = %SagaState::PurchaseAttempted, "saga transition");
        let marked = {
            let mut catalog = self.bills.write().await;
            catalog
                .get_mut(account_id)
                .and_then(|bills| bills.iter_mut().find(|b| b.id == bill_id))
                .ok_or_else(|| PaymentError::NotFound(format!("bill {bill_id}")))
                .and_then(|b| b.mark_paid(Utc::now()))
        };

        if let Err(cause) = marked {
            return self
                .fail_after_debit(
                    transaction_id,
                    account_id,
                    bill.amount,
                    PurchaseKind::Bill,
                    cause,
                )
                .await;
        }

        tracing::debug!(txn = %transaction_id, state = %SagaState::Completed, "saga transition");
        let message = format!(
            "Bill {bill_id} ({}, {}) paid: {} ({transaction_id})",
            bill.category, bill.provider, bill.amount
        );
        let notified = self
            .notify_best_effort(account_id, &message, "payment")
            .await;
        self.record(
            transaction_id.clone(),
            account_id,
            bill.amount,
            PurchaseKind::Bill,
            TransactionOutcome::Completed,
            notified,
        )
        .await;

        Ok(PurchaseReceipt {
            transaction_id,
            account_id: account_id.clone(),
            amount: bill.amount,
            new_balance,
            kind: PurchaseKind::Bill,
            provider: bill.provider,
            phone_number: None,
            bill_id: Some(bill.id),
        })
    }

    fn next_transaction_id(&self) -> TransactionId {
        let seq = self.txn_seq.fetch_add(1, Ordering::Relaxed) + 1;
        TransactionId::generate(Utc::now(), seq)
    }

    /// Terminal `PurchaseFailedAfterDebit` path: funds stay debited, the
    /// record lands as `ReservedUnconfirmed`, and the caller is told funds
    /// were reserved. No compensation runs here.
    async fn fail_after_debit(
        &self,
        transaction_id: TransactionId,
        account_id: &AccountId,
        amount: Amount,
        kind: PurchaseKind,
        cause: PaymentError,
    ) -> Result<PurchaseReceipt> {
        tracing::error!(
            txn = %transaction_id,
            account = %account_id,
            %amount,
            state = %SagaState::PurchaseFailedAfterDebit,
            %cause,
            "purchase failed after debit; funds reserved, no auto-refund"
        );
        let message = format!(
            "Payment of {amount} is on hold: the purchase could not be confirmed ({transaction_id})"
        );
        let notified = self
            .notify_best_effort(account_id, &message, "payment")
            .await;
        self.record(
            transaction_id.clone(),
            account_id,
            amount,
            kind,
            TransactionOutcome::ReservedUnconfirmed,
            notified,
        )
        .await;
        Err(PaymentError::PurchaseFailedAfterDebit {
            transaction_id: transaction_id.0,
            reason: cause.to_string(),
        })
    }

    async fn record(
        &self,
        id: TransactionId,
        account_id: &AccountId,
        amount: Amount,
        kind: PurchaseKind,
        outcome: TransactionOutcome,
        notified: bool,
    ) {
        self.records.write().await.push(TransactionRecord {
            id,
            account_id: account_id.clone(),
            amount,
            kind,
            outcome,
            created_at: Utc::now(),
            notified,
        });
    }

    /// Bounded notification attempt. Failure and timeout are logged and
    /// reflected on the record, never in the caller's result.
    async fn notify_best_effort(&self, account_id: &AccountId, message: &str, category: &str) -> bool {
        match timeout(
            self.config.notify_timeout,
            self.notifier.deliver(account_id, message, category),
        )
        .await
        {
            Ok(Ok(_)) => true,
            Ok(Err(err)) => {
                tracing::warn!(account = %account_id, %err, "notification delivery failed");
                false
            }
            Err(_) => {
                tracing::warn!(account = %account_id, "notification delivery timed out");
                false
            }
        }
    }
}
