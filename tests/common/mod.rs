#![allow(dead_code)]

use async_trait::async_trait;
use payflow::application::ledger::LedgerService;
use payflow::application::orchestrator::PaymentOrchestrator;
use payflow::application::sink::NotificationService;
use payflow::config::SagaConfig;
use payflow::domain::account::{Account, AccountId, Balance, DEFAULT_CURRENCY};
use payflow::domain::bill::Bill;
use payflow::domain::notification::{Notification, NotificationId};
use payflow::domain::ports::{
    NotificationSink, ProviderConfirmation, PurchaseOrder, PurchaseProvider,
};
use payflow::error::{PaymentError, Result};
use payflow::infrastructure::provider::AirtimeGateway;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Provider double that succeeds and counts how often it was called.
pub struct CountingProvider {
    inner: AirtimeGateway,
    pub calls: AtomicUsize,
}

impl CountingProvider {
    pub fn new() -> Self {
        Self {
            inner: AirtimeGateway::with_latency(Duration::ZERO),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PurchaseProvider for CountingProvider {
    async fn purchase(&self, order: &PurchaseOrder) -> Result<ProviderConfirmation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.purchase(order).await
    }
}

/// Provider double that always refuses.
pub struct FailingProvider;

#[async_trait]
impl PurchaseProvider for FailingProvider {
    async fn purchase(&self, _order: &PurchaseOrder) -> Result<ProviderConfirmation> {
        Err(PaymentError::DownstreamUnavailable(
            "provider rejected the order".to_string(),
        ))
    }
}

/// Provider double that never answers within any sane bound.
pub struct HangingProvider {
    pub delay: Duration,
}

#[async_trait]
impl PurchaseProvider for HangingProvider {
    async fn purchase(&self, _order: &PurchaseOrder) -> Result<ProviderConfirmation> {
        tokio::time::sleep(self.delay).await;
        Ok(ProviderConfirmation {
            reference: "late".to_string(),
        })
    }
}

/// Sink double simulating an outage.
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn deliver(&self, _: &AccountId, _: &str, _: &str) -> Result<NotificationId> {
        Err(PaymentError::DownstreamUnavailable(
            "notification sink down".to_string(),
        ))
    }

    async fn history(&self, _: &AccountId) -> Result<Vec<Notification>> {
        Ok(Vec::new())
    }
}

/// Sink double that responds slower than the orchestrator's bound.
pub struct SlowSink {
    pub delay: Duration,
    inner: NotificationService,
}

impl SlowSink {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: NotificationService::new(),
        }
    }
}

#[async_trait]
impl NotificationSink for SlowSink {
    async fn deliver(
        &self,
        account_id: &AccountId,
        message: &str,
        category: &str,
    ) -> Result<NotificationId> {
        tokio::time::sleep(self.delay).await;
        self.inner.deliver(account_id, message, category).await
    }

    async fn history(&self, account_id: &AccountId) -> Result<Vec<Notification>> {
        self.inner.history(account_id).await
    }
}

pub struct TestStack {
    pub ledger: Arc<LedgerService>,
    pub sink: Arc<NotificationService>,
    pub orchestrator: PaymentOrchestrator,
}

/// One account (`user1`) with the given balance, the demo bill set, and a
/// zero-latency provider.
pub async fn stack_with_balance(balance: u64) -> TestStack {
    let ledger = seeded_ledger(balance);
    let sink = Arc::new(NotificationService::new());
    let orchestrator = PaymentOrchestrator::new(
        ledger.clone(),
        Arc::new(AirtimeGateway::with_latency(Duration::ZERO)),
        sink.clone(),
        SagaConfig::default(),
    );
    seed_demo_bills(&orchestrator).await;
    TestStack {
        ledger,
        sink,
        orchestrator,
    }
}

pub fn seeded_ledger(balance: u64) -> Arc<LedgerService> {
    Arc::new(LedgerService::with_accounts([Account::new(
        AccountId::from("user1"),
        Balance::new(balance),
        DEFAULT_CURRENCY,
    )]))
}

pub async fn seed_demo_bills(orchestrator: &PaymentOrchestrator) {
    let bills = payflow::config::SeedData::demo()
        .bills()
        .expect("demo bills are valid");
    orchestrator
        .seed_bills(bills.into_iter().filter(|b: &Bill| b.owner == AccountId::from("user1")))
        .await;
}

pub fn user1() -> AccountId {
    AccountId::from("user1")
}
