use crate::domain::ports::{ProviderConfirmation, PurchaseOrder, PurchaseProvider};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Stand-in for the external airtime/bill provider API.
///
/// Real processor integration is out of scope; this adapter simulates a
/// short network round trip and hands back a confirmation reference, like
/// the placeholder endpoint the source system posted to.
pub struct AirtimeGateway {
    latency: Duration,
    next_ref: AtomicU64,
}

impl Default for AirtimeGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl AirtimeGateway {
    pub fn new() -> Self {
        Self::with_latency(Duration::from_millis(5))
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            next_ref: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl PurchaseProvider for AirtimeGateway {
    async fn purchase(&self, order: &PurchaseOrder) -> Result<ProviderConfirmation> {
        tokio::time::sleep(self.latency).await;
        let reference = format!(
            "{}-{}-{}",
            order.provider,
            order.requested_at.timestamp_millis(),
            self.next_ref.fetch_add(1, Ordering::Relaxed)
        );
        tracing::debug!(account = %order.account_id, %reference, "provider confirmed purchase");
        Ok(ProviderConfirmation { reference })
    }
}
