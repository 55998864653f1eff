use crate::domain::account::AccountId;
use crate::domain::notification::{Notification, NotificationId};
use crate::domain::ports::NotificationSink;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// In-process notification sink. Rows are append-only; the only mutation
/// after creation is the acknowledged flag.
pub struct NotificationService {
    notifications: RwLock<Vec<Notification>>,
    next_id: AtomicU64,
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationService {
    pub fn new() -> Self {
        Self {
            notifications: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Flips the acknowledged flag on a delivered notification.
    pub async fn acknowledge(&self, id: NotificationId) -> Result<()> {
        let mut rows = self.notifications.write().await;
        let row = rows
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| PaymentError::NotFound(format!("notification {}", id.0)))?;
        row.acknowledged = true;
        Ok(())
    }

    pub async fn total(&self) -> usize {
        self.notifications.read().await.len()
    }
}

#[async_trait]
impl NotificationSink for NotificationService {
    async fn deliver(
        &self,
        account_id: &AccountId,
        message: &str,
        category: &str,
    ) -> Result<NotificationId> {
        if account_id.as_str().is_empty() || message.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "accountId and message are required".to_string(),
            ));
        }

        let id = NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let notification =
            Notification::new(id, account_id.clone(), message, category, Utc::now());

        self.notifications.write().await.push(notification);
        tracing::info!(account = %account_id, id = id.0, category, "notification delivered");
        Ok(id)
    }

    async fn history(&self, account_id: &AccountId) -> Result<Vec<Notification>> {
        let rows = self.notifications.read().await;
        Ok(rows
            .iter()
            .filter(|n| &n.account_id == account_id)
            .cloned()
            .collect())
    }
}
