use crate::domain::account::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

/// An append-only user-facing message owned by the notification sink.
/// Only the `acknowledged` flag ever mutates after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub account_id: AccountId,
    pub message: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub acknowledged: bool,
}

impl Notification {
    pub fn new(
        id: NotificationId,
        account_id: AccountId,
        message: impl Into<String>,
        category: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_id,
            message: message.into(),
            category: category.into(),
            created_at,
            acknowledged: false,
        }
    }
}
