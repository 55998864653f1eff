//! Canonical JSON wire shapes for the three services.
//!
//! The source system drifted between field names for the same logical
//! operation; these types fix one camelCase shape per operation. Transport
//! wiring lives outside this crate — the DTOs plus
//! [`PaymentError::status_code`](crate::error::PaymentError::status_code)
//! are the contract.

use crate::application::orchestrator::PurchaseReceipt;
use crate::domain::account::BalanceView;
use crate::domain::bill::{Bill, BillStatus};
use crate::domain::notification::Notification;
use crate::error::PaymentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Ledger service ---

/// `GET /accounts/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub account_id: String,
    pub balance: u64,
    pub currency: String,
}

impl From<BalanceView> for AccountResponse {
    fn from(view: BalanceView) -> Self {
        Self {
            account_id: view.account_id.0,
            balance: view.balance.value(),
            currency: view.currency,
        }
    }
}

/// `POST /debit` and `POST /credit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChangeRequest {
    pub account_id: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChangeResponse {
    pub success: bool,
    pub new_balance: u64,
}

/// `POST /transfer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub balance: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferResponse {
    pub success: bool,
    pub from: BalanceSnapshot,
    pub to: BalanceSnapshot,
}

// --- Orchestrator ---

/// `POST /buy-airtime`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyAirtimeRequest {
    pub account_id: String,
    pub phone_number: String,
    pub amount: u64,
    pub provider: String,
}

/// Shared success shape of `POST /buy-airtime` and `POST /pay-bill/..`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub success: bool,
    pub transaction_id: String,
    pub new_balance: u64,
}

impl From<&PurchaseReceipt> for PurchaseResponse {
    fn from(receipt: &PurchaseReceipt) -> Self {
        Self {
            success: true,
            transaction_id: receipt.transaction_id.0.clone(),
            new_balance: receipt.new_balance.value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDto {
    pub id: String,
    pub category: String,
    pub provider: String,
    pub amount: u64,
    pub status: BillStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl From<&Bill> for BillDto {
    fn from(bill: &Bill) -> Self {
        Self {
            id: bill.id.clone(),
            category: bill.category.clone(),
            provider: bill.provider.clone(),
            amount: bill.amount.value(),
            status: bill.status,
            paid_at: bill.paid_at,
        }
    }
}

/// `GET /bills/{accountId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillsResponse {
    pub account_id: String,
    pub bills: Vec<BillDto>,
    pub total_pending: usize,
}

// --- Notification sink ---

/// `POST /notify`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    pub account_id: String,
    pub message: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyResponse {
    pub notification_id: u64,
}

/// Row shape of `GET /history/{accountId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub notification_id: u64,
    pub account_id: String,
    pub message: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub acknowledged: bool,
}

impl From<&Notification> for NotificationDto {
    fn from(n: &Notification) -> Self {
        Self {
            notification_id: n.id.0,
            account_id: n.account_id.0.clone(),
            message: n.message.clone(),
            category: n.category.clone(),
            created_at: n.created_at,
            acknowledged: n.acknowledged,
        }
    }
}

// --- Errors ---

/// Error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    /// Maps an error to its wire status and body.
    pub fn from_error(err: &PaymentError) -> (u16, Self) {
        (
            err.status_code(),
            Self {
                success: false,
                message: err.to_string(),
            },
        )
    }
}
