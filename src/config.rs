use crate::domain::account::{Account, AccountId, Amount, Balance, DEFAULT_CURRENCY};
use crate::domain::bill::{Bill, BillStatus};
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Bounds on the orchestrator's blocking downstream calls.
///
/// The notification bound is deliberately small: a slow sink must never
/// stall a response that is already determined. The purchase bound is
/// looser but still finite so a hung provider cannot pin resources forever.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SagaConfig {
    pub purchase_timeout: Duration,
    pub notify_timeout: Duration,
}

impl Default for SagaConfig {
    fn default() -> Self {
        Self {
            purchase_timeout: Duration::from_secs(10),
            notify_timeout: Duration::from_secs(2),
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSeed {
    pub account_id: String,
    pub balance: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSeed {
    pub bill_id: String,
    pub owner: String,
    pub category: String,
    pub provider: String,
    pub amount: u64,
    #[serde(default)]
    pub paid: bool,
}

/// Startup state for both the ledger and the orchestrator's bill catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedData {
    pub accounts: Vec<AccountSeed>,
    #[serde(default)]
    pub bills: Vec<BillSeed>,
}

impl SeedData {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PaymentError::InvalidRequest(format!("seed file unreadable: {e}")))?;
        serde_json::from_str(&raw)
            .map_err(|e| PaymentError::InvalidRequest(format!("seed file malformed: {e}")))
    }

    /// The fixture set the source system shipped with.
    pub fn demo() -> Self {
        let account = |id: &str, balance: u64| AccountSeed {
            account_id: id.to_string(),
            balance,
            currency: default_currency(),
        };
        let bill = |id: &str, owner: &str, category: &str, provider: &str, amount: u64, paid| {
            BillSeed {
                bill_id: id.to_string(),
                owner: owner.to_string(),
                category: category.to_string(),
                provider: provider.to_string(),
                amount,
                paid,
            }
        };
        Self {
            accounts: vec![
                account("user1", 50_000),
                account("user2", 120_000),
                account("user3", 75_000),
            ],
            bills: vec![
                bill("bill1", "user1", "electricity", "EKEDC", 5_000, false),
                bill("bill2", "user1", "water", "Lagos Water", 2_000, false),
                bill("bill3", "user1", "internet", "Spectranet", 10_000, true),
                bill("bill1", "user2", "electricity", "IKEDC", 7_500, false),
                bill("bill2", "user2", "cable", "DSTV", 3_500, false),
            ],
        }
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.accounts
            .iter()
            .map(|s| {
                Account::new(
                    AccountId::new(&s.account_id),
                    Balance::new(s.balance),
                    &s.currency,
                )
            })
            .collect()
    }

    pub fn bills(&self) -> Result<Vec<Bill>> {
        self.bills
            .iter()
            .map(|s| {
                let mut bill = Bill::pending(
                    &s.bill_id,
                    AccountId::new(&s.owner),
                    &s.category,
                    &s.provider,
                    Amount::new(s.amount)?,
                );
                if s.paid {
                    // Historic payment, settled before this process started.
                    bill.status = BillStatus::Paid;
                }
                Ok(bill)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_seed_converts() {
        let seed = SeedData::demo();
        let accounts = seed.accounts();
        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].balance, Balance::new(50_000));

        let bills = seed.bills().unwrap();
        assert_eq!(bills.len(), 5);
        assert_eq!(bills.iter().filter(|b| b.is_paid()).count(), 1);
    }

    #[test]
    fn test_seed_rejects_zero_amount_bill() {
        let mut seed = SeedData::demo();
        seed.bills[0].amount = 0;
        assert!(matches!(
            seed.bills(),
            Err(PaymentError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_seed_parses_json() {
        let raw = r#"{
            "accounts": [{"accountId": "user1", "balance": 1000}],
            "bills": [{"billId": "b1", "owner": "user1", "category": "water",
                       "provider": "Lagos Water", "amount": 200}]
        }"#;
        let seed: SeedData = serde_json::from_str(raw).unwrap();
        assert_eq!(seed.accounts[0].currency, DEFAULT_CURRENCY);
        assert!(!seed.bills[0].paid);
    }
}
