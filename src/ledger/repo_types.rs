use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::money::Money;

/// Stored as lowercase TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Purchase,
    Deposit,
}

/// `Pending` may move to `Confirmed` once; nothing else ever changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub beverage_id: Option<i64>,
    pub amount: Money,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub status: TransactionStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Insert request for a ledger row.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i64,
    pub amount: Money,
    pub kind: TransactionType,
    pub status: TransactionStatus,
    pub beverage_id: Option<i64>,
}

impl NewTransaction {
    pub fn new(user_id: i64, amount: Money, kind: TransactionType, status: TransactionStatus) -> Self {
        Self {
            user_id,
            amount,
            kind,
            status,
            beverage_id: None,
        }
    }
}
