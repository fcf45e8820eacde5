//! Transaction repository for LumaDB

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub provider: String,
    pub reference: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

pub struct TransactionRepository {
    #[allow(dead_code)]
    db_url: String,
}

impl TransactionRepository {
    pub async fn new(db_url: &str) -> brivas_core::Result<Self> {
        Ok(Self { db_url: db_url.to_string() })
    }

    pub async fn create(&self, tx: Transaction) -> brivas_core::Result<()> {
        tracing::info!(id = %tx.id, amount = %tx.amount, "Transaction created");
        // Would insert into LumaDB
        Ok(())
    }

    pub async fn update_status(&self, id: &str, status: TransactionStatus) -> brivas_core::Result<()> {
        tracing::info!(id = %id, status = ?status, "Transaction status updated");
        Ok(())
    }

    pub async fn get_by_reference(&self, reference: &str) -> brivas_core::Result<Option<Transaction>> {
        tracing::debug!(reference = %reference, "Looking up transaction");
        Ok(None)
    }

    pub async fn list_by_account(&self, account_id: &str, limit: usize) -> brivas_core::Result<Vec<Transaction>> {
        tracing::debug!(account_id = %account_id, limit = limit, "Listing transactions");
        Ok(vec![])
    }
}
