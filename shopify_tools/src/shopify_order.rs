use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{helpers::parse_shopify_price, ShopifyApiError};

/// The subset of the REST `Order` resource that the loyalty ledger cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyOrder {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub financial_status: Option<String>,
    #[serde(default)]
    pub currency: String,
    pub total_price: String,
    /// Comma-separated list of tags
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub refunds: Vec<ShopifyRefund>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopifyRefund {
    pub id: i64,
    #[serde(default)]
    pub transactions: Vec<RefundTransaction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefundTransaction {
    pub id: i64,
    pub amount: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ShopifyOrder {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled_at.is_some()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.split(',').any(|t| t.trim().eq_ignore_ascii_case(tag))
    }

    /// Sum of every refund transaction amount, in minor units.
    pub fn refunded_amount(&self) -> Result<i64, ShopifyApiError> {
        self.refunds
            .iter()
            .flat_map(|r| r.transactions.iter())
            .map(|t| parse_shopify_price(&t.amount))
            .sum::<Result<i64, ShopifyApiError>>()
    }

    /// The gross order total minus all refunded amounts, in minor units.
    pub fn net_amount(&self) -> Result<i64, ShopifyApiError> {
        let gross = parse_shopify_price(&self.total_price)?;
        Ok(gross - self.refunded_amount()?)
    }
}
