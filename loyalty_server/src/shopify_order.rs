use log::trace;
use loyalty_engine::{
    cancellation::CancellableOrder,
    ledger_types::{FinancialStatus, Money, OrderId, OrderSnapshot},
};
use shopify_tools::ShopifyOrder;

use crate::errors::OrderConversionError;

/// Converts a Shopify order into the snapshot that reconciliation works from. The net amount is the gross total less
/// every refund transaction.
pub fn order_snapshot_from_shopify_order(order: &ShopifyOrder) -> Result<OrderSnapshot, OrderConversionError> {
    trace!("Converting ShopifyOrder #{} to OrderSnapshot", order.id);
    let net = order.net_amount().map_err(|e| OrderConversionError(format!("Order {}. {e}", order.id)))?;
    let status = FinancialStatus::from(order.financial_status.as_deref().unwrap_or_default());
    let mut snapshot = OrderSnapshot::new(OrderId(order.id.to_string()), Money::from_cents(net), status);
    if !order.name.is_empty() {
        snapshot = snapshot.with_name(order.name.as_str());
    }
    if order.is_cancelled() {
        snapshot = snapshot.cancelled();
    }
    Ok(snapshot)
}

pub fn cancellable_order_from_shopify_order(order: &ShopifyOrder) -> CancellableOrder {
    CancellableOrder {
        order_id: OrderId(order.id.to_string()),
        financial_status: order.financial_status.clone().unwrap_or_default(),
        created_at: order.created_at,
        cancelled: order.is_cancelled(),
        tags: order.tags.split(',').map(str::trim).filter(|t| !t.is_empty()).map(String::from).collect(),
    }
}
