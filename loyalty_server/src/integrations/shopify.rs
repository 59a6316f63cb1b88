use log::*;
use loyalty_engine::{
    cancellation::CancellableOrder,
    ledger_types::{CustomerRecord, OrderId, OrderSnapshot, StoredLedger},
    LedgerStore,
    LedgerStoreError,
    OrderCancellation,
    OrderCancellationError,
    OrderSource,
    OrderSourceError,
};
use shopify_tools::{
    MetafieldInput,
    ShopifyApi,
    ShopifyApiError,
    ShopifyConfig,
    BREAKDOWN_METAFIELD_KEY,
    TOTAL_METAFIELD_KEY,
};

use crate::shopify_order::{cancellable_order_from_shopify_order, order_snapshot_from_shopify_order};

const TOTAL_METAFIELD_TYPE: &str = "number_integer";
const BREAKDOWN_METAFIELD_TYPE: &str = "json";

/// Orders, ledgers and cancellations, all served by the Shopify Admin API.
///
/// Customers are identified by their GraphQL id. The ledger lives in two customer metafields,
/// `<namespace>.total` and `<namespace>.breakdown`, which are always written in the same `metafieldsSet` mutation.
#[derive(Clone)]
pub struct ShopifyLoyaltyBackend {
    api: ShopifyApi,
}

impl ShopifyLoyaltyBackend {
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyApiError> {
        let api = ShopifyApi::new(config)?;
        Ok(Self { api })
    }

    pub fn api(&self) -> &ShopifyApi {
        &self.api
    }

    fn namespace(&self) -> &str {
        self.api.config().metafield_namespace.as_str()
    }
}

impl OrderSource for ShopifyLoyaltyBackend {
    async fn fetch_customer_by_email(&self, email: &str) -> Result<Option<CustomerRecord>, OrderSourceError> {
        let customer = self.api.find_customer_by_email(email).await.map_err(order_source_error)?;
        Ok(customer.map(|c| CustomerRecord::new(c.id, c.email.as_deref().unwrap_or(email))))
    }

    async fn fetch_orders_for_customer(
        &self,
        customer: &CustomerRecord,
    ) -> Result<Vec<OrderSnapshot>, OrderSourceError> {
        let orders = self.api.fetch_orders_for_email(&customer.email).await.map_err(order_source_error)?;
        orders
            .iter()
            .map(|o| order_snapshot_from_shopify_order(o).map_err(|e| OrderSourceError::InvalidData(e.to_string())))
            .collect()
    }
}

impl LedgerStore for ShopifyLoyaltyBackend {
    async fn fetch_ledger(&self, customer: &CustomerRecord) -> Result<Option<StoredLedger>, LedgerStoreError> {
        let Some(found) = self.api.fetch_customer_metafields(customer.id.as_str()).await.map_err(ledger_store_error)?
        else {
            warn!("🛍️ Customer {} disappeared before their ledger could be read", customer.id);
            return Ok(None);
        };
        let total = found.metafield(TOTAL_METAFIELD_KEY).map(|m| m.value.clone());
        let breakdown = found.metafield(BREAKDOWN_METAFIELD_KEY).map(|m| m.value.clone());
        if total.is_none() && breakdown.is_none() {
            return Ok(None);
        }
        Ok(Some(StoredLedger { total: total.unwrap_or_default(), breakdown: breakdown.unwrap_or_default() }))
    }

    async fn store_ledger(&self, customer: &CustomerRecord, ledger: &StoredLedger) -> Result<(), LedgerStoreError> {
        let owner = customer.id.as_str();
        let ns = self.namespace();
        let metafields = [
            MetafieldInput::new(owner, ns, TOTAL_METAFIELD_KEY, TOTAL_METAFIELD_TYPE, ledger.total.clone()),
            MetafieldInput::new(owner, ns, BREAKDOWN_METAFIELD_KEY, BREAKDOWN_METAFIELD_TYPE, ledger.breakdown.clone()),
        ];
        self.api.set_metafields(&metafields).await.map_err(ledger_store_error)?;
        debug!("🛍️ Ledger metafields written for {}", customer.id);
        Ok(())
    }
}

impl OrderCancellation for ShopifyLoyaltyBackend {
    async fn fetch_cancellable_order(&self, order_id: &OrderId) -> Result<CancellableOrder, OrderCancellationError> {
        let id = parse_shopify_order_id(order_id)?;
        let order = self.api.get_order(id).await.map_err(|e| cancellation_error(order_id, e))?;
        Ok(cancellable_order_from_shopify_order(&order))
    }

    async fn cancel_order(&self, order_id: &OrderId) -> Result<CancellableOrder, OrderCancellationError> {
        let id = parse_shopify_order_id(order_id)?;
        let order = self.api.cancel_order(id).await.map_err(|e| cancellation_error(order_id, e))?;
        Ok(cancellable_order_from_shopify_order(&order))
    }
}

fn parse_shopify_order_id(order_id: &OrderId) -> Result<u64, OrderCancellationError> {
    order_id.as_str().trim().parse::<u64>().map_err(|e| {
        debug!("🛍️ '{order_id}' is not a Shopify order id. {e}");
        OrderCancellationError::OrderNotFound(order_id.clone())
    })
}

fn order_source_error(e: ShopifyApiError) -> OrderSourceError {
    if e.is_transient() {
        OrderSourceError::Unavailable(e.to_string())
    } else {
        OrderSourceError::InvalidData(e.to_string())
    }
}

fn ledger_store_error(e: ShopifyApiError) -> LedgerStoreError {
    match e {
        ShopifyApiError::UserErrors(_) => LedgerStoreError::WriteRejected(e.to_string()),
        e if e.is_transient() => LedgerStoreError::Unavailable(e.to_string()),
        e => LedgerStoreError::Backend(e.to_string()),
    }
}

fn cancellation_error(order_id: &OrderId, e: ShopifyApiError) -> OrderCancellationError {
    match e {
        ShopifyApiError::QueryError { status: 404, .. } => OrderCancellationError::OrderNotFound(order_id.clone()),
        e if e.is_transient() => OrderCancellationError::Unavailable(e.to_string()),
        e => OrderCancellationError::InvalidData(e.to_string()),
    }
}
