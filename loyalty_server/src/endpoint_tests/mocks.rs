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
use mockall::mock;

mock! {
    pub OrderBook {}
    impl OrderSource for OrderBook {
        async fn fetch_customer_by_email(&self, email: &str) -> Result<Option<CustomerRecord>, OrderSourceError>;
        async fn fetch_orders_for_customer(&self, customer: &CustomerRecord) -> Result<Vec<OrderSnapshot>, OrderSourceError>;
    }
}

mock! {
    pub LedgerVault {}
    impl LedgerStore for LedgerVault {
        async fn fetch_ledger(&self, customer: &CustomerRecord) -> Result<Option<StoredLedger>, LedgerStoreError>;
        async fn store_ledger(&self, customer: &CustomerRecord, ledger: &StoredLedger) -> Result<(), LedgerStoreError>;
    }
}

mock! {
    pub OrderCanceller {}
    impl OrderCancellation for OrderCanceller {
        async fn fetch_cancellable_order(&self, order_id: &OrderId) -> Result<CancellableOrder, OrderCancellationError>;
        async fn cancel_order(&self, order_id: &OrderId) -> Result<CancellableOrder, OrderCancellationError>;
    }
}
