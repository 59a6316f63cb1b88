use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
        Mutex,
    },
};

use loyalty_engine::{
    ledger_types::{CustomerRecord, FinancialStatus, Money, OrderSnapshot},
    OrderSource,
    OrderSourceError,
};

#[derive(Debug, Default)]
struct Book {
    customers: HashMap<String, CustomerRecord>,
    orders: HashMap<String, Vec<OrderSnapshot>>,
}

/// An in-memory order source. Clones share the same book, so tests can keep editing orders after handing a clone to
/// the API.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderSource {
    book: Arc<Mutex<Book>>,
    outages: Arc<AtomicU32>,
    order_fetches: Arc<AtomicU32>,
}

impl MemoryOrderSource {
    pub fn add_customer(&self, id: &str, email: &str) -> CustomerRecord {
        let customer = CustomerRecord::new(id, email);
        let mut book = self.book.lock().unwrap();
        book.customers.insert(email.to_string(), customer.clone());
        customer
    }

    pub fn customer(&self, email: &str) -> Option<CustomerRecord> {
        self.book.lock().unwrap().customers.get(email).cloned()
    }

    /// Adds the order, or replaces an order with the same id.
    pub fn upsert_order(&self, email: &str, order: OrderSnapshot) {
        let mut book = self.book.lock().unwrap();
        let orders = book.orders.entry(email.to_string()).or_default();
        match orders.iter_mut().find(|o| o.order_id == order.order_id) {
            Some(existing) => *existing = order,
            None => orders.push(order),
        }
    }

    pub fn set_order(&self, email: &str, order_id: &str, status: &str, net_units: i64) {
        let name = format!("#{order_id}");
        let order = OrderSnapshot::new(order_id.into(), Money::from_units(net_units), FinancialStatus::from(status))
            .with_name(name);
        self.upsert_order(email, order);
    }

    pub fn cancel_order(&self, email: &str, order_id: &str) {
        let mut book = self.book.lock().unwrap();
        let order = book
            .orders
            .get_mut(email)
            .and_then(|orders| orders.iter_mut().find(|o| o.order_id.as_str() == order_id))
            .expect("No such order");
        order.is_cancelled = true;
    }

    /// The next `count` requests fail as if the upstream service were down.
    pub fn fail_next(&self, count: u32) {
        self.outages.store(count, Ordering::SeqCst);
    }

    pub fn order_fetches(&self) -> u32 {
        self.order_fetches.load(Ordering::SeqCst)
    }

    fn check_outage(&self) -> Result<(), OrderSourceError> {
        let outage = self.outages.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)).is_ok();
        if outage {
            Err(OrderSourceError::Unavailable("503 Service Unavailable".into()))
        } else {
            Ok(())
        }
    }
}

impl OrderSource for MemoryOrderSource {
    async fn fetch_customer_by_email(&self, email: &str) -> Result<Option<CustomerRecord>, OrderSourceError> {
        self.check_outage()?;
        Ok(self.customer(email))
    }

    async fn fetch_orders_for_customer(&self, customer: &CustomerRecord) -> Result<Vec<OrderSnapshot>, OrderSourceError> {
        self.check_outage()?;
        self.order_fetches.fetch_add(1, Ordering::SeqCst);
        // Yield so that concurrent cycles get a chance to interleave
        tokio::task::yield_now().await;
        let book = self.book.lock().unwrap();
        Ok(book.orders.get(&customer.email).cloned().unwrap_or_default())
    }
}
