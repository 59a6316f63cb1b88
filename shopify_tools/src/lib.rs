//! A thin client for the parts of the Shopify Admin API that the loyalty ledger needs:
//! * looking customers up by email, together with their ledger metafields (GraphQL),
//! * listing a customer's orders regardless of status, including refunds (REST),
//! * writing metafields in a single `metafieldsSet` mutation (GraphQL),
//! * fetching and cancelling individual orders (REST).
mod api;
mod config;
mod data_objects;
mod error;
mod helpers;
mod shopify_order;

pub use api::ShopifyApi;
pub use config::ShopifyConfig;
pub use data_objects::{
    Metafield,
    MetafieldInput,
    MetafieldUserError,
    ShopifyCustomer,
    BREAKDOWN_METAFIELD_KEY,
    TOTAL_METAFIELD_KEY,
};
pub use error::ShopifyApiError;
pub use helpers::parse_shopify_price;
pub use shopify_order::{RefundTransaction, ShopifyOrder, ShopifyRefund};
