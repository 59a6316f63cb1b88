use log::*;
use loyalty_common::Secret;

const DEFAULT_API_VERSION: &str = "2023-10";
const DEFAULT_METAFIELD_NAMESPACE: &str = "custom";

#[derive(Debug, Clone, Default)]
pub struct ShopifyConfig {
    /// The shop domain, e.g. "my-shop.myshopify.com"
    pub shop: String,
    pub admin_access_token: Secret<String>,
    pub api_version: String,
    /// Namespace of the `total` and `breakdown` customer metafields.
    pub metafield_namespace: String,
}

impl ShopifyConfig {
    pub fn new_from_env_or_default() -> Self {
        let shop = std::env::var("LPS_SHOPIFY_SHOP").unwrap_or_else(|_| {
            warn!("🪛️ LPS_SHOPIFY_SHOP not set, using (probably useless) default");
            "example.myshopify.com".to_string()
        });
        let api_version = std::env::var("LPS_SHOPIFY_API_VERSION").unwrap_or_else(|_| {
            warn!("🪛️ LPS_SHOPIFY_API_VERSION not set, using {DEFAULT_API_VERSION} as default");
            DEFAULT_API_VERSION.to_string()
        });
        let admin_access_token = Secret::new(std::env::var("LPS_SHOPIFY_ADMIN_ACCESS_TOKEN").unwrap_or_else(|_| {
            warn!("🪛️ LPS_SHOPIFY_ADMIN_ACCESS_TOKEN not set, using (probably useless) default");
            "shpat_00000000000000".to_string()
        }));
        let metafield_namespace = std::env::var("LPS_SHOPIFY_METAFIELD_NAMESPACE").unwrap_or_else(|_| {
            info!("🪛️ LPS_SHOPIFY_METAFIELD_NAMESPACE not set, using '{DEFAULT_METAFIELD_NAMESPACE}'");
            DEFAULT_METAFIELD_NAMESPACE.to_string()
        });
        Self { shop, admin_access_token, api_version, metafield_namespace }
    }

    pub fn new(shop: &str, admin_access_token: &str) -> Self {
        Self {
            shop: shop.to_string(),
            admin_access_token: Secret::new(admin_access_token.to_string()),
            api_version: DEFAULT_API_VERSION.to_string(),
            metafield_namespace: DEFAULT_METAFIELD_NAMESPACE.to_string(),
        }
    }
}
