use std::{env, time::Duration};

use actix_web::http::header::HeaderValue;
use log::*;
use loyalty_common::helpers::{parse_boolean_flag, parse_env_var};
use loyalty_engine::{
    cancellation::{CancellationPolicy, DEFAULT_CANCELLATION_WINDOW_HOURS},
    reconciliation::DEFAULT_CURRENCY_UNITS_PER_POINT,
    PointsRules,
    SyncConfig,
    DEFAULT_SYNC_MAX_ATTEMPTS,
    DEFAULT_SYNC_RETRY_DELAY,
};
use shopify_tools::ShopifyConfig;

const DEFAULT_LPS_HOST: &str = "127.0.0.1";
const DEFAULT_LPS_PORT: u16 = 8380;
const DEFAULT_ALLOWED_ORIGIN: &str = "*";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Sent back in the `Access-Control-Allow-Origin` header of every response.
    pub allowed_origin: String,
    /// When set, ledgers are kept in this SQLite database rather than in Shopify customer metafields.
    pub database_url: Option<String>,
    pub run_migrations: bool,
    pub sync: SyncConfig,
    pub cancellation: CancellationPolicy,
    pub shopify_config: ShopifyConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LPS_HOST.to_string(),
            port: DEFAULT_LPS_PORT,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            database_url: None,
            run_migrations: true,
            sync: SyncConfig::default(),
            cancellation: CancellationPolicy::default(),
            shopify_config: ShopifyConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("LPS_HOST").ok().unwrap_or_else(|| DEFAULT_LPS_HOST.into());
        let port = env_or_default("LPS_PORT", DEFAULT_LPS_PORT);
        let allowed_origin = match env::var("LPS_ALLOWED_ORIGIN") {
            Ok(origin) => validated_origin(origin),
            Err(_) => {
                warn!("🪛️ LPS_ALLOWED_ORIGIN is not set. Any origin will be allowed to call the API.");
                DEFAULT_ALLOWED_ORIGIN.to_string()
            },
        };
        let database_url = env::var("LPS_DATABASE_URL").ok().filter(|s| !s.trim().is_empty());
        match &database_url {
            Some(url) => info!("🪛️ Ledgers will be kept in the SQLite database at {url}"),
            None => info!("🪛️ Ledgers will be kept in Shopify customer metafields"),
        }
        let run_migrations = parse_boolean_flag(env::var("LPS_RUN_MIGRATIONS").ok(), true);
        let sync = configure_sync();
        let window = env_or_default("LPS_CANCELLATION_WINDOW_HOURS", DEFAULT_CANCELLATION_WINDOW_HOURS);
        let cancellation = if window > 0 {
            CancellationPolicy::with_window_hours(window)
        } else {
            warn!("🪛️ The cancellation window must be positive. Using {DEFAULT_CANCELLATION_WINDOW_HOURS} hours.");
            CancellationPolicy::default()
        };
        let shopify_config = ShopifyConfig::new_from_env_or_default();
        if shopify_config.admin_access_token.is_unset() {
            warn!("🪛️ LPS_SHOPIFY_ADMIN_ACCESS_TOKEN is empty. Calls to Shopify will fail.");
        }
        Self { host, port, allowed_origin, database_url, run_migrations, sync, cancellation, shopify_config }
    }
}

/// The origin is sent verbatim as a header value, so it must be a valid one.
fn validated_origin(origin: String) -> String {
    match HeaderValue::from_str(origin.trim()) {
        Ok(_) if !origin.trim().is_empty() => origin.trim().to_string(),
        _ => {
            warn!("🪛️ LPS_ALLOWED_ORIGIN ({origin:?}) is not a valid header value. Allowing any origin instead.");
            DEFAULT_ALLOWED_ORIGIN.to_string()
        },
    }
}

fn configure_sync() -> SyncConfig {
    let unit = env_or_default("LPS_POINTS_UNIT", DEFAULT_CURRENCY_UNITS_PER_POINT);
    let rules = PointsRules::new(unit).unwrap_or_else(|e| {
        warn!("🪛️ LPS_POINTS_UNIT is invalid. {e} Using the default of {DEFAULT_CURRENCY_UNITS_PER_POINT}.");
        PointsRules::default()
    });
    let max_attempts = env_or_default("LPS_SYNC_MAX_ATTEMPTS", DEFAULT_SYNC_MAX_ATTEMPTS).max(1);
    let retry_delay = parse_env_var::<u64>("LPS_SYNC_RETRY_DELAY_MS")
        .map(Duration::from_millis)
        .unwrap_or_else(|e| {
            debug!("🪛️ {e}. Using a retry delay of {}ms", DEFAULT_SYNC_RETRY_DELAY.as_millis());
            DEFAULT_SYNC_RETRY_DELAY
        });
    info!("🪛️ {unit} currency units earn one point. Syncs are attempted up to {max_attempts} times.");
    SyncConfig { max_attempts, retry_delay, rules }
}

fn env_or_default<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match parse_env_var::<T>(name) {
        Ok(v) => v,
        Err(e) if env::var(name).is_ok() => {
            warn!("🪛️ {e} Using the default, {default}, instead.");
            default
        },
        Err(_) => {
            debug!("🪛️ {name} is not set. Using the default, {default}.");
            default
        },
    }
}
