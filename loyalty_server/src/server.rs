use std::time::Duration;

use actix_web::{
    dev::Server,
    http::{header::HeaderValue, KeepAlive, Method},
    middleware::{DefaultHeaders, Logger},
    web,
    App,
    HttpRequest,
    HttpResponse,
    HttpServer,
};
use log::*;
use loyalty_engine::{
    CancellationApi,
    LedgerStore,
    LedgerSyncApi,
    OrderCancellation,
    OrderSource,
    SqliteLedgerStore,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::{ledger_events::create_ledger_log_handlers, shopify::ShopifyLoyaltyBackend},
    routes::{health, AwardActionRoute, CancelOrderRoute, CustomerPointsRoute, SyncPointsPostRoute, SyncPointsRoute},
};

const DB_MAX_CONNECTIONS: u32 = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let backend = ShopifyLoyaltyBackend::new(config.shopify_config.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = create_ledger_log_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let cancellation_api = CancellationApi::new(backend.clone(), config.cancellation.clone());
    let srv = match config.database_url.as_deref() {
        Some(url) => {
            let store = open_ledger_database(url, config.run_migrations).await?;
            let sync_api = LedgerSyncApi::new(backend, store, config.sync, producers);
            create_server_instance(&config, sync_api, cancellation_api)?
        },
        None => {
            let sync_api = LedgerSyncApi::new(backend.clone(), backend, config.sync, producers);
            create_server_instance(&config, sync_api, cancellation_api)?
        },
    };
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

async fn open_ledger_database(url: &str, run_migrations: bool) -> Result<SqliteLedgerStore, ServerError> {
    let store = SqliteLedgerStore::new_with_url(url, DB_MAX_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if run_migrations {
        store.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
        info!("🗃️ Ledger database migrations are up to date");
    }
    Ok(store)
}

pub fn create_server_instance<O, S, C>(
    config: &ServerConfig,
    sync_api: LedgerSyncApi<O, S>,
    cancellation_api: CancellationApi<C>,
) -> Result<Server, ServerError>
where
    O: OrderSource + Send + Sync + 'static,
    S: LedgerStore + Send + Sync + 'static,
    C: OrderCancellation + Send + Sync + 'static,
{
    // One instance for all workers. The customer locks live inside it.
    let sync_api = web::Data::new(sync_api);
    let cancellation_api = web::Data::new(cancellation_api);
    let allowed_origin = config.allowed_origin.clone();
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(cors_headers(&allowed_origin))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("lps::access_log"))
            .app_data(sync_api.clone())
            .app_data(cancellation_api.clone())
            .app_data(json_config())
            .app_data(query_config())
            .configure(configure_routes::<O, S, C>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    info!("💻️ Listening on {}:{}", config.host, config.port);
    Ok(srv)
}

/// Registers every route. The API objects must already be registered as app data.
pub fn configure_routes<O, S, C>(cfg: &mut web::ServiceConfig)
where
    O: OrderSource + 'static,
    S: LedgerStore + 'static,
    C: OrderCancellation + 'static,
{
    cfg.service(health)
        .service(SyncPointsRoute::<O, S>::new())
        .service(SyncPointsPostRoute::<O, S>::new())
        .service(CustomerPointsRoute::<O, S>::new())
        .service(AwardActionRoute::<O, S>::new())
        .service(CancelOrderRoute::<C>::new())
        .default_service(web::route().to(preflight_or_not_found));
}

/// Malformed request bodies get the same JSON error body as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|e, _| ServerError::InvalidRequestBody(e.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|e, _| ServerError::InvalidQuery(e.to_string()).into())
}

pub fn cors_headers(allowed_origin: &str) -> DefaultHeaders {
    let origin = HeaderValue::from_str(allowed_origin).unwrap_or_else(|e| {
        warn!("💻️ '{allowed_origin}' is not a valid origin header. {e}. Allowing any origin.");
        HeaderValue::from_static("*")
    });
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", origin))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type"))
}

async fn preflight_or_not_found(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        trace!("💻️ Pre-flight request for {}", req.path());
        HttpResponse::Ok().finish()
    } else {
        HttpResponse::NotFound().json(serde_json::json!({ "error": format!("No route for {}", req.path()) }))
    }
}
