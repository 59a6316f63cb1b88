//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two belong in a separate module.
//!
//! Handlers are generic over the backends they use. Actix cannot register generic handlers directly, so each one is
//! wrapped in a route struct by the [`route!`] macro. For example,
//! `route!(customer_points => Get "/points" impl OrderSource, LedgerStore);` creates `CustomerPointsRoute<O, S>`,
//! which is registered with `.service(CustomerPointsRoute::<O, S>::new())`.
//!
//! Every handler awaits network I/O (Shopify or the ledger database), so none of them may block the worker thread.
use std::str::FromStr;

use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use loyalty_engine::{
    ledger_types::{OrderId, SocialAction},
    CancellationApi,
    LedgerStore,
    LedgerSyncApi,
    OrderCancellation,
    OrderSource,
};

use crate::{
    data_objects::{
        CancelOrderRequest,
        CancelOrderResponse,
        EmailQuery,
        PointsResponse,
        SocialActionRequest,
        SocialActionResponse,
        SyncResponse,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Sync  ----------------------------------------------------
route!(sync_points => Get "/points/sync" impl OrderSource, LedgerStore);
/// Route handler for the order sync endpoint
///
/// Brings the ledger of the customer with the given `email` up to date with their orders, and returns the net
/// change, the new total, the entries added in this pass, the whole breakdown and any inconsistent ledger history
/// that was found (and left alone).
///
/// Syncing an up-to-date ledger is a no-op, so it is always safe to call this endpoint again.
pub async fn sync_points<O, S>(
    query: web::Query<EmailQuery>,
    api: web::Data<LedgerSyncApi<O, S>>,
) -> Result<HttpResponse, ServerError>
where
    O: OrderSource,
    S: LedgerStore,
{
    let email = required_email(&query)?;
    debug!("💻️ Sync request for {email}");
    let result = api.sync_customer(email).await?;
    Ok(HttpResponse::Ok().json(SyncResponse::from(result)))
}

route!(sync_points_post => Post "/points/sync" impl OrderSource, LedgerStore);
/// Same as [`sync_points`]. Storefront scripts fire this as a POST after checkout.
pub async fn sync_points_post<O, S>(
    query: web::Query<EmailQuery>,
    api: web::Data<LedgerSyncApi<O, S>>,
) -> Result<HttpResponse, ServerError>
where
    O: OrderSource,
    S: LedgerStore,
{
    sync_points(query, api).await
}

//----------------------------------------------   Points  ----------------------------------------------------
route!(customer_points => Get "/points" impl OrderSource, LedgerStore);
/// Returns the stored ledger for the customer with the given `email`, without syncing it first.
pub async fn customer_points<O, S>(
    query: web::Query<EmailQuery>,
    api: web::Data<LedgerSyncApi<O, S>>,
) -> Result<HttpResponse, ServerError>
where
    O: OrderSource,
    S: LedgerStore,
{
    let email = required_email(&query)?;
    debug!("💻️ GET points for {email}");
    let ledger = api.fetch_points(email).await?;
    Ok(HttpResponse::Ok().json(PointsResponse::from(ledger)))
}

route!(award_action => Post "/points/action" impl OrderSource, LedgerStore);
/// Grants the one-off reward for a social action (`instagram`, `facebook` or `signup`). Each action is rewarded at
/// most once per customer; repeats get a 409.
pub async fn award_action<O, S>(
    body: web::Json<SocialActionRequest>,
    api: web::Data<LedgerSyncApi<O, S>>,
) -> Result<HttpResponse, ServerError>
where
    O: OrderSource,
    S: LedgerStore,
{
    let SocialActionRequest { email, action } = body.into_inner();
    let email = email.trim();
    if email.is_empty() {
        return Err(ServerError::InvalidRequestBody("An email address is required".into()));
    }
    let action = SocialAction::from_str(&action).map_err(|e| {
        debug!("💻️ Invalid social action request for {email}. {e}");
        ServerError::InvalidRequestBody(e.to_string())
    })?;
    debug!("💻️ Social action '{action}' for {email}");
    let award = api.award_social_action(email, action).await?;
    Ok(HttpResponse::Ok().json(SocialActionResponse::from(award)))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(cancel_order => Post "/orders/cancel" impl OrderCancellation);
/// Cancels an order on the customer's behalf, if the cancellation policy allows it.
///
/// Only paid orders that have not been dispatched can be cancelled, and only within the cancellation window. Points
/// for the order are not touched here. They are reverted by the next sync.
pub async fn cancel_order<C>(
    body: web::Json<CancelOrderRequest>,
    api: web::Data<CancellationApi<C>>,
) -> Result<HttpResponse, ServerError>
where
    C: OrderCancellation,
{
    let order_id = OrderId::from(body.into_inner().order_id.trim());
    if order_id.as_str().is_empty() {
        return Err(ServerError::InvalidRequestBody("An order id is required".into()));
    }
    debug!("💻️ Cancellation request for order {order_id}");
    let order = api.cancel_order(&order_id).await?;
    Ok(HttpResponse::Ok().json(CancelOrderResponse {
        success: true,
        order_id: order.order_id.to_string(),
        message: "Your order has been cancelled.".into(),
    }))
}

fn required_email(query: &EmailQuery) -> Result<&str, ServerError> {
    query.email().ok_or_else(|| ServerError::InvalidQuery("An email address is required".into()))
}
