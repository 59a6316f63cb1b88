use std::{sync::Arc, time::Duration};

use graphql_parser::parse_query;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, LINK},
    Client,
    Method,
    Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::ShopifyConfig,
    data_objects::{Metafield, MetafieldInput, MetafieldUserError, ShopifyCustomer},
    helpers::next_page_info,
    ShopifyApiError,
    ShopifyOrder,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// The REST API caps page sizes at 250.
const ORDER_PAGE_LIMIT: &str = "250";

/// Search hits examined when looking a customer up by email. Shopify search also returns partial matches.
const CUSTOMER_SEARCH_LIMIT: u32 = 5;

// The ledger metafields are selected by key and aliased to it. See `ShopifyCustomer::from_node`.
const CUSTOMER_BY_EMAIL: &str = r#"
query CustomerByEmail($query: String!, $first: Int!, $namespace: String!) {
  customers(first: $first, query: $query) {
    edges { node {
      id email
      total: metafield(namespace: $namespace, key: "total") { id namespace key value type }
      breakdown: metafield(namespace: $namespace, key: "breakdown") { id namespace key value type }
    } }
  }
}"#;

const CUSTOMER_METAFIELDS: &str = r#"
query CustomerMetafields($id: ID!, $namespace: String!) {
  customer(id: $id) {
    id email
    total: metafield(namespace: $namespace, key: "total") { id namespace key value type }
    breakdown: metafield(namespace: $namespace, key: "breakdown") { id namespace key value type }
  }
}"#;

const SET_METAFIELDS: &str = r#"
mutation SetMetafields($metafields: [MetafieldsSetInput!]!) {
  metafieldsSet(metafields: $metafields) {
    metafields { id namespace key value type }
    userErrors { field message code }
  }
}"#;

#[derive(Clone)]
pub struct ShopifyApi {
    config: ShopifyConfig,
    client: Arc<Client>,
}

impl ShopifyApi {
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.admin_access_token.reveal().as_str())
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        headers.insert("X-Shopify-Access-Token", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &ShopifyConfig {
        &self.config
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, ShopifyApiError> {
        let response = self.send_rest_request(method, path, params, body).await?;
        response.json::<T>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))
    }

    /// Fetches one page of a paginated REST resource, returning the page and the cursor of the next one, if any.
    pub async fn rest_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<(T, Option<String>), ShopifyApiError> {
        let response = self.send_rest_request::<()>(Method::GET, path, params, None).await?;
        let next = response.headers().get(LINK).and_then(|v| v.to_str().ok()).and_then(next_page_info);
        let page = response.json::<T>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))?;
        Ok((page, next))
    }

    async fn send_rest_request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<Response, ShopifyApiError> {
        let url = self.url(path);
        trace!("🛍️ Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("🛍️ REST query successful. {}", response.status());
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
            Err(ShopifyApiError::QueryError { status, message })
        }
    }

    pub async fn graphql_query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<T, ShopifyApiError> {
        let query = parse_query::<String>(query).map_err(|e| ShopifyApiError::InvalidGraphQL(e.to_string()))?;
        let mut body = serde_json::json!({
            "query": query.to_string(),
        });
        if let Some(vars) = variables {
            body["variables"] = vars;
        }
        trace!("🛍️ Sending GraphQL query: {body}");
        let result = self.rest_query::<Value, Value>(Method::POST, "/graphql.json", &[], Some(body)).await?;
        if let Some(errors) = result["errors"].as_array() {
            let e = errors.iter().map(|e| e.to_string()).collect::<Vec<String>>().join(", ");
            return Err(ShopifyApiError::GraphQLError(e));
        }
        let data = result["data"].clone();
        trace!("🛍️ GraphQL response: {data}");
        trace!("🛍️ GraphQL costs: {}", result["extensions"]["cost"]);
        if data.is_null() {
            return Err(ShopifyApiError::EmptyResponse);
        }
        serde_json::from_value(data).map_err(|e| ShopifyApiError::JsonError(e.to_string()))
    }

    pub fn url(&self, path: &str) -> String {
        format!("https://{}/admin/api/{}{path}", self.config.shop, self.config.api_version)
    }

    /// Looks up the customer with exactly this email, returning their GraphQL id and ledger metafields.
    pub async fn find_customer_by_email(&self, email: &str) -> Result<Option<ShopifyCustomer>, ShopifyApiError> {
        let variables = serde_json::json!({
            "query": format!("email:\"{}\"", email.trim().replace('"', "")),
            "first": CUSTOMER_SEARCH_LIMIT,
            "namespace": self.config.metafield_namespace,
        });
        debug!("🛍️ Looking up customer {email}");
        let data = self.graphql_query::<Value>(CUSTOMER_BY_EMAIL, Some(variables)).await?;
        let customer = ShopifyCustomer::from_connection(&data, email)?;
        match &customer {
            Some(c) => debug!("🛍️ Customer {email} is {} with {} ledger metafields", c.id, c.metafields.len()),
            None => info!("🛍️ No customer has the email {email}"),
        }
        Ok(customer)
    }

    /// Reads the ledger metafields in the configured namespace for the customer with the given GraphQL id.
    pub async fn fetch_customer_metafields(
        &self,
        customer_gid: &str,
    ) -> Result<Option<ShopifyCustomer>, ShopifyApiError> {
        let variables = serde_json::json!({
            "id": customer_gid,
            "namespace": self.config.metafield_namespace,
        });
        trace!("🛍️ Fetching metafields for {customer_gid}");
        let data = self.graphql_query::<Value>(CUSTOMER_METAFIELDS, Some(variables)).await?;
        ShopifyCustomer::from_node(&data["customer"])
    }

    /// Fetches every order placed with the given email, whatever its status, following the `Link` header through
    /// every page.
    pub async fn fetch_orders_for_email(&self, email: &str) -> Result<Vec<ShopifyOrder>, ShopifyApiError> {
        #[derive(Deserialize)]
        struct OrdersResponse {
            #[serde(default)]
            orders: Vec<ShopifyOrder>,
        }
        debug!("🛍️ Fetching orders for {email}");
        let mut orders = vec![];
        let mut page_info: Option<String> = None;
        loop {
            // Shopify rejects filters on any page after the first. The cursor carries them.
            let params = match page_info.as_deref() {
                None => vec![("email", email), ("status", "any"), ("limit", ORDER_PAGE_LIMIT)],
                Some(cursor) => vec![("limit", ORDER_PAGE_LIMIT), ("page_info", cursor)],
            };
            let (page, next) = self.rest_page::<OrdersResponse>("/orders.json", &params).await?;
            trace!("🛍️ Fetched a page of {} orders for {email}", page.orders.len());
            orders.extend(page.orders);
            match next {
                Some(cursor) if page_info.as_deref() != Some(cursor.as_str()) => page_info = Some(cursor),
                _ => break,
            }
        }
        info!("🛍️ Fetched {} orders for {email}", orders.len());
        Ok(orders)
    }

    pub async fn get_order(&self, order_id: u64) -> Result<ShopifyOrder, ShopifyApiError> {
        #[derive(Deserialize)]
        struct OrderResponse {
            order: ShopifyOrder,
        }
        let path = format!("/orders/{order_id}.json");
        debug!("🛍️ Fetching order #{order_id}");
        let result = self.rest_query::<OrderResponse, ()>(Method::GET, &path, &[], None).await?;
        info!("🛍️ Fetched order #{order_id}");
        Ok(result.order)
    }

    pub async fn cancel_order(&self, order_id: u64) -> Result<ShopifyOrder, ShopifyApiError> {
        #[derive(Deserialize)]
        struct OrderResponse {
            order: ShopifyOrder,
        }
        let path = format!("/orders/{order_id}/cancel.json");
        debug!("🛍️ Cancelling order #{order_id}");
        let result = self.rest_query::<OrderResponse, ()>(Method::POST, &path, &[], None).await?;
        info!("🛍️ Cancelled order #{order_id}");
        Ok(result.order)
    }

    /// Writes all the given metafields in a single `metafieldsSet` mutation. Shopify applies the mutation
    /// atomically: either every metafield is written, or none are and the user errors are returned.
    pub async fn set_metafields(&self, metafields: &[MetafieldInput]) -> Result<Vec<Metafield>, ShopifyApiError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct MetafieldsSetPayload {
            #[serde(default)]
            metafields: Option<Vec<Metafield>>,
            #[serde(default)]
            user_errors: Vec<MetafieldUserError>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct MetafieldsSetResponse {
            metafields_set: MetafieldsSetPayload,
        }
        let variables = serde_json::json!({ "metafields": metafields });
        debug!("🛍️ Setting {} metafields", metafields.len());
        let response = self.graphql_query::<MetafieldsSetResponse>(SET_METAFIELDS, Some(variables)).await?;
        let payload = response.metafields_set;
        if !payload.user_errors.is_empty() {
            warn!("🛍️ metafieldsSet was rejected with {} user errors", payload.user_errors.len());
            return Err(ShopifyApiError::UserErrors(payload.user_errors));
        }
        let written = payload.metafields.unwrap_or_default();
        info!("🛍️ {} metafields written", written.len());
        Ok(written)
    }
}
