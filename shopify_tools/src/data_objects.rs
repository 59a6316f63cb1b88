use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ShopifyApiError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Metafield {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    pub key: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub value_type: Option<String>,
}

/// Key of the metafield holding the string-encoded points total.
pub const TOTAL_METAFIELD_KEY: &str = "total";
/// Key of the metafield holding the JSON-encoded ledger breakdown.
pub const BREAKDOWN_METAFIELD_KEY: &str = "breakdown";

/// A customer as returned by the customer queries in [`crate::ShopifyApi`], with their ledger metafields.
///
/// The queries select each ledger metafield by key, aliased to the key itself, so a customer with any number of other
/// metafields in the same namespace still has both ledger fields read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShopifyCustomer {
    /// The GraphQL id, e.g. `gid://shopify/Customer/207119551`
    pub id: String,
    pub email: Option<String>,
    pub metafields: Vec<Metafield>,
}

impl ShopifyCustomer {
    pub fn metafield(&self, key: &str) -> Option<&Metafield> {
        self.metafields.iter().find(|mf| mf.key == key)
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email.as_deref().is_some_and(|e| e.trim().eq_ignore_ascii_case(email.trim()))
    }

    /// Picks the customer with exactly this email (ignoring case) from a `customers` search result. Shopify search
    /// also returns partial matches, and these are skipped.
    pub fn from_connection(data: &Value, email: &str) -> Result<Option<Self>, ShopifyApiError> {
        let edges = data["customers"]["edges"].as_array().map(Vec::as_slice).unwrap_or_default();
        for edge in edges {
            if let Some(customer) = Self::from_node(&edge["node"])? {
                if customer.has_email(email) {
                    return Ok(Some(customer));
                }
            }
        }
        Ok(None)
    }

    /// Reads a single `Customer` node. A null node means there is no such customer.
    pub fn from_node(node: &Value) -> Result<Option<Self>, ShopifyApiError> {
        if node.is_null() {
            return Ok(None);
        }
        let id = node["id"]
            .as_str()
            .ok_or_else(|| ShopifyApiError::JsonError("'id' does not exist in customer node".to_string()))?
            .to_string();
        let email = node["email"].as_str().map(String::from);
        let metafields = [TOTAL_METAFIELD_KEY, BREAKDOWN_METAFIELD_KEY]
            .iter()
            .map(|alias| &node[*alias])
            .filter(|field| !field.is_null())
            .map(|field| {
                serde_json::from_value::<Metafield>(field.clone())
                    .map_err(|e| ShopifyApiError::JsonError(format!("Invalid metafield. {e}")))
            })
            .collect::<Result<Vec<Metafield>, ShopifyApiError>>()?;
        Ok(Some(Self { id, email, metafields }))
    }
}

/// One entry of the `metafields` argument of the `metafieldsSet` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldInput {
    pub owner_id: String,
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: String,
}

impl MetafieldInput {
    pub fn new(owner_id: &str, namespace: &str, key: &str, value_type: &str, value: String) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            namespace: namespace.to_string(),
            key: key.to_string(),
            value_type: value_type.to_string(),
            value,
        }
    }
}

/// Field-level validation errors reported by Shopify mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafieldUserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl Display for MetafieldUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(path) if !path.is_empty() => write!(f, "{}: {}", path.join("."), self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}
