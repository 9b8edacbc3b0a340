//! Tiny ERP HTTP client.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::messages::{OrderSearchResult, ProductSearchResult, TinyEnvelope, api_error};
use super::{ErpError, ErpResult};
use crate::config::ServerConfig;

const PRODUCTS_ENDPOINT: &str = "produtos.pesquisa.php";
const ORDERS_ENDPOINT: &str = "pedidos.pesquisa.php";

/// Read-only client for the Tiny ERP search endpoints.
///
/// Cheap to clone; the underlying `reqwest::Client` is shared.
#[derive(Clone)]
pub struct TinyErpClient {
    http_client: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for TinyErpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TinyErpClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl TinyErpClient {
    pub fn new(http_client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            token,
        }
    }

    pub fn from_config(http_client: Client, config: &ServerConfig) -> Self {
        Self::new(
            http_client,
            config.erp_base_url.clone(),
            config.erp_api_token.clone(),
        )
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    /// Number of products returned by the product search.
    pub async fn inventory_count(&self) -> ErpResult<usize> {
        let envelope: TinyEnvelope<ProductSearchResult> = self.search(PRODUCTS_ENDPOINT).await?;
        let result = envelope.retorno;

        if let Some(message) = api_error(
            result.status.as_deref(),
            result.codigo_erro.as_ref(),
            &result.erros,
        ) {
            return Err(ErpError::Api(message));
        }

        let count = result.produtos.len();
        info!(count, "Inventory lookup complete");
        Ok(count)
    }

    /// Sum of all order values, rounded to 2 decimal places.
    pub async fn revenue_total(&self) -> ErpResult<f64> {
        let envelope: TinyEnvelope<OrderSearchResult> = self.search(ORDERS_ENDPOINT).await?;
        let result = envelope.retorno;

        if let Some(message) = api_error(
            result.status.as_deref(),
            result.codigo_erro.as_ref(),
            &result.erros,
        ) {
            return Err(ErpError::Api(message));
        }

        let total = result.total();
        info!(orders = result.pedidos.len(), total, "Revenue lookup complete");
        Ok(total)
    }

    /// Issue a single GET against a search endpoint and decode the envelope.
    async fn search<T>(&self, endpoint: &str) -> ErpResult<T>
    where
        T: DeserializeOwned,
    {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ErpError::MissingToken)?;

        let url = self.endpoint_url(endpoint);
        debug!(url = %url, "Querying Tiny ERP");

        let response = self
            .http_client
            .get(&url)
            .query(&[("token", token), ("formato", "json")])
            .send()
            .await
            .map_err(|e| ErpError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ErpError::Network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ErpError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ErpError::Parse(e.to_string()))
    }
}
