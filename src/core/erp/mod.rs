//! Tiny ERP (API v2) read-only lookups.
//!
//! Two queries are exposed, both authenticated with the static API token sent
//! as the `token` query parameter:
//!
//! - [`TinyErpClient::inventory_count`]: number of products returned by
//!   `produtos.pesquisa.php`
//! - [`TinyErpClient::revenue_total`]: sum of `pedido.valor` over the orders
//!   returned by `pedidos.pesquisa.php`, rounded to 2 decimal places
//!
//! Lookups are single-attempt and use the HTTP client defaults (no retry, no
//! timeout override). Failures are returned as [`ErpError`]; callers decide
//! whether to surface them or substitute a fallback sentence.
//!
//! # Example
//!
//! ```rust,no_run
//! use erp_assistant_gateway::core::erp::TinyErpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let erp = TinyErpClient::new(
//!     reqwest::Client::new(),
//!     "https://api.tiny.com.br/api2",
//!     Some("tiny-token".to_string()),
//! );
//! let products = erp.inventory_count().await?;
//! let revenue = erp.revenue_total().await?;
//! println!("{products} products, R$ {revenue:.2}");
//! # Ok(())
//! # }
//! ```

mod client;
mod messages;

use thiserror::Error;

pub use client::TinyErpClient;
pub use messages::{
    OrderEntry, OrderSearchResult, OrderSummary, ProductSearchResult, TinyEnvelope, TinyErrorEntry,
    parse_order_value,
};

/// Sentence substituted for the product count when the inventory lookup fails.
pub const INVENTORY_UNAVAILABLE: &str = "não foi possível consultar o estoque";
/// Sentence substituted for the amount when the revenue lookup fails.
pub const REVENUE_UNAVAILABLE: &str = "não foi possível consultar o faturamento";

/// Result type for ERP lookups
pub type ErpResult<T> = Result<T, ErpError>;

/// Errors raised by ERP lookups
#[derive(Debug, Error)]
pub enum ErpError {
    /// No API token configured
    #[error("Tiny ERP API token not configured")]
    MissingToken,

    /// Transport-level failure (connection refused, timeout, TLS, ...)
    #[error("ERP request failed: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("ERP returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Response body is not the expected JSON shape
    #[error("Failed to parse ERP response: {0}")]
    Parse(String),

    /// The API processed the request but reported an error in `retorno`
    #[error("ERP API error: {0}")]
    Api(String),
}
