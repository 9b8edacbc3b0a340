//! Response types for the Tiny ERP search endpoints.
//!
//! Every Tiny API v2 response is wrapped in a `retorno` object:
//!
//! ```json
//! {"retorno": {"status": "OK", "produtos": [{"produto": {"id": "1"}}]}}
//! {"retorno": {"status": "OK", "pedidos": [{"pedido": {"valor": "150.00"}}]}}
//! {"retorno": {"status": "Erro", "erros": [{"erro": "Token invalido"}]}}
//! ```

use serde::Deserialize;
use serde_json::Value;

/// Top-level response envelope. A missing `retorno` deserializes as empty.
#[derive(Debug, Clone, Deserialize)]
pub struct TinyEnvelope<T: Default> {
    #[serde(default)]
    pub retorno: T,
}

/// Error entry reported by the API in `retorno.erros`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TinyErrorEntry {
    #[serde(default)]
    pub erro: Option<String>,
}

/// Payload of `produtos.pesquisa.php`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProductSearchResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub codigo_erro: Option<Value>,
    /// Products are only counted, so their content is kept opaque.
    #[serde(default)]
    pub produtos: Vec<Value>,
    #[serde(default)]
    pub erros: Vec<TinyErrorEntry>,
}

/// Payload of `pedidos.pesquisa.php`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OrderSearchResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub codigo_erro: Option<Value>,
    #[serde(default)]
    pub pedidos: Vec<OrderEntry>,
    #[serde(default)]
    pub erros: Vec<TinyErrorEntry>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OrderEntry {
    #[serde(default)]
    pub pedido: OrderSummary,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OrderSummary {
    /// Order total. Tiny sends it as a decimal string; numbers are accepted too.
    #[serde(default)]
    pub valor: Option<Value>,
}

/// Status value Tiny uses for a rejected request.
const STATUS_ERROR: &str = "Erro";

/// Error code Tiny reports when a search matched no records.
const CODE_NO_RECORDS: i64 = 20;

fn is_no_records(code: Option<&Value>) -> bool {
    match code {
        Some(Value::Number(n)) => n.as_i64() == Some(CODE_NO_RECORDS),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok() == Some(CODE_NO_RECORDS),
        _ => false,
    }
}

/// Extract the API-reported error, if the envelope carries one.
///
/// An empty search result is reported by Tiny as an error with code 20; it is
/// treated as an empty list rather than a failure.
pub(super) fn api_error(
    status: Option<&str>,
    code: Option<&Value>,
    erros: &[TinyErrorEntry],
) -> Option<String> {
    if status != Some(STATUS_ERROR) || is_no_records(code) {
        return None;
    }
    let messages: Vec<&str> = erros.iter().filter_map(|e| e.erro.as_deref()).collect();
    if messages.is_empty() {
        Some("unknown error".to_string())
    } else {
        Some(messages.join("; "))
    }
}

/// Parse an order value as a decimal.
///
/// Missing, non-numeric and non-finite values count as zero.
pub fn parse_order_value(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

impl OrderSearchResult {
    /// Sum of all order values, rounded to 2 decimal places.
    pub fn total(&self) -> f64 {
        let sum: f64 = self
            .pedidos
            .iter()
            .map(|entry| parse_order_value(entry.pedido.valor.as_ref()))
            .sum();
        // Adding 0.0 turns a rounded -0.0 into 0.0
        (sum * 100.0).round() / 100.0 + 0.0
    }
}
