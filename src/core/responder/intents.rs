//! Stock intent handlers.

use async_trait::async_trait;
use tracing::warn;

use super::{IntentHandler, ResponderError};
use crate::core::erp::{INVENTORY_UNAVAILABLE, REVENUE_UNAVAILABLE, TinyErpClient};
use crate::core::llm::OpenAIChat;

/// Product count reply. ERP failures are folded into the sentence.
pub struct InventoryHandler {
    erp: TinyErpClient,
}

impl InventoryHandler {
    pub fn new(erp: TinyErpClient) -> Self {
        Self { erp }
    }
}

#[async_trait]
impl IntentHandler for InventoryHandler {
    async fn handle(&self, _message: &str) -> Result<String, ResponderError> {
        let count = match self.erp.inventory_count().await {
            Ok(count) => count.to_string(),
            Err(e) => {
                warn!(error = %e, "Inventory lookup failed");
                INVENTORY_UNAVAILABLE.to_string()
            }
        };
        Ok(format!("A empresa possui {count} produtos no estoque."))
    }
}

/// Revenue total reply, two decimal places.
pub struct RevenueHandler {
    erp: TinyErpClient,
}

impl RevenueHandler {
    pub fn new(erp: TinyErpClient) -> Self {
        Self { erp }
    }
}

#[async_trait]
impl IntentHandler for RevenueHandler {
    async fn handle(&self, _message: &str) -> Result<String, ResponderError> {
        let amount = match self.erp.revenue_total().await {
            Ok(total) => format!("{total:.2}"),
            Err(e) => {
                warn!(error = %e, "Revenue lookup failed");
                REVENUE_UNAVAILABLE.to_string()
            }
        };
        Ok(format!("O faturamento total da empresa é R$ {amount}."))
    }
}

/// Free-form questions go to the chat model.
pub struct LanguageModelHandler {
    llm: OpenAIChat,
}

impl LanguageModelHandler {
    pub fn new(llm: OpenAIChat) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl IntentHandler for LanguageModelHandler {
    async fn handle(&self, message: &str) -> Result<String, ResponderError> {
        Ok(self.llm.complete(message).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    fn unreachable_erp() -> TinyErpClient {
        TinyErpClient::new(
            Client::new(),
            "http://127.0.0.1:9/api2",
            Some("token".to_string()),
        )
    }

    #[tokio::test]
    async fn test_inventory_sentinel_on_failure() {
        let reply = InventoryHandler::new(unreachable_erp())
            .handle("estoque")
            .await
            .unwrap();
        assert_eq!(
            reply,
            "A empresa possui não foi possível consultar o estoque produtos no estoque."
        );
    }

    #[tokio::test]
    async fn test_revenue_sentinel_without_token() {
        let erp = TinyErpClient::new(Client::new(), "http://127.0.0.1:9/api2", None);
        let reply = RevenueHandler::new(erp).handle("faturamento").await.unwrap();
        assert_eq!(
            reply,
            "O faturamento total da empresa é R$ não foi possível consultar o faturamento."
        );
    }

    #[tokio::test]
    async fn test_language_model_error_propagates() {
        let llm = OpenAIChat::new(Client::new(), "http://127.0.0.1:9", None, "m", "s");
        let result = LanguageModelHandler::new(llm).handle("oi").await;
        assert!(matches!(result, Err(ResponderError::Llm(_))));
    }
}
