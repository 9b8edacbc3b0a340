//! Reply dispatch for inbound text.
//!
//! A [`Responder`] holds an ordered list of [`IntentRule`]s. The first rule
//! whose predicate matches the message handles it; otherwise the fallback
//! handler does. The stock rules are:
//!
//! 1. `"estoque"` anywhere in the text (any case) → product count from the ERP
//! 2. `"faturamento"` → revenue total from the ERP
//! 3. anything else → language model completion
//!
//! [`Responder::respond`] never fails. Handler errors are logged and replaced
//! by [`FALLBACK_REPLY`].

mod intents;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

use crate::core::erp::TinyErpClient;
use crate::core::llm::{LlmError, OpenAIChat};

pub use intents::{InventoryHandler, LanguageModelHandler, RevenueHandler};

/// Reply sent when a handler fails.
pub const FALLBACK_REPLY: &str = "Erro ao gerar resposta.";

#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),
}

/// Produces the reply text for one message.
#[async_trait]
pub trait IntentHandler: Send + Sync {
    async fn handle(&self, message: &str) -> Result<String, ResponderError>;
}

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// A named predicate paired with the handler it routes to.
pub struct IntentRule {
    name: &'static str,
    predicate: Predicate,
    handler: Arc<dyn IntentHandler>,
}

impl std::fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl IntentRule {
    pub fn new(
        name: &'static str,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
        handler: Arc<dyn IntentHandler>,
    ) -> Self {
        Self {
            name,
            predicate: Box::new(predicate),
            handler,
        }
    }

    /// Matches when `keyword` occurs anywhere in the message, ignoring case.
    pub fn keyword(keyword: &'static str, handler: Arc<dyn IntentHandler>) -> Self {
        let needle = keyword.to_lowercase();
        Self::new(
            keyword,
            move |message: &str| message.to_lowercase().contains(&needle),
            handler,
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches(&self, message: &str) -> bool {
        (self.predicate)(message)
    }
}

/// Ordered intent rules plus a fallback handler.
pub struct Responder {
    rules: Vec<IntentRule>,
    fallback: Arc<dyn IntentHandler>,
}

impl std::fmt::Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl Responder {
    pub fn new(rules: Vec<IntentRule>, fallback: Arc<dyn IntentHandler>) -> Self {
        Self { rules, fallback }
    }

    /// Inventory, then revenue, then the language model.
    pub fn with_default_rules(erp: TinyErpClient, llm: OpenAIChat) -> Self {
        Self::new(
            vec![
                IntentRule::keyword("estoque", Arc::new(InventoryHandler::new(erp.clone()))),
                IntentRule::keyword("faturamento", Arc::new(RevenueHandler::new(erp))),
            ],
            Arc::new(LanguageModelHandler::new(llm)),
        )
    }

    /// Name of the rule that would handle `message`, `None` for the fallback.
    pub fn route(&self, message: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(message))
            .map(IntentRule::name)
    }

    /// Reply text for `message`. Never fails.
    pub async fn respond(&self, message: &str) -> String {
        let (intent, handler) = match self.rules.iter().find(|rule| rule.matches(message)) {
            Some(rule) => (rule.name, &rule.handler),
            None => ("fallback", &self.fallback),
        };
        debug!(intent, "Dispatching message");

        match handler.handle(message).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(intent, error = %e, "Failed to generate reply");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
