//! Narrative answers for the assistant surface: a language-model reply when a
//! client is configured, a canned demo narrative otherwise.

pub mod demo;
pub mod prompt;

use crate::config::Settings;
use crate::domain::error::ValidationError;
use crate::domain::profile::FinancialProfile;
use crate::llm::anthropic::AnthropicClient;
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::LlmClient;
use crate::market::{catalog, QuoteService};
use prompt::StockMetrics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisoryTopic {
    StockAnalysis,
    SipStrategy,
    TaxPlanning,
    FreeText(String),
    PortfolioStrategy(FinancialProfile),
}

impl AdvisoryTopic {
    pub fn question(text: &str) -> Result<Self, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        Ok(AdvisoryTopic::FreeText(text.to_string()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AdvisoryTopic::StockAnalysis => "stock_analysis",
            AdvisoryTopic::SipStrategy => "sip_strategy",
            AdvisoryTopic::TaxPlanning => "tax_planning",
            AdvisoryTopic::FreeText(_) => "free_text",
            AdvisoryTopic::PortfolioStrategy(_) => "portfolio_strategy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Live,
    Demo,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    pub topic: String,
    pub text: String,
    pub source: ResponseSource,
}

#[derive(Clone)]
pub struct Advisor {
    llm: Option<Arc<dyn LlmClient>>,
    quotes: QuoteService,
}

impl std::fmt::Debug for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advisor")
            .field("llm", &self.llm.as_ref().map(|c| c.provider()))
            .field("quotes", &self.quotes)
            .finish()
    }
}

impl Advisor {
    pub fn new(llm: Option<Arc<dyn LlmClient>>, quotes: QuoteService) -> Self {
        Self { llm, quotes }
    }

    pub fn from_settings(settings: &Settings, quotes: QuoteService) -> anyhow::Result<Self> {
        if !settings.llm_enabled() {
            tracing::info!("no usable ANTHROPIC_API_KEY; assistant runs in demo mode");
            return Ok(Self::new(None, quotes));
        }
        let client = AnthropicClient::from_settings(settings)?;
        Ok(Self::new(Some(Arc::new(client)), quotes))
    }

    pub fn is_live(&self) -> bool {
        self.llm.is_some()
    }

    /// Never fails: client errors come back as the response text.
    pub async fn respond(&self, topic: &AdvisoryTopic) -> AdvisoryResponse {
        let metrics = match topic {
            AdvisoryTopic::StockAnalysis => {
                let price = self.quotes.price_view(&catalog::analysis_stock()).await;
                Some(StockMetrics::hdfc_bank(price))
            }
            _ => None,
        };

        let Some(llm) = &self.llm else {
            return AdvisoryResponse {
                topic: topic.kind().to_string(),
                text: demo::narrative(topic, metrics.as_ref()),
                source: ResponseSource::Demo,
            };
        };

        let prompt = prompt::build(topic, metrics.as_ref());
        match llm.complete(&prompt).await {
            Ok(text) => AdvisoryResponse {
                topic: topic.kind().to_string(),
                text,
                source: ResponseSource::Live,
            },
            Err(err) => {
                tracing::warn!(
                    topic = topic.kind(),
                    provider = ?llm.provider(),
                    error = %err,
                    "advisory request failed"
                );
                if let Some(diag) = err.downcast_ref::<LlmDiagnosticsError>() {
                    tracing::warn!(
                        stage = diag.stage,
                        provider_message = diag.provider_message().unwrap_or("<empty>"),
                        "provider rejected advisory request"
                    );
                }
                AdvisoryResponse {
                    topic: topic.kind().to_string(),
                    text: format!("Error generating response: {err:#}"),
                    source: ResponseSource::Error,
                }
            }
        }
    }
}
