use crate::llm::Provider;
use serde_json::Value;
use thiserror::Error;

/// A failed model call, with whatever the provider sent back.
#[derive(Debug, Clone, Error)]
#[error("LLM error (provider={provider:?}, stage={stage}): {detail}")]
pub struct LlmDiagnosticsError {
    pub provider: Provider,
    pub stage: &'static str,
    pub detail: String,
    pub raw_output: Option<String>,
    pub raw_response_json: Option<Value>,
}

impl LlmDiagnosticsError {
    /// The provider's own explanation: `error.message` from a JSON error
    /// envelope, else the raw body.
    pub fn provider_message(&self) -> Option<&str> {
        self.raw_response_json
            .as_ref()
            .and_then(|v| v.pointer("/error/message"))
            .and_then(Value::as_str)
            .or(self.raw_output.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn http_error(
        raw_output: Option<&str>,
        raw_response_json: Option<Value>,
    ) -> LlmDiagnosticsError {
        LlmDiagnosticsError {
            provider: Provider::Anthropic,
            stage: "http",
            detail: "status=401 Unauthorized".to_string(),
            raw_output: raw_output.map(str::to_string),
            raw_response_json,
        }
    }

    #[test]
    fn display_names_provider_and_stage() {
        assert_eq!(
            http_error(None, None).to_string(),
            "LLM error (provider=Anthropic, stage=http): status=401 Unauthorized"
        );
    }

    #[test]
    fn provider_message_prefers_error_envelope() {
        let body = json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        });
        let err = http_error(Some(&body.to_string()), Some(body));
        assert_eq!(err.provider_message(), Some("invalid x-api-key"));
    }

    #[test]
    fn provider_message_falls_back_to_raw_body() {
        let err = http_error(Some("upstream connect error"), None);
        assert_eq!(err.provider_message(), Some("upstream connect error"));

        assert_eq!(http_error(Some("  "), None).provider_message(), None);
        assert_eq!(http_error(None, None).provider_message(), None);
    }
}
