pub mod config;

pub use config::ClientConfig;

use crate::gemini::models::{GenerateContentRequest, GenerateContentResponse};
use crate::llm::LLMError;
use reqwest::{Client as ReqwestClient, StatusCode};
use std::time::Instant;
use tracing::debug;

#[derive(Clone)]
pub struct Client {
    api_key: String,
    http: ReqwestClient,
    config: ClientConfig,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.base_url)
            .field("request_timeout", &self.config.request_timeout)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> Result<Self, LLMError> {
        let http = ReqwestClient::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|err| LLMError::Network(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            api_key: api_key.into(),
            http,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Call `models/{model}:generateContent`.
    pub async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LLMError> {
        let start = Instant::now();
        let url = format!("{}/models/{}:generateContent", self.config.base_url, model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LLMError::Timeout(self.config.request_timeout.as_secs())
                } else {
                    LLMError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LLMError::Timeout(self.config.request_timeout.as_secs())
                } else {
                    LLMError::InvalidResponse(format!("failed to parse response: {err}"))
                }
            })?;

        debug!(model, elapsed_ms = start.elapsed().as_millis() as u64, "gemini request completed");
        Ok(parsed)
    }
}

fn classify_status(status: StatusCode, body: &str) -> LLMError {
    let lowered = body.to_lowercase();
    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || lowered.contains("api key not valid")
        || lowered.contains("api_key_invalid")
    {
        return LLMError::Authentication(format!("HTTP {status}: {}", first_line(body)));
    }
    if status == StatusCode::TOO_MANY_REQUESTS || lowered.contains("quota") {
        return LLMError::RateLimit;
    }
    LLMError::Provider(format!("HTTP {status}: {}", first_line(body)))
}

fn first_line(body: &str) -> &str {
    body.lines().map(str::trim).find(|line| !line.is_empty()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_error_kinds() {
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "denied"),
            LLMError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, "API key not valid. Please pass a valid API key."),
            LLMError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, ""),
            LLMError::RateLimit
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, "\n  boom\nmore"),
            LLMError::Provider(message) if message.ends_with("boom")
        ));
    }
}
