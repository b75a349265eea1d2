use super::provider::{ChatTurn, LLMError, LanguageModel, ModelRequest, ModelResponse, SearchSource, TurnRole};
use crate::gemini::{
    Client, ClientConfig, Content, GenerateContentRequest, GenerationConfig, Tool,
};
use async_trait::async_trait;

pub struct GeminiProvider {
    client: Client,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> Result<Self, LLMError> {
        Ok(Self {
            client: Client::new(api_key, config)?,
        })
    }

    fn convert_to_gemini_format(request: &ModelRequest) -> GenerateContentRequest {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|turn: &ChatTurn| match turn.role {
                TurnRole::User => Content::user_text(&turn.text),
                TurnRole::Model => Content::model_text(&turn.text),
            })
            .collect();
        contents.push(Content::user_text(&request.message));

        let generation_config = GenerationConfig {
            temperature: request.temperature,
            response_mime_type: request
                .response_schema
                .as_ref()
                .map(|_| "application/json".to_string()),
            response_schema: request.response_schema.clone(),
        };

        GenerateContentRequest {
            contents,
            system_instruction: (!request.system_instruction.is_empty())
                .then(|| Content::system_text(&request.system_instruction)),
            generation_config: (!generation_config.is_empty()).then_some(generation_config),
            tools: request.google_search.then(|| vec![Tool::google_search()]),
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, LLMError> {
        let gemini_request = Self::convert_to_gemini_format(&request);
        let response = self.client.generate(&request.model, &gemini_request).await?;

        let text = response
            .text()
            .ok_or_else(|| LLMError::InvalidResponse("model returned no text".to_string()))?;
        let sources = response
            .web_sources()
            .into_iter()
            .map(|web| SearchSource {
                url: web.uri,
                title: web.title,
            })
            .collect();

        Ok(ModelResponse { text, sources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_requests_ask_for_json() {
        let request = ModelRequest::new("gemini-2.0-flash", "classify", "app.js 분석해줘")
            .with_schema(json!({"type": "object"}))
            .with_temperature(0.0);
        let converted = GeminiProvider::convert_to_gemini_format(&request);
        let config = converted.generation_config.expect("generation config");
        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
        assert!(converted.tools.is_none());
        assert_eq!(converted.contents.len(), 1);
    }

    #[test]
    fn history_precedes_message_and_search_adds_tool() {
        let request = ModelRequest::new("gemini-2.0-flash", "", "and now?")
            .with_history(vec![ChatTurn::user("hi"), ChatTurn::model("hello")])
            .with_google_search();
        let converted = GeminiProvider::convert_to_gemini_format(&request);
        let roles: Vec<&str> = converted.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert!(converted.system_instruction.is_none());
        assert!(converted.generation_config.is_none());
        assert_eq!(converted.tools.map(|tools| tools.len()), Some(1));
    }
}
