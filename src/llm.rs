use serde::{Deserialize, Serialize};

/// Chat-completions endpoint of the remote LLM service.
pub const CHAT_COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Model id sent with every outbound request.
pub const CHAT_MODEL: &str = "deepseek/deepseek-r1:free";

/// Reply used when the upstream response carries no choices.
pub const NO_RESPONSE_FALLBACK: &str = "No response";

/// Client for the remote chat-completions endpoint.
///
/// One synchronous (from the handler's point of view) POST per chat request:
/// no retry, no backoff, and no timeout beyond reqwest's defaults.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    api_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
struct Choice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatClient {
    pub fn new() -> Self {
        Self::with_endpoint(CHAT_COMPLETIONS_URL.to_string(), CHAT_MODEL.to_string())
    }

    /// Builds a client against a non-default endpoint. Used by tests to point
    /// at a mock server.
    pub fn with_endpoint(api_url: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            model,
        }
    }

    /// Sends `prompt` as a single user message and returns the reply text.
    ///
    /// Network failures, non-2xx statuses and undecodable bodies all surface
    /// as `reqwest::Error`; a well-formed response without choices yields the
    /// literal `"No response"`.
    pub async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, reqwest::Error> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let body: ChatCompletionResponse = response.json().await?;

        Ok(body
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string()))
    }
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_without_choices_decodes_to_empty() {
        let body: ChatCompletionResponse = serde_json::from_str("{}").expect("Failed to decode");
        assert!(body.choices.is_empty());
    }

    #[test]
    fn reply_text_is_taken_from_first_choice() {
        let json = r#"{"choices":[{"message":{"content":"hello"}},{"message":{"content":"later"}}]}"#;
        let body: ChatCompletionResponse = serde_json::from_str(json).expect("Failed to decode");

        let reply = body
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone());
        assert_eq!(reply.as_deref(), Some("hello"));
    }

    #[test]
    fn choice_without_content_decodes_to_none() {
        let json = r#"{"choices":[{"message":{}}]}"#;
        let body: ChatCompletionResponse = serde_json::from_str(json).expect("Failed to decode");

        assert!(body.choices[0].message.content.is_none());
    }
}
