//! OpenAI-compatible chat-completions client.

use crate::config::ChatConfig;
use crate::error::ChatError;
use kitty_core::{system_instruction, ChatTurn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Sends the conversation to the backend and returns the assistant's reply.
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Ask for the next assistant turn.
    ///
    /// The system message carries the persona and the study materials; the
    /// turn history follows in order.
    pub async fn respond(
        &self,
        context: &str,
        persona: &str,
        turns: &[ChatTurn],
    ) -> Result<String, ChatError> {
        let instruction = system_instruction(persona, context);

        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: &instruction,
        });
        messages.extend(turns.iter().map(|turn| WireMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        }));

        let body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        log::debug!(
            "Sending {} turn(s) to {} ({} chars of context)",
            turns.len(),
            self.config.model,
            context.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ChatError::ModelNotFound(self.config.model.clone()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            log::warn!("Chat API error {}: {}", status, message);
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ChatError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn client_for(server: &MockServer) -> ChatClient {
        ChatClient::new(ChatConfig::new("test-key").with_base_url(server.base_url()))
    }

    #[tokio::test]
    async fn test_respond_sends_system_and_history() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer test-key")
                    .body_contains("\"role\":\"system\"")
                    .body_contains("Mitochondria make ATP")
                    .body_contains("\"role\":\"user\"");
                then.status(200).json_body(json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": "They make ATP!" } }
                    ]
                }));
            })
            .await;

        let turns = vec![ChatTurn::greeting(), ChatTurn::user("What do mitochondria do?")];
        let reply = client_for(&server)
            .respond("Mitochondria make ATP", "", &turns)
            .await
            .expect("reply");

        mock.assert();
        assert_eq!(reply, "They make ATP!");
    }

    #[tokio::test]
    async fn test_not_found_maps_to_model_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(404).body("no such model");
            })
            .await;

        let err = client_for(&server)
            .respond("ctx", "", &[ChatTurn::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::ModelNotFound(ref m) if m == "gpt-oss-120b"));
    }

    #[tokio::test]
    async fn test_server_error_carries_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(429).body("rate limited");
            })
            .await;

        let err = client_for(&server)
            .respond("ctx", "", &[ChatTurn::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Api { status: 429, ref message } if message == "rate limited"));
    }

    #[tokio::test]
    async fn test_empty_completion() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let err = client_for(&server)
            .respond("ctx", "", &[ChatTurn::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::EmptyResponse));
    }
}
