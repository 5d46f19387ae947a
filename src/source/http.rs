//! HTTP message source with candidate-endpoint fallback
//!
//! The platform has grown several message-listing endpoints over time and
//! not every deployment serves all of them. The adapter tries a fixed
//! ordered list of candidates, accepts the first one that returns a
//! recognizable payload, and normalizes both payload shapes (a bare array,
//! or an object carrying a "messages" array) into `Message` values.

use serde_json::Value;

use super::provider::MessageSource;
use super::types::{Message, RawMessage};

/// HTTP-backed message source
pub struct HttpMessageSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpMessageSource {
    /// Create a message source for the given platform base URL
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Candidate retrieval endpoints, in priority order.
    ///
    /// Each is attempted exactly once per invocation; no retry or backoff.
    fn candidate_urls(&self, agent_id: &str) -> Vec<String> {
        let base = self.base_url.trim_end_matches('/');
        vec![
            format!("{}/v1/agents/{}/messages", base, agent_id),
            format!("{}/v1/agents/{}/messages/list", base, agent_id),
            format!("{}/v1/messages?agent_id={}", base, agent_id),
        ]
    }

    /// Attempt one candidate; `None` means try the next
    async fn try_candidate(&self, url: &str) -> Option<Vec<RawMessage>> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            tracing::debug!("Candidate {} returned {}", url, response.status());
            return None;
        }

        let body: Value = response.json().await.ok()?;
        extract_message_list(body)
    }
}

/// Pull the message array out of either recognized payload shape
fn extract_message_list(body: Value) -> Option<Vec<RawMessage>> {
    let list = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("messages") {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };

    let messages = list
        .into_iter()
        .filter_map(|item| serde_json::from_value::<RawMessage>(item).ok())
        .collect();
    Some(messages)
}

#[async_trait::async_trait]
impl MessageSource for HttpMessageSource {
    async fn fetch_messages(&self, agent_id: &str) -> Vec<Message> {
        for url in self.candidate_urls(agent_id) {
            if let Some(raw) = self.try_candidate(&url).await {
                let messages: Vec<Message> = raw
                    .into_iter()
                    .filter_map(|msg| msg.normalize(agent_id))
                    .collect();
                tracing::debug!(
                    "Agent {}: {} messages via {}",
                    agent_id,
                    messages.len(),
                    url
                );
                return messages;
            }
        }

        tracing::warn!(
            "Agent {}: no message endpoint responded, proceeding with empty history",
            agent_id
        );
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Minimal HTTP server mapping request targets to canned responses;
    /// unmapped targets get a 404
    async fn spawn_server(routes: HashMap<String, (u16, String)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let read = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..read]).to_string();
                    let target = request
                        .lines()
                        .next()
                        .and_then(|line| line.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();

                    let (status, body) = routes
                        .get(&target)
                        .cloned()
                        .unwrap_or((404, String::new()));
                    let reason = if status == 200 { "OK" } else { "Not Found" };
                    let response = format!(
                        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        reason,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_first_candidate_success() {
        let mut routes = HashMap::new();
        routes.insert(
            "/v1/agents/a1/messages".to_string(),
            (
                200,
                json!([
                    {"id": "m1", "message_type": "user_message", "content": "hi"},
                    {"id": "m2", "message_type": "assistant_message", "content": "hello"}
                ])
                .to_string(),
            ),
        );

        let base = spawn_server(routes).await;
        let source = HttpMessageSource::new(base, "key");

        let messages = source.fetch_messages("a1").await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].agent_id, "a1");
    }

    #[tokio::test]
    async fn test_falls_through_to_third_candidate() {
        // First candidate 404s, second answers 200 with an unrecognizable
        // shape, third succeeds with a "messages" object
        let mut routes = HashMap::new();
        routes.insert(
            "/v1/agents/a1/messages/list".to_string(),
            (200, json!({"id": "a1", "state": "idle"}).to_string()),
        );
        routes.insert(
            "/v1/messages?agent_id=a1".to_string(),
            (
                200,
                json!({
                    "messages": (0..5)
                        .map(|i| json!({
                            "id": format!("m{}", i),
                            "message_type": "assistant_message"
                        }))
                        .collect::<Vec<_>>()
                })
                .to_string(),
            ),
        );

        let base = spawn_server(routes).await;
        let source = HttpMessageSource::new(base, "key");

        let messages = source.fetch_messages("a1").await;
        assert_eq!(messages.len(), 5);
    }

    #[tokio::test]
    async fn test_exhaustion_yields_empty() {
        // No route matches: every candidate gets a 404
        let base = spawn_server(HashMap::new()).await;
        let source = HttpMessageSource::new(base, "key");

        assert!(source.fetch_messages("a1").await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_empty() {
        // Nothing listens on the reserved port: every candidate's
        // transport attempt fails
        let source = HttpMessageSource::new("http://127.0.0.1:1", "key");
        assert!(source.fetch_messages("a1").await.is_empty());
    }

    #[test]
    fn test_candidate_order() {
        let source = HttpMessageSource::new("https://api.example.com", "key");
        let urls = source.candidate_urls("agent-1");
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], "https://api.example.com/v1/agents/agent-1/messages");
        assert_eq!(
            urls[1],
            "https://api.example.com/v1/agents/agent-1/messages/list"
        );
        assert_eq!(urls[2], "https://api.example.com/v1/messages?agent_id=agent-1");
    }

    #[test]
    fn test_extract_bare_array() {
        let body = json!([
            {"id": "m1", "message_type": "user_message", "content": "hi"}
        ]);
        let messages = extract_message_list(body).unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_extract_messages_object() {
        let body = json!({
            "messages": [
                {"id": "m1", "message_type": "user_message"},
                {"id": "m2", "message_type": "assistant_message"}
            ]
        });
        let messages = extract_message_list(body).unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_extract_rejects_other_shapes() {
        assert!(extract_message_list(json!({"id": "agent-1"})).is_none());
        assert!(extract_message_list(json!("nope")).is_none());
        assert!(extract_message_list(json!({"messages": "nope"})).is_none());
    }
}
