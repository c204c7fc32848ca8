use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{LlmProvider, Message};

/// Any OpenAI-compatible `/chat/completions` endpoint (OpenAI, Groq, vLLM).
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat(&self, system_prompt: &str, messages: &[Message]) -> anyhow::Result<String> {
        let mut chat_messages = vec![json!({
            "role": "system",
            "content": system_prompt,
        })];

        for msg in messages {
            chat_messages.push(json!({
                "role": msg.role,
                "content": msg.content,
            }));
        }

        let body = json!({
            "model": self.model,
            "messages": chat_messages,
            "temperature": 0,
            "response_format": { "type": "json_object" },
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call chat completions API")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .with_context(|| format!("failed to read chat completions response ({status})"))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<serde_json::Value>(&text)
                .map(|data| data["error"].to_string())
                .unwrap_or_else(|_| text.chars().take(200).collect());
            anyhow::bail!("chat completions API error ({}): {}", status, detail);
        }

        let data: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse chat completions response ({status})"))?;

        data["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing content in chat completions response"))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::Html;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn provider(base_url: String) -> OpenAiProvider {
        OpenAiProvider {
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            base_url,
            client: reqwest::Client::builder().no_proxy().build().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_returns_message_content() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async {
                Json(json!({"choices": [{"message": {"content": "{\"num_travelers\":2}"}}]}))
            }),
        );
        let base_url = serve(app).await;

        let reply = provider(base_url).chat("system", &[Message::user("hi")]).await.unwrap();
        assert_eq!(reply, r#"{"num_travelers":2}"#);
    }

    #[tokio::test]
    async fn test_html_error_page_keeps_status() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::BAD_GATEWAY, Html("<html><body>502 Bad Gateway</body></html>")) }),
        );
        let base_url = serve(app).await;

        let err = provider(base_url)
            .chat("system", &[Message::user("hi")])
            .await
            .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("502"), "{msg}");
        assert!(msg.contains("Bad Gateway"), "{msg}");
    }

    #[tokio::test]
    async fn test_json_error_reports_error_object() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": {"message": "invalid api key"}})),
                )
            }),
        );
        let base_url = serve(app).await;

        let err = provider(base_url)
            .chat("system", &[Message::user("hi")])
            .await
            .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("401"), "{msg}");
        assert!(msg.contains("invalid api key"), "{msg}");
    }
}
