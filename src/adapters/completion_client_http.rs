//! Chat-completions client implementation using reqwest.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderValue, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{AppError, CompletionConfig};
use crate::ports::{CompletionClient, CompletionRequest};

const DEFAULT_STATUS_MESSAGE: &str = "Completion request failed";

/// HTTP transport for the chat-completions endpoint.
///
/// This client performs a single request per call. Retry behavior is implemented
/// by [`super::completion_client_retrying::RetryingCompletionClient`].
#[derive(Clone)]
pub struct HttpCompletionClient {
    api_key: String,
    api_url: Url,
    timeout_secs: u64,
    client: Client,
}

impl std::fmt::Debug for HttpCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCompletionClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HttpCompletionClient {
    pub fn new(api_key: String, config: &CompletionConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::generation_failed(format!("Failed to create HTTP client: {}", e), None)
            })?;

        Ok(Self {
            api_key,
            api_url: config.api_url.clone(),
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    /// Map a reqwest failure before a complete response was read.
    fn transport_error(&self, stage: &str, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::Timeout { seconds: self.timeout_secs }
        } else {
            AppError::generation_failed(format!("{}: {}", stage, err), None)
        }
    }

    fn send_request(&self, request: &ApiRequest<'_>) -> Result<String, AppError> {
        let response = self
            .client
            .post(self.api_url.clone())
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .map_err(|e| self.transport_error("HTTP request failed", e))?;

        let status = response.status();
        let retry_after_ms = response.headers().get(RETRY_AFTER).and_then(parse_retry_after_ms);
        let body_text =
            response.text().map_err(|e| self.transport_error("Failed to read response", e))?;

        if status.is_success() {
            let api_response: ApiResponse = serde_json::from_str(&body_text).map_err(|e| {
                AppError::generation_failed(
                    format!("Failed to parse response: {}", e),
                    Some(status.as_u16()),
                )
            })?;

            return api_response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or_else(|| {
                    AppError::generation_failed(
                        "No message content in response",
                        Some(status.as_u16()),
                    )
                });
        }

        let message = extract_error_message(&body_text).unwrap_or_else(|| {
            if !body_text.trim().is_empty() {
                body_text.clone()
            } else if status.as_u16() == 429 {
                "Rate limited".to_string()
            } else if status.is_server_error() {
                "Server error".to_string()
            } else {
                DEFAULT_STATUS_MESSAGE.to_string()
            }
        });

        Err(AppError::GenerationFailed { message, status: Some(status.as_u16()), retry_after_ms })
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: [ApiMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ApiReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

fn extract_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<serde_json::Value>(body).ok()?;

    if let Some(msg) = parsed
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
    {
        return Some(msg.to_string());
    }

    parsed.get("message").and_then(|message| message.as_str()).map(ToOwned::to_owned)
}

fn parse_retry_after_ms(value: &HeaderValue) -> Option<u64> {
    let raw = value.to_str().ok()?.trim();
    let seconds = raw.parse::<u64>().ok()?;
    Some(seconds.saturating_mul(1000))
}

impl CompletionClient for HttpCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AppError> {
        let api_request = ApiRequest {
            model: &request.model,
            messages: [
                ApiMessage { role: "system", content: &request.system_message },
                ApiMessage { role: "user", content: &request.user_prompt },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request
                .structured_output
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        self.send_request(&api_request)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config_for(server: &mockito::Server) -> CompletionConfig {
        CompletionConfig {
            api_url: Url::parse(&server.url()).unwrap(),
            max_retries: 3,
            retry_delay_ms: 1,
            timeout_secs: 1,
            ..CompletionConfig::default()
        }
    }

    fn request(structured_output: bool) -> CompletionRequest {
        CompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            system_message: "You are a teacher.".to_string(),
            user_prompt: "Plan a lesson".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            structured_output,
        }
    }

    #[test]
    fn complete_returns_first_choice_content() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer fake-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 1000,
                "messages": [
                    {"role": "system", "content": "You are a teacher."},
                    {"role": "user", "content": "Plan a lesson"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Lesson body"}}]}"#)
            .expect(1)
            .create();

        let client =
            HttpCompletionClient::new("fake-key".to_string(), &config_for(&server)).unwrap();
        let reply = client.complete(&request(false)).unwrap();

        assert_eq!(reply, "Lesson body");
        mock.assert();
    }

    #[test]
    fn structured_output_requests_json_object_format() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "response_format": {"type": "json_object"}
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"{\"topics\":[]}"}}]}"#)
            .expect(1)
            .create();

        let client =
            HttpCompletionClient::new("fake-key".to_string(), &config_for(&server)).unwrap();
        client.complete(&request(true)).unwrap();
        mock.assert();
    }

    #[test]
    fn plain_requests_omit_response_format() {
        let body = serde_json::to_value(ApiRequest {
            model: "m",
            messages: [
                ApiMessage { role: "system", content: "s" },
                ApiMessage { role: "user", content: "u" },
            ],
            max_tokens: 1,
            temperature: 0.0,
            response_format: None,
        })
        .unwrap();
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn missing_choices_is_a_generation_failure() {
        let mut server = mockito::Server::new();
        let _mock =
            server.mock("POST", "/").with_status(200).with_body(r#"{"choices":[]}"#).create();

        let client =
            HttpCompletionClient::new("fake-key".to_string(), &config_for(&server)).unwrap();
        let err = client.complete(&request(false)).unwrap_err();
        assert!(matches!(err, AppError::GenerationFailed { status: Some(200), .. }));
    }

    #[test]
    fn fails_fast_on_400() {
        let mut server = mockito::Server::new();
        let mock =
            server.mock("POST", "/").with_status(400).with_body("Bad Request").expect(1).create();

        let client =
            HttpCompletionClient::new("fake-key".to_string(), &config_for(&server)).unwrap();
        let err = client.complete(&request(false)).unwrap_err();
        match err {
            AppError::GenerationFailed { message, status, .. } => {
                assert_eq!(status, Some(400));
                assert_eq!(message, "Bad Request");
            }
            other => panic!("unexpected error variant: {}", other),
        }
        mock.assert();
    }

    #[test]
    fn parses_nested_error_message_and_retry_after() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_header("retry-after", "2")
            .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
            .create();

        let client =
            HttpCompletionClient::new("fake-key".to_string(), &config_for(&server)).unwrap();
        match client.complete(&request(false)).unwrap_err() {
            AppError::GenerationFailed { message, status, retry_after_ms } => {
                assert_eq!(status, Some(429));
                assert_eq!(message, "Rate limit reached");
                assert_eq!(retry_after_ms, Some(2000));
            }
            other => panic!("unexpected error variant: {}", other),
        }
    }

    #[test]
    fn body_stalling_past_timeout_is_a_timeout() {
        // Dedicated (non-pooled) server so the stalled handler is not reused by other tests.
        let mut server = mockito::Server::new_with_opts(mockito::ServerOpts::default());
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_chunked_body(|w| {
                w.write_all(br#"{"choices":[{"message":"#)?;
                w.flush()?;
                std::thread::sleep(Duration::from_secs(3));
                w.write_all(br#"{"content":"late"}}]}"#)
            })
            .create();

        let client =
            HttpCompletionClient::new("fake-key".to_string(), &config_for(&server)).unwrap();
        let err = client.complete(&request(false)).unwrap_err();

        assert!(matches!(err, AppError::Timeout { seconds: 1 }), "got {:?}", err);
        assert!(err.is_transient());
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_failure() {
        let config = CompletionConfig {
            api_url: Url::parse("http://127.0.0.1:9/v1/chat/completions").unwrap(),
            timeout_secs: 1,
            ..CompletionConfig::default()
        };
        let client = HttpCompletionClient::new("fake-key".to_string(), &config).unwrap();

        let err = client.complete(&request(false)).unwrap_err();

        assert!(matches!(
            err,
            AppError::GenerationFailed { status: None, .. } | AppError::Timeout { .. }
        ));
        assert!(err.is_transient());
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = CompletionConfig::default();
        let client = HttpCompletionClient::new("sk-secret".to_string(), &config).unwrap();
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
