use crate::utils::error::{BotError, Result};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;

pub const USER_AGENT_VALUE: &str = "translation-bot";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Sends single form-encoded POST requests to the upstream services.
///
/// Every call is made exactly once; retries are left to the caller.
#[derive(Debug, Clone, Default)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Posts `params` to `url` and returns the full response body.
    ///
    /// The request runs on its own task raced against `timeout`. When the
    /// deadline wins the task is aborted and joined before `Timeout` is
    /// returned, so nothing is left running behind the caller.
    pub async fn execute(
        &self,
        url: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Vec<u8>> {
        let request = self
            .client
            .post(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .form(params);
        let target = url.to_string();

        tracing::debug!("Making upstream request to: {}", target);

        let mut task = tokio::spawn(send(request, target));

        tokio::select! {
            joined = &mut task => match joined {
                Ok(result) => result,
                Err(e) => Err(BotError::Internal {
                    message: format!("upstream task failed: {}", e),
                }),
            },
            _ = tokio::time::sleep(timeout) => {
                task.abort();
                // drain the cancelled task
                let _ = task.await;
                tracing::warn!("⏱️ Upstream request to {} timed out ({:?})", url, timeout);
                Err(BotError::Timeout(timeout))
            }
        }
    }
}

async fn send(request: RequestBuilder, target: String) -> Result<Vec<u8>> {
    let response = request.send().await?;
    let status = response.status();
    tracing::debug!("Upstream response status: {} ({})", status, target);

    if status != StatusCode::OK {
        return Err(BotError::UpstreamStatus {
            status: status.as_u16(),
            url: target,
        });
    }

    let body = response.bytes().await?;
    tracing::debug!("Read {} bytes from {}", body.len(), target);
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_execute_posts_form_with_client_headers() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/tr.json/getLangs")
                    .header("content-type", FORM_CONTENT_TYPE)
                    .header("user-agent", USER_AGENT_VALUE)
                    .body_contains("key=secret");
                then.status(200).body(r#"{"dirs":["en-ru"]}"#);
            })
            .await;

        let client = UpstreamClient::new();
        let body = client
            .execute(
                &server.url("/tr.json/getLangs"),
                &[("key", "secret")],
                Duration::from_secs(3),
            )
            .await
            .unwrap();

        api_mock.assert_async().await;
        assert_eq!(body, br#"{"dirs":["en-ru"]}"#.to_vec());
    }

    #[tokio::test]
    async fn test_non_200_is_upstream_status() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/broken");
                then.status(500);
            })
            .await;

        let err = UpstreamClient::new()
            .execute(&server.url("/broken"), &[], Duration::from_secs(3))
            .await
            .unwrap_err();

        api_mock.assert_async().await;
        assert!(matches!(err, BotError::UpstreamStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_created_is_still_upstream_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/created");
                then.status(201).body("{}");
            })
            .await;

        let err = UpstreamClient::new()
            .execute(&server.url("/created"), &[], Duration::from_secs(3))
            .await
            .unwrap_err();

        assert!(matches!(err, BotError::UpstreamStatus { status: 201, .. }));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/slow");
                then.status(200)
                    .body("[]")
                    .delay(Duration::from_secs(3));
            })
            .await;

        let started = Instant::now();
        let err = UpstreamClient::new()
            .execute(&server.url("/slow"), &[], Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(matches!(err, BotError::Timeout(t) if t == Duration::from_millis(200)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let err = UpstreamClient::new()
            .execute("http://127.0.0.1:1/closed", &[], Duration::from_secs(3))
            .await
            .unwrap_err();

        assert!(matches!(err, BotError::Transport(_)));
        assert!(err.is_retryable());
    }
}
