use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{RequestBuilder, Response};

use crate::error::AppError;

const MAX_ATTEMPTS: u32 = 4;
const DESKTOP_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// HTTP client shared by all adapters in a phase: one connection pool,
/// exponential backoff on 429/5xx, a flat 1 s pause on transport errors,
/// at most four attempts per request. Other 4xx are returned as-is.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    backoff_base: Duration,
}

impl HttpClient {
    /// Pool used for the Phase 1 fan-out: 30 s total / 10 s connect.
    pub fn shared() -> Result<HttpClient, AppError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Pool with a custom total timeout; Workday sessions use a short one.
    pub fn with_timeout(total: Duration) -> Result<HttpClient, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DESKTOP_UA));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/html, */*"),
        );

        let client = reqwest::Client::builder()
            .timeout(total)
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()?;

        Ok(HttpClient {
            client,
            backoff_base: Duration::from_secs(1),
        })
    }

    #[cfg(test)]
    fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Execute with retry. The builder is cloned per attempt, so streaming
    /// bodies are unsupported (none of the adapters use them).
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, AppError> {
        for attempt in 0..MAX_ATTEMPTS {
            let req = builder
                .try_clone()
                .ok_or_else(|| AppError::Internal("unclonable request body".into()))?;

            match req.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let retryable = status.as_u16() == 429 || status.is_server_error();
                    if retryable && attempt + 1 < MAX_ATTEMPTS {
                        let wait = self.backoff_base * 2u32.pow(attempt);
                        tracing::debug!(
                            "HTTP {} from {}, backing off {:?}",
                            status,
                            resp.url(),
                            wait
                        );
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(e) => {
                    if attempt + 1 < MAX_ATTEMPTS {
                        tokio::time::sleep(self.backoff_base).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
        unreachable!("retry loop always returns")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client() -> HttpClient {
        HttpClient::shared()
            .unwrap()
            .with_backoff_base(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn retries_429_then_succeeds() {
        let server = MockServer::start().await;
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        Mock::given(method("GET"))
            .respond_with(move |_: &wiremock::Request| {
                if hits_clone.fetch_add(1, Ordering::SeqCst) < 2 {
                    ResponseTemplate::new(429)
                } else {
                    ResponseTemplate::new(200).set_body_string("ok")
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let c = client();
        let resp = c.send(c.get(&server.uri())).await.unwrap();
        assert_eq!(resp.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn gives_up_after_four_attempts_on_5xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(4)
            .mount(&server)
            .await;

        let c = client();
        let resp = c.send(c.get(&server.uri())).await.unwrap();
        assert_eq!(resp.status().as_u16(), 503);
    }

    #[tokio::test]
    async fn does_not_retry_plain_4xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let c = client();
        let resp = c
            .send(c.get(&format!("{}/missing", server.uri())))
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 404);
    }
}
