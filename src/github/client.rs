use crate::config::Config;
use crate::error::{ForkScoutError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const ACCEPT_V3: &str = "application/vnd.github.v3+json";
const RATE_LIMITED: u16 = 403;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One unauthenticated GET. Status handling lives in [`ApiClient`].
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: &str) -> Result<RawResponse>;
}

/// Plain reqwest client: exactly one `User-Agent`, and no retries of its own.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| ForkScoutError::GitHub(e.to_string()))?;

        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RawResponse> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ForkScoutError::GitHub(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ForkScoutError::GitHub(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

pub struct ApiClient<T> {
    transport: T,
    api_base: String,
    rate_limit_wait: Duration,
}

impl ApiClient<HttpTransport> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.user_agent)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, config: &Config) -> Self {
        Self {
            transport,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            rate_limit_wait: config.rate_limit_wait(),
        }
    }

    /// GET `{api_base}{path}` and decode the body. A 403 is retried once after
    /// the rate-limit wait; whatever the retry returns is final.
    pub async fn fetch(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.api_base, path);
        let mut response = self.transport.get(&url).await?;

        if response.status == RATE_LIMITED {
            tracing::warn!(
                "Rate limited! Waiting {} seconds...",
                self.rate_limit_wait.as_secs()
            );
            tokio::time::sleep(self.rate_limit_wait).await;
            response = self.transport.get(&url).await?;
        }

        if !response.is_success() {
            return Err(ForkScoutError::Http {
                status: response.status,
                body: response.body,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn fetch_as<D: DeserializeOwned>(&self, path: &str) -> Result<D> {
        let value = self.fetch(path).await?;
        Ok(serde_json::from_value(value)?)
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn client(transport: ScriptedTransport) -> ApiClient<ScriptedTransport> {
        ApiClient::new(transport, &test_config())
    }

    #[tokio::test(start_paused = true)]
    async fn success_returns_parsed_body() {
        let transport = ScriptedTransport::new();
        transport.push(&api_url("/repos/a/1code"), 200, r#"{"stargazers_count": 4}"#);

        let value = client(transport).fetch("/repos/a/1code").await.unwrap();
        assert_eq!(value["stargazers_count"], 4);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_then_success_retries_once() {
        let transport = ScriptedTransport::new();
        let url = api_url("/repos/a/1code");
        transport.push(&url, 403, "rate limited");
        transport.push(&url, 200, r#"{"ok": true}"#);

        let client = client(transport);
        let started = tokio::time::Instant::now();
        let value = client.fetch("/repos/a/1code").await.unwrap();

        assert_eq!(value["ok"], true);
        assert_eq!(client.transport().requests(), vec![url.clone(), url]);
        assert!(started.elapsed() >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_twice_is_an_http_error() {
        let transport = ScriptedTransport::new();
        let url = api_url("/repos/a/1code");
        transport.push(&url, 403, "still limited");
        transport.push(&url, 403, "still limited");
        transport.push(&url, 200, "{}");

        let client = client(transport);
        let err = client.fetch("/repos/a/1code").await.unwrap_err();

        assert!(matches!(err, ForkScoutError::Http { status: 403, .. }));
        assert_eq!(client.transport().requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_is_not_retried() {
        let transport = ScriptedTransport::new();
        let url = api_url("/repos/a/1code");
        transport.push(&url, 404, "Not Found");

        let client = client(transport);
        let err = client.fetch("/repos/a/1code").await.unwrap_err();

        match err {
            ForkScoutError::Http { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "Not Found");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_body_is_a_json_error() {
        let transport = ScriptedTransport::new();
        transport.push(&api_url("/repos/a/1code"), 200, "<html>");

        let err = client(transport).fetch("/repos/a/1code").await.unwrap_err();
        assert!(matches!(err, ForkScoutError::Json(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_propagates() {
        let transport = ScriptedTransport::new();
        transport.push_failure(&api_url("/repos/a/1code"), "connection reset");

        let err = client(transport).fetch("/repos/a/1code").await.unwrap_err();
        assert!(matches!(err, ForkScoutError::GitHub(_)));
    }

    mod over_http {
        use super::*;
        use std::sync::{Arc, Mutex};
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        type Seen = Arc<Mutex<Vec<Vec<String>>>>;

        /// Local server answering every request with `status`; records each
        /// request's header lines.
        async fn serve(status: &'static str, body: &'static str) -> (String, Seen) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let seen: Seen = Arc::default();
            let log = seen.clone();

            tokio::spawn(async move {
                loop {
                    let Ok((mut socket, _)) = listener.accept().await else {
                        break;
                    };
                    let mut raw = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => raw.extend_from_slice(&buf[..n]),
                        }
                    }
                    let lines = String::from_utf8_lossy(&raw)
                        .split("\r\n")
                        .filter(|l| !l.is_empty())
                        .map(str::to_string)
                        .collect();
                    log.lock().unwrap().push(lines);

                    let reply = format!(
                        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(reply.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
            });

            (format!("http://{addr}"), seen)
        }

        fn header_lines(request: &[String], name: &str) -> Vec<String> {
            let prefix = format!("{name}:");
            request
                .iter()
                .filter(|l| l.to_ascii_lowercase().starts_with(&prefix))
                .map(|l| l.to_ascii_lowercase())
                .collect()
        }

        fn live_client(api_base: String) -> ApiClient<HttpTransport> {
            let config = Config {
                api_base,
                ..test_config()
            };
            ApiClient::from_config(&config).unwrap()
        }

        #[tokio::test]
        async fn server_error_is_sent_exactly_once() {
            let (base, seen) = serve("500 Internal Server Error", "{}").await;

            let err = live_client(base).fetch("/repos/a/1code").await.unwrap_err();

            assert!(matches!(err, ForkScoutError::Http { status: 500, .. }));
            let requests = seen.lock().unwrap().clone();
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0][0], "GET /repos/a/1code HTTP/1.1");
        }

        #[tokio::test]
        async fn sends_one_user_agent_and_the_v3_accept_header() {
            let (base, seen) = serve("200 OK", r#"{"stargazers_count": 2}"#).await;

            let value = live_client(base).fetch("/repos/a/1code").await.unwrap();

            assert_eq!(value["stargazers_count"], 2);
            let requests = seen.lock().unwrap().clone();
            assert_eq!(requests.len(), 1);
            assert_eq!(
                header_lines(&requests[0], "user-agent"),
                vec!["user-agent: fork-scout"]
            );
            assert_eq!(
                header_lines(&requests[0], "accept"),
                vec![format!("accept: {ACCEPT_V3}")]
            );
            assert!(header_lines(&requests[0], "authorization").is_empty());
        }
    }
}
