use crate::error::{FetchError, Result, ScanError};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "sitegraph/0.1 (+https://github.com/sitegraph/sitegraph)";

/// A successfully retrieved document.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Address after redirects.
    pub final_url: Url,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub body: String,
    pub response_time: Duration,
}

impl FetchedPage {
    /// Pages without a content type are assumed to be HTML.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_ref()
            .map(|ct| ct.contains("text/html") || ct.contains("application/xhtml"))
            .unwrap_or(true)
    }
}

/// Retrieves one document. Failures are values, never panics.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> impl Future<Output = std::result::Result<FetchedPage, FetchError>> + Send;
}

/// Options passed through to the HTTP client unchanged.
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    pub user_agent: Option<String>,
    pub proxy: Option<String>,
    pub headers: Vec<(String, String)>,
}

/// reqwest-backed fetcher. Non-2xx responses count as failures.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_options(&HttpOptions::default())
    }

    pub fn with_options(options: &HttpOptions) -> Result<Self> {
        let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);

        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ScanError::InvalidConfig(format!("header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ScanError::InvalidConfig(format!("header value '{}': {}", value, e)))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(proxy) = &options.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| ScanError::InvalidConfig(format!("proxy '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> std::result::Result<FetchedPage, FetchError> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url.clone()).timeout(timeout).send().await?;
        let response = response.error_for_status()?;

        let final_url = response.url().clone();
        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await?;

        Ok(FetchedPage {
            final_url,
            status_code,
            content_type,
            body,
            response_time: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    #[tokio::test]
    async fn test_fetch_html_page() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body>hello</body></html>", "text/html; charset=utf-8"),
            )
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse(&mock_server.uri()).unwrap();
        let page = fetcher.fetch(&url, Duration::from_secs(5)).await.unwrap();

        assert_eq!(page.status_code, 200);
        assert!(page.is_html());
        assert!(page.body.contains("hello"));
    }

    #[tokio::test]
    async fn test_error_status_is_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse(&format!("{}/missing", mock_server.uri())).unwrap();
        let err = fetcher.fetch(&url, Duration::from_secs(5)).await.unwrap_err();

        assert_eq!(err, FetchError::Status(404));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse(&format!("{}/slow", mock_server.uri())).unwrap();
        let err = fetcher.fetch(&url, Duration::from_millis(50)).await.unwrap_err();

        assert_eq!(err, FetchError::Timeout);
    }

    #[tokio::test]
    async fn test_custom_headers_are_sent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("x-crawl-token", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let options = HttpOptions {
            headers: vec![("x-crawl-token".to_string(), "abc".to_string())],
            ..Default::default()
        };
        let fetcher = HttpFetcher::with_options(&options).unwrap();
        let url = Url::parse(&mock_server.uri()).unwrap();
        let page = fetcher.fetch(&url, Duration::from_secs(5)).await.unwrap();

        assert_eq!(page.body, "ok");
    }

    #[test]
    fn test_invalid_proxy_is_rejected() {
        let options = HttpOptions {
            proxy: Some("::not a proxy::".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            HttpFetcher::with_options(&options),
            Err(ScanError::InvalidConfig(_))
        ));
    }
}
