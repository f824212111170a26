// Cache-first HTTP fetcher.
// Every successful response is persisted, so a rerun replays from disk.

use std::collections::BTreeMap;

use reqwest::{Client, Method, Response, header::CONTENT_TYPE};
use tracing::{debug, error, info, warn};

use crate::cache::CacheStore;
use crate::config::RetryPolicy;
use crate::error::{CatalogError, Result};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// One logical request, as seen by the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: Method,
    pub url: String,
    /// Sorted so the fingerprint does not depend on insertion order.
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// POST with an url-encoded form body.
    pub fn post_form(url: impl Into<String>, body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.as_str().to_string(), FORM_CONTENT_TYPE.to_string());
        Self {
            method: Method::POST,
            url: url.into(),
            headers,
            body: Some(body.into()),
        }
    }

    /// Fingerprint: `"<METHOD> <url> <headers-json> <body>"`, empty parts left blank.
    pub fn cache_key(&self) -> Result<String> {
        let headers = if self.headers.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&self.headers)?
        };
        Ok(format!(
            "{} {} {} {}",
            self.method.as_str(),
            self.url,
            headers,
            self.body.as_deref().unwrap_or("")
        ))
    }
}

/// Whether a fetch may be answered from the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMode {
    #[default]
    CacheFirst,
    /// Always go to the network and replace the cached entry.
    Refresh,
}

/// Response text and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub text: String,
    pub from_cache: bool,
}

/// HTTP client with a cache in front and linear-backoff retries behind.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    cache: CacheStore,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(cache: CacheStore, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("bannerweb-fetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CatalogError::Http)?;

        Ok(Self {
            client,
            cache,
            retry,
        })
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Fetch the body of `request`, from cache when possible.
    pub async fn fetch_text(&self, request: &FetchRequest) -> Result<String> {
        Ok(self.fetch(request, FetchMode::CacheFirst).await?.text)
    }

    /// Fetch `request` under the given cache mode.
    pub async fn fetch(&self, request: &FetchRequest, mode: FetchMode) -> Result<Fetched> {
        self.cache.ensure_root()?;
        let key = request.cache_key()?;

        if mode == FetchMode::CacheFirst {
            if let Some(text) = self.cache.load(&key)? {
                debug!(method = %request.method, url = %request.url, "cache hit");
                return Ok(Fetched {
                    text,
                    from_cache: true,
                });
            }
        }

        info!("{} {}", request.method, request.url);
        let text = self.send_with_retry(request).await?;
        self.cache.save(&key, &text)?;

        Ok(Fetched {
            text,
            from_cache: false,
        })
    }

    async fn send_with_retry(&self, request: &FetchRequest) -> Result<String> {
        with_retries(&self.retry, &request.url, || self.send_once(request)).await
    }

    async fn send_once(&self, request: &FetchRequest) -> Result<String> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let response = check_response(response)?;
        Ok(response.text().await?)
    }
}

/// Run `attempt_once` until it succeeds or the policy runs out of attempts.
///
/// Sleeps `n × backoff_unit` after the n-th failure. The final failure is
/// wrapped in [`CatalogError::RetriesExhausted`].
async fn with_retries<T, F, Fut>(policy: &RetryPolicy, url: &str, mut attempt_once: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match attempt_once().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(
                    url,
                    attempt,
                    "{}; will retry in {} seconds",
                    err,
                    delay.as_secs_f32()
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                error!(url, attempts = attempt, "{}", err);
                return Err(CatalogError::RetriesExhausted {
                    url: url.to_string(),
                    attempts: attempt,
                    last: Box::new(err),
                });
            }
        }
    }
}

/// Reject anything outside the 2xx range.
fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CatalogError::Status {
            url: response.url().to_string(),
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::time::Instant;

    fn failure() -> CatalogError {
        CatalogError::Status {
            url: "https://example.edu/down".to_string(),
            status: 503,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_is_linear_between_attempts() {
        let policy = RetryPolicy {
            max_attempts: 10,
            backoff_unit: Duration::from_secs(2),
        };
        let start = Instant::now();
        let mut offsets = Vec::new();

        let result: Result<()> = with_retries(&policy, "https://example.edu/down", || {
            offsets.push(start.elapsed().as_secs());
            async { Err(failure()) }
        })
        .await;

        // 2 + 4 + ... + 18 seconds of sleep across nine gaps.
        assert_eq!(start.elapsed(), Duration::from_secs(90));
        assert_eq!(offsets, vec![0, 2, 6, 12, 20, 30, 42, 56, 72, 90]);
        match result {
            Err(CatalogError::RetriesExhausted { attempts, last, .. }) => {
                assert_eq!(attempts, 10);
                assert!(matches!(*last, CatalogError::Status { status: 503, .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_stops_retrying() {
        let policy = RetryPolicy {
            max_attempts: 10,
            backoff_unit: Duration::from_secs(2),
        };
        let start = Instant::now();
        let mut calls = 0;

        let text = with_retries(&policy, "https://example.edu/flaky", || {
            calls += 1;
            let outcome = if calls < 3 {
                Err(failure())
            } else {
                Ok("ok".to_string())
            };
            async move { outcome }
        })
        .await
        .unwrap();

        assert_eq!(text, "ok");
        assert_eq!(calls, 3);
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[test]
    fn test_cache_key_format() {
        let get = FetchRequest::get("https://example.edu/terms");
        assert_eq!(get.cache_key().unwrap(), "GET https://example.edu/terms  ");

        let post = FetchRequest::post_form("https://example.edu/subjects", "p_term=202402");
        assert_eq!(
            post.cache_key().unwrap(),
            "POST https://example.edu/subjects \
             {\"content-type\":\"application/x-www-form-urlencoded\"} p_term=202402"
        );
    }

    #[test]
    fn test_cache_key_sensitivity() {
        let base = FetchRequest::post_form("https://example.edu/a", "x=1");
        let base_key = base.cache_key().unwrap();

        let mut method = base.clone();
        method.method = Method::PUT;

        let mut target = base.clone();
        target.url = "https://example.edu/b".to_string();

        let mut headers = base.clone();
        headers
            .headers
            .insert("accept".to_string(), "text/html".to_string());

        let mut body = base.clone();
        body.body = Some("x=2".to_string());

        for variant in [method, target, headers, body] {
            assert_ne!(variant.cache_key().unwrap(), base_key);
        }
    }

    #[test]
    fn test_header_order_is_canonical() {
        let mut a = FetchRequest::get("https://example.edu/");
        a.headers.insert("b".to_string(), "2".to_string());
        a.headers.insert("a".to_string(), "1".to_string());

        let mut b = FetchRequest::get("https://example.edu/");
        b.headers.insert("a".to_string(), "1".to_string());
        b.headers.insert("b".to_string(), "2".to_string());

        assert_eq!(a.cache_key().unwrap(), b.cache_key().unwrap());
    }
}
