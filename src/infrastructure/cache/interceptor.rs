use crate::infrastructure::cache::http_cache::{CachedHttpEntry, HttpCache};
use crate::shared::config::{
    API_RESPONSES_PARTITION, IMAGES_PARTITION, PAGES_PARTITION, STATIC_RESOURCES_PARTITION,
};
use crate::shared::error::AppError;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn is_get(&self) -> bool {
        matches!(self, HttpMethod::Get)
    }
}

/// What kind of resource a request is after: drives the partition choice
/// on the cache-first path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    Style,
    Script,
    Font,
    Image,
    Navigation,
    Other,
}

/// How the browser would classify the response origin: `Basic` is a
/// same-origin, non-redirected response; everything opaque or
/// cross-origin must never enter the cache on the cache-first path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOrigin {
    Basic,
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub resource_class: ResourceClass,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, resource_class: ResourceClass) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            resource_class,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub origin: ResponseOrigin,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The transport underneath the interceptor.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, AppError>;
}

/// Request router at the network boundary: decides, per GET request,
/// whether the local cache, the network, or a network-then-cache fallback
/// serves it, and maintains the partitions as responses flow through.
pub struct CacheInterceptor {
    cache: Arc<HttpCache>,
    fetch: Arc<dyn HttpFetch>,
    api_base_url: String,
}

impl CacheInterceptor {
    pub fn new(cache: Arc<HttpCache>, fetch: Arc<dyn HttpFetch>, api_base_url: &str) -> Self {
        Self {
            cache,
            fetch,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn expected_partitions() -> [&'static str; 4] {
        [
            STATIC_RESOURCES_PARTITION,
            IMAGES_PARTITION,
            API_RESPONSES_PARTITION,
            PAGES_PARTITION,
        ]
    }

    /// Activation-time cleanup of partitions left behind by older builds.
    pub async fn activate(&self) -> Vec<String> {
        self.cache.activate(&Self::expected_partitions()).await
    }

    pub async fn handle(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        // Writes are never intercepted.
        if !request.method.is_get() {
            return self.fetch.fetch(request).await;
        }

        if request.url.starts_with(&self.api_base_url) {
            self.network_first(request).await
        } else {
            self.cache_first(request).await
        }
    }

    async fn network_first(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        match self.fetch.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.cache
                        .store(
                            API_RESPONSES_PARTITION,
                            request.url.clone(),
                            entry_from_response(&response),
                        )
                        .await;
                }
                Ok(response)
            }
            Err(err) if err.is_connectivity() => {
                match self.cache.lookup(API_RESPONSES_PARTITION, &request.url).await {
                    Some(entry) => {
                        debug!("Serving cached API response for {}", request.url);
                        Ok(response_from_entry(entry))
                    }
                    None => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    async fn cache_first(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        let partition = partition_for(request.resource_class);

        if let Some(entry) = self.cache.lookup(partition, &request.url).await {
            return Ok(response_from_entry(entry));
        }

        let response = self.fetch.fetch(request).await?;
        if response.status == 200 && response.origin == ResponseOrigin::Basic {
            self.cache
                .store(partition, request.url.clone(), entry_from_response(&response))
                .await;
        }
        Ok(response)
    }
}

fn partition_for(class: ResourceClass) -> &'static str {
    match class {
        ResourceClass::Image => IMAGES_PARTITION,
        ResourceClass::Navigation => PAGES_PARTITION,
        ResourceClass::Style | ResourceClass::Script | ResourceClass::Font
        | ResourceClass::Other => STATIC_RESOURCES_PARTITION,
    }
}

fn entry_from_response(response: &HttpResponse) -> CachedHttpEntry {
    CachedHttpEntry::new(
        response.status,
        response.headers.clone(),
        response.body.clone(),
    )
}

fn response_from_entry(entry: CachedHttpEntry) -> HttpResponse {
    HttpResponse {
        status: entry.status,
        // Only basic responses are ever stored, so a replayed entry is
        // basic by construction.
        origin: ResponseOrigin::Basic,
        headers: entry.headers,
        body: entry.body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::AppConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// Scripted fetcher: pops the next canned outcome per call.
    struct ScriptedFetch {
        outcomes: Mutex<Vec<Result<HttpResponse, AppError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetch {
        fn new(outcomes: Vec<Result<HttpResponse, AppError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpFetch for ScriptedFetch {
        async fn fetch(&self, _request: &HttpRequest) -> Result<HttpResponse, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut outcomes = self.outcomes.lock().await;
            if outcomes.is_empty() {
                return Err(AppError::Network("no scripted outcome left".to_string()));
            }
            outcomes.remove(0)
        }
    }

    fn basic_response(status: u16, body: &'static str) -> HttpResponse {
        HttpResponse {
            status,
            origin: ResponseOrigin::Basic,
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    fn opaque_response(body: &'static str) -> HttpResponse {
        HttpResponse {
            origin: ResponseOrigin::Opaque,
            ..basic_response(200, body)
        }
    }

    fn interceptor(fetch: Arc<ScriptedFetch>) -> (CacheInterceptor, Arc<HttpCache>) {
        let cache = Arc::new(HttpCache::new(&AppConfig::default().cache.partitions));
        let interceptor = CacheInterceptor::new(
            cache.clone(),
            fetch,
            "https://story-api.dicoding.dev/v1",
        );
        (interceptor, cache)
    }

    const API_URL: &str = "https://story-api.dicoding.dev/v1/stories?page=1&size=9&location=1";

    #[tokio::test]
    async fn non_get_requests_pass_straight_through() {
        let fetch = ScriptedFetch::new(vec![Ok(basic_response(201, "created"))]);
        let (interceptor, cache) = interceptor(fetch.clone());

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: API_URL.to_string(),
            resource_class: ResourceClass::Other,
        };
        let response = interceptor.handle(&request).await.unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(cache.entry_count(API_RESPONSES_PARTITION).await, 0);
    }

    #[tokio::test]
    async fn api_requests_are_network_first_with_cache_fallback() {
        let fetch = ScriptedFetch::new(vec![
            Ok(basic_response(200, "fresh listing")),
            Err(AppError::Network("connection reset".to_string())),
        ]);
        let (interceptor, _) = interceptor(fetch.clone());
        let request = HttpRequest::get(API_URL, ResourceClass::Other);

        let first = interceptor.handle(&request).await.unwrap();
        assert_eq!(first.body, Bytes::from_static(b"fresh listing"));

        // Network gone: the previously stored clone serves the request.
        let second = interceptor.handle(&request).await.unwrap();
        assert_eq!(second.body, Bytes::from_static(b"fresh listing"));
        assert_eq!(fetch.call_count(), 2);
    }

    #[tokio::test]
    async fn api_fallback_without_cache_fails() {
        let fetch = ScriptedFetch::new(vec![Err(AppError::Network("offline".to_string()))]);
        let (interceptor, _) = interceptor(fetch);
        let request = HttpRequest::get(API_URL, ResourceClass::Other);

        assert!(interceptor.handle(&request).await.is_err());
    }

    #[tokio::test]
    async fn static_assets_are_cache_first() {
        let fetch = ScriptedFetch::new(vec![Ok(basic_response(200, "body { }"))]);
        let (interceptor, _) = interceptor(fetch.clone());
        let request = HttpRequest::get("https://app.cerita.dev/styles.css", ResourceClass::Style);

        interceptor.handle(&request).await.unwrap();
        interceptor.handle(&request).await.unwrap();

        // Second hit came from the cache.
        assert_eq!(fetch.call_count(), 1);
    }

    #[tokio::test]
    async fn non_200_and_opaque_responses_are_never_stored() {
        let fetch = ScriptedFetch::new(vec![
            Ok(basic_response(404, "missing")),
            Ok(opaque_response("cdn font")),
        ]);
        let (interceptor, cache) = interceptor(fetch);

        let missing =
            HttpRequest::get("https://app.cerita.dev/nope.css", ResourceClass::Style);
        assert_eq!(interceptor.handle(&missing).await.unwrap().status, 404);

        let font = HttpRequest::get("https://fonts.cdn.example/a.woff2", ResourceClass::Font);
        interceptor.handle(&font).await.unwrap();

        assert_eq!(cache.entry_count(STATIC_RESOURCES_PARTITION).await, 0);
    }

    #[tokio::test]
    async fn images_and_pages_use_their_own_partitions() {
        let fetch = ScriptedFetch::new(vec![
            Ok(basic_response(200, "img")),
            Ok(basic_response(200, "<html>")),
        ]);
        let (interceptor, cache) = interceptor(fetch);

        interceptor
            .handle(&HttpRequest::get(
                "https://app.cerita.dev/images/logo.png",
                ResourceClass::Image,
            ))
            .await
            .unwrap();
        interceptor
            .handle(&HttpRequest::get(
                "https://app.cerita.dev/",
                ResourceClass::Navigation,
            ))
            .await
            .unwrap();

        assert_eq!(cache.entry_count(IMAGES_PARTITION).await, 1);
        assert_eq!(cache.entry_count(PAGES_PARTITION).await, 1);
        assert_eq!(cache.entry_count(STATIC_RESOURCES_PARTITION).await, 0);
    }
}
