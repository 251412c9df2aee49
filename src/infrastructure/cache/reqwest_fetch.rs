use crate::infrastructure::cache::interceptor::{
    HttpFetch, HttpMethod, HttpRequest, HttpResponse, ResponseOrigin,
};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

/// Plain reqwest transport for the interceptor. Responses from outside the
/// app origin are reported opaque, mirroring how the browser would
/// classify them for a no-cors asset fetch.
pub struct ReqwestFetch {
    http: reqwest::Client,
    app_origin: String,
}

impl ReqwestFetch {
    pub fn new(app_origin: &str, timeout_secs: u64) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|err| AppError::ConfigurationError(err.to_string()))?;

        Ok(Self {
            http,
            app_origin: app_origin.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetch {
    async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        };

        let response = self.http.request(method, &request.url).send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let origin = if request.url.starts_with(&self.app_origin) {
            ResponseOrigin::Basic
        } else {
            ResponseOrigin::Opaque
        };
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            origin,
            headers,
            body,
        })
    }
}
