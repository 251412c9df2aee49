pub mod http_cache;
pub mod interceptor;
pub mod reqwest_fetch;

pub use http_cache::{CachedHttpEntry, HttpCache};
pub use interceptor::{
    CacheInterceptor, HttpFetch, HttpMethod, HttpRequest, HttpResponse, ResourceClass,
    ResponseOrigin,
};
pub use reqwest_fetch::ReqwestFetch;
