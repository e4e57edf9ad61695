//! Turning a [`MediaSource`] into decoded pixels.
//!
//! Resolution is an ordered list of strategies tried one after another:
//! session cache, inline data, direct fetch, each CORS proxy mirror, and a
//! binary fetch that is re-inlined as a data URL. The first success wins;
//! when every stage fails the last failure is reported.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use image::RgbaImage;
use parking_lot::Mutex;
use thiserror::Error;

use crate::config::ExportConfig;
use crate::element::MediaSource;
use crate::element::media::{parse_data_url, to_data_url};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Timed out loading {0}")]
    Timeout(String),

    #[error("Not applicable: {0}")]
    Unsupported(String),

    #[error("All methods failed to load image: {0}")]
    Exhausted(Box<ResourceError>),
}

pub type ResourceResult<T> = Result<T, ResourceError>;

pub type DecodedImage = Arc<RgbaImage>;

/// Decode encoded image bytes (PNG, JPEG, …) into RGBA pixels
pub fn decode_image(bytes: &[u8]) -> ResourceResult<DecodedImage> {
    image::load_from_memory(bytes)
        .map(|img| Arc::new(img.to_rgba8()))
        .map_err(|e| ResourceError::Decode(e.to_string()))
}

/// Run `attempts` in order and return the first success.
///
/// Each attempt is only polled after the previous one failed. With no
/// successes the last failure is wrapped in [`ResourceError::Exhausted`].
pub async fn first_success<'a, T>(
    attempts: impl IntoIterator<Item = BoxFuture<'a, ResourceResult<T>>>,
) -> ResourceResult<T> {
    let mut last = ResourceError::Unsupported("no strategies".to_owned());
    for attempt in attempts {
        match attempt.await {
            Ok(value) => return Ok(value),
            Err(err) => {
                log::debug!("resolve attempt failed: {}", err);
                last = err;
            }
        }
    }
    Err(ResourceError::Exhausted(Box::new(last)))
}

/// Network access for the fetch stages
pub trait Fetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ResourceResult<Vec<u8>>>;
}

/// One way of producing pixels for a source
pub trait ResolveStrategy: Send + Sync {
    fn name(&self) -> String;
    fn resolve<'a>(&'a self, source: &'a MediaSource) -> BoxFuture<'a, ResourceResult<DecodedImage>>;
}

/// Decoded images of this session keyed by `cached_image_{url}`
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    images: Arc<Mutex<HashMap<String, DecodedImage>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(url: &str) -> String {
        format!("cached_image_{url}")
    }

    pub fn get(&self, url: &str) -> Option<DecodedImage> {
        self.images.lock().get(&Self::key(url)).cloned()
    }

    pub fn insert(&self, url: &str, image: DecodedImage) {
        self.images.lock().insert(Self::key(url), image);
    }

    pub fn len(&self) -> usize {
        self.images.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.lock().is_empty()
    }
}

fn remote_url(source: &MediaSource) -> Option<&str> {
    match source {
        MediaSource::Url { url } if !url.starts_with("data:") => Some(url.as_str()),
        _ => None,
    }
}

impl ResolveStrategy for SessionCache {
    fn name(&self) -> String {
        "session cache".to_owned()
    }

    fn resolve<'a>(&'a self, source: &'a MediaSource) -> BoxFuture<'a, ResourceResult<DecodedImage>> {
        Box::pin(async move {
            let url = remote_url(source).ok_or_else(|| ResourceError::Unsupported("not a url".to_owned()))?;
            self.get(url)
                .ok_or_else(|| ResourceError::Unsupported(format!("{url} not cached")))
        })
    }
}

/// Bytes carried by the document itself: inline uploads and `data:` URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineData;

impl ResolveStrategy for InlineData {
    fn name(&self) -> String {
        "inline data".to_owned()
    }

    fn resolve<'a>(&'a self, source: &'a MediaSource) -> BoxFuture<'a, ResourceResult<DecodedImage>> {
        Box::pin(async move {
            match source {
                MediaSource::Inline { data, .. } => decode_image(data),
                MediaSource::Url { url } if url.starts_with("data:") => {
                    let (_, bytes) =
                        parse_data_url(url).ok_or_else(|| ResourceError::Decode("malformed data url".to_owned()))?;
                    decode_image(&bytes)
                }
                MediaSource::Url { .. } => Err(ResourceError::Unsupported("remote url".to_owned())),
            }
        })
    }
}

/// Fetch the URL as-is
pub struct DirectFetch {
    fetcher: Arc<dyn Fetcher>,
}

impl DirectFetch {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

impl ResolveStrategy for DirectFetch {
    fn name(&self) -> String {
        "direct".to_owned()
    }

    fn resolve<'a>(&'a self, source: &'a MediaSource) -> BoxFuture<'a, ResourceResult<DecodedImage>> {
        Box::pin(async move {
            let url = remote_url(source).ok_or_else(|| ResourceError::Unsupported("not a url".to_owned()))?;
            let bytes = self.fetcher.fetch(url).await?;
            decode_image(&bytes)
        })
    }
}

/// Fetch through a CORS proxy mirror.
///
/// In the template `{url}` is replaced by the raw URL and `{enc}` by its
/// percent-encoded form.
pub struct ProxyFetch {
    template: String,
    fetcher: Arc<dyn Fetcher>,
}

impl ProxyFetch {
    pub fn new(template: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            template: template.into(),
            fetcher,
        }
    }

    pub fn proxied_url(&self, url: &str) -> String {
        self.template
            .replace("{enc}", &urlencoding::encode(url))
            .replace("{url}", url)
    }
}

impl ResolveStrategy for ProxyFetch {
    fn name(&self) -> String {
        format!("proxy {}", self.template)
    }

    fn resolve<'a>(&'a self, source: &'a MediaSource) -> BoxFuture<'a, ResourceResult<DecodedImage>> {
        Box::pin(async move {
            let url = remote_url(source).ok_or_else(|| ResourceError::Unsupported("not a url".to_owned()))?;
            let bytes = self.fetcher.fetch(&self.proxied_url(url)).await?;
            decode_image(&bytes)
        })
    }
}

/// Last resort: fetch the raw bytes, wrap them as a data URL and decode that
pub struct BinaryInline {
    fetcher: Arc<dyn Fetcher>,
}

impl BinaryInline {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

impl ResolveStrategy for BinaryInline {
    fn name(&self) -> String {
        "binary inline".to_owned()
    }

    fn resolve<'a>(&'a self, source: &'a MediaSource) -> BoxFuture<'a, ResourceResult<DecodedImage>> {
        Box::pin(async move {
            let url = remote_url(source).ok_or_else(|| ResourceError::Unsupported("not a url".to_owned()))?;
            let bytes = self.fetcher.fetch(url).await?;
            let mime = image::guess_format(&bytes)
                .map(|format| format.to_mime_type())
                .unwrap_or("application/octet-stream");
            let inlined = MediaSource::url(to_data_url(mime, &bytes));
            InlineData.resolve(&inlined).await
        })
    }
}

/// Ordered fallback chain with a shared session cache
pub struct ImageResolver {
    strategies: Vec<Box<dyn ResolveStrategy>>,
    cache: SessionCache,
}

impl std::fmt::Debug for ImageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageResolver")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl ImageResolver {
    pub fn new(strategies: Vec<Box<dyn ResolveStrategy>>, cache: SessionCache) -> Self {
        Self { strategies, cache }
    }

    /// Cache, inline data, direct fetch, every configured proxy, then binary inline
    pub fn standard(config: &ExportConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let cache = SessionCache::new();
        let mut strategies: Vec<Box<dyn ResolveStrategy>> = vec![
            Box::new(cache.clone()),
            Box::new(InlineData),
            Box::new(DirectFetch::new(fetcher.clone())),
        ];
        for template in &config.proxy_templates {
            strategies.push(Box::new(ProxyFetch::new(template.clone(), fetcher.clone())));
        }
        strategies.push(Box::new(BinaryInline::new(fetcher)));
        Self::new(strategies, cache)
    }

    /// Only the cache and inline data; nothing touches the network
    pub fn offline() -> Self {
        let cache = SessionCache::new();
        Self::new(vec![Box::new(cache.clone()), Box::new(InlineData)], cache)
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn resolve(&self, source: &MediaSource) -> ResourceResult<DecodedImage> {
        let image = first_success(self.strategies.iter().map(|s| s.resolve(source))).await?;
        if let Some(url) = remote_url(source) {
            self.cache.insert(url, image.clone());
        }
        Ok(image)
    }
}

/// Blocking HTTP fetcher with a per-request timeout
#[cfg(not(target_arch = "wasm32"))]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpFetcher {
    pub fn new(config: &ExportConfig) -> ResourceResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.load_timeout_secs))
            .build()
            .map_err(|e| ResourceError::Unsupported(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Fetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ResourceResult<Vec<u8>>> {
        Box::pin(async move {
            let fetch_error = |reason: String| ResourceError::Fetch {
                url: url.to_owned(),
                reason,
            };
            let response = self.client.get(url).send().map_err(|e| {
                if e.is_timeout() {
                    ResourceError::Timeout(url.to_owned())
                } else {
                    fetch_error(e.to_string())
                }
            })?;
            if !response.status().is_success() {
                return Err(fetch_error(format!("HTTP {}", response.status())));
            }
            response
                .bytes()
                .map(|bytes| bytes.to_vec())
                .map_err(|e| fetch_error(e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_templates_substitute_url() {
        struct Never;
        impl Fetcher for Never {
            fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ResourceResult<Vec<u8>>> {
                Box::pin(async move { Err(ResourceError::Unsupported(url.to_owned())) })
            }
        }
        let fetcher: Arc<dyn Fetcher> = Arc::new(Never);
        let plain = ProxyFetch::new("https://proxy.test/{url}", fetcher.clone());
        let encoded = ProxyFetch::new("https://proxy.test/raw?url={enc}", fetcher);
        assert_eq!(
            plain.proxied_url("https://a.test/x.png"),
            "https://proxy.test/https://a.test/x.png"
        );
        assert_eq!(
            encoded.proxied_url("https://a.test/x.png"),
            "https://proxy.test/raw?url=https%3A%2F%2Fa.test%2Fx.png"
        );
    }

    #[test]
    fn first_success_reports_last_failure() {
        let attempts: Vec<BoxFuture<'static, ResourceResult<u8>>> = vec![
            Box::pin(async { Err(ResourceError::Timeout("a".to_owned())) }),
            Box::pin(async { Err(ResourceError::Decode("b".to_owned())) }),
        ];
        let err = futures::executor::block_on(first_success(attempts)).unwrap_err();
        assert_eq!(err, ResourceError::Exhausted(Box::new(ResourceError::Decode("b".to_owned()))));

        let attempts: Vec<BoxFuture<'static, ResourceResult<u8>>> = vec![
            Box::pin(async { Err(ResourceError::Timeout("a".to_owned())) }),
            Box::pin(async { Ok(7) }),
        ];
        assert_eq!(futures::executor::block_on(first_success(attempts)), Ok(7));
    }
}
