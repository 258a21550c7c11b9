//! Image acquisition: turn image references into embeddable `data:` URLs.
//!
//! Each image is tried through proxies, then a direct request, then a
//! decode-and-re-encode pass. An image that survives none of them is
//! dropped; the rest keep their relative order.

use crate::config::ImportConfig;
use crate::fetchers::{fetch_first, HttpClient, HttpResponse, Route};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use log::{debug, warn};
use std::time::Duration;
use url::Url;

/// Result of acquiring one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// `data:<mime>;base64,<payload>`
    Embedded(String),
    Dropped { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Proxy,
    Direct,
    Transcode,
}

const METHODS: [Method; 3] = [Method::Proxy, Method::Direct, Method::Transcode];

pub struct ImageAcquirer<'a> {
    client: &'a dyn HttpClient,
    proxies: &'a [String],
    max_images: usize,
    transcode_timeout: Duration,
    jpeg_quality: u8,
}

impl<'a> ImageAcquirer<'a> {
    pub fn new(client: &'a dyn HttpClient, config: &'a ImportConfig) -> Self {
        Self {
            client,
            proxies: &config.proxies,
            max_images: config.max_images,
            transcode_timeout: config.transcode_timeout(),
            jpeg_quality: config.jpeg_quality.clamp(1, 100),
        }
    }

    /// Acquire up to `max_images` references, one after another.
    ///
    /// Returns only the embedded payloads, in input order.
    pub async fn acquire_all(&self, references: &[String], base: Option<&str>) -> Vec<String> {
        let mut embedded = Vec::new();
        for reference in references.iter().take(self.max_images) {
            match self.acquire(reference, base).await {
                ImageOutcome::Embedded(payload) => embedded.push(payload),
                ImageOutcome::Dropped { reason } => {
                    warn!("Dropping image {}: {}", reference, reason);
                }
            }
        }
        if references.len() > self.max_images {
            debug!(
                "Ignored {} images beyond the limit of {}",
                references.len() - self.max_images,
                self.max_images
            );
        }
        embedded
    }

    pub async fn acquire(&self, reference: &str, base: Option<&str>) -> ImageOutcome {
        let url = make_absolute_url(reference.trim(), base);
        if url.starts_with("data:") {
            return ImageOutcome::Embedded(url);
        }
        if Url::parse(&url).is_err() {
            return ImageOutcome::Dropped {
                reason: "relative reference with no base URL".to_string(),
            };
        }

        for method in METHODS {
            if let Some(payload) = self.try_method(method, &url).await {
                debug!("Embedded {} via {:?}", url, method);
                return ImageOutcome::Embedded(payload);
            }
            debug!("Image method {:?} failed for {}", method, url);
        }

        ImageOutcome::Dropped {
            reason: "all download methods failed".to_string(),
        }
    }

    async fn try_method(&self, method: Method, url: &str) -> Option<String> {
        match method {
            Method::Proxy => {
                let routes = Route::chain(self.proxies, false);
                let response = fetch_first(self.client, &routes, url).await.ok()?;
                embeddable(&response)
            }
            Method::Direct => {
                let response = fetch_first(self.client, &[Route::Direct], url).await.ok()?;
                embeddable(&response)
            }
            Method::Transcode => self.via_transcode(url).await,
        }
    }

    /// Load the image, decode it and re-encode as JPEG. Resolves to `None`
    /// on timeout or decode failure.
    async fn via_transcode(&self, url: &str) -> Option<String> {
        let quality = self.jpeg_quality;
        let attempt = async {
            let response = self.client.get(url).await.ok()?;
            if !response.is_success() {
                return None;
            }
            let bytes = response.body;
            let jpeg = tokio::task::spawn_blocking(move || transcode_to_jpeg(&bytes, quality))
                .await
                .ok()?;
            match jpeg {
                Ok(jpeg) => Some(to_data_url(&jpeg, Some("image/jpeg"))),
                Err(e) => {
                    debug!("Could not decode {}: {}", url, e);
                    None
                }
            }
        };

        match tokio::time::timeout(self.transcode_timeout, attempt).await {
            Ok(result) => result,
            Err(_) => {
                debug!("Transcode of {} timed out", url);
                None
            }
        }
    }
}

/// A response usable as image data: non-empty, and not a text page
/// unless the bytes are recognisably an image.
fn embeddable(response: &HttpResponse) -> Option<String> {
    if response.body.is_empty() {
        return None;
    }
    let mime = response.content_type.as_deref().map(mime_essence);
    let is_text = mime.map(|m| m.starts_with("text/")).unwrap_or(false);
    if is_text && image::guess_format(&response.body).is_err() {
        return None;
    }
    Some(to_data_url(&response.body, response.content_type.as_deref()))
}

fn mime_essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or("").trim()
}

/// Encode bytes as a `data:` URL. The MIME type comes from `content_type`,
/// else from sniffing the bytes.
pub fn to_data_url(bytes: &[u8], content_type: Option<&str>) -> String {
    let mime = content_type
        .map(mime_essence)
        .filter(|m| !m.is_empty() && !m.starts_with("text/"))
        .map(str::to_string)
        .or_else(|| {
            image::guess_format(bytes)
                .ok()
                .map(|format| format.to_mime_type().to_string())
        })
        .unwrap_or_else(|| "application/octet-stream".to_string());
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Decode any supported format and re-encode as JPEG, dropping alpha.
pub fn transcode_to_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = decoded.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality).encode_image(&rgb)?;
    Ok(out)
}

/// Resolve an image reference to something fetchable.
///
/// Absolute http(s) and `data:` references pass through; protocol-relative
/// ones get `https:`; relative ones are joined onto `base` when given and
/// returned unchanged otherwise.
pub fn make_absolute_url(reference: &str, base: Option<&str>) -> String {
    if reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("data:")
    {
        return reference.to_string();
    }
    if reference.starts_with("//") {
        return format!("https:{reference}");
    }
    if let Some(base) = base {
        match Url::parse(base).and_then(|base| base.join(reference)) {
            Ok(joined) => return joined.to_string(),
            Err(e) => warn!("Failed to resolve {} against {}: {}", reference, base, e),
        }
    }
    reference.to_string()
}
