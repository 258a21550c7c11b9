use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use std::error::Error;
use url::form_urlencoded;

mod request;

pub use request::RequestFetcher;

/// Raw response of a single GET request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(body: impl Into<Vec<u8>>, content_type: Option<&str>) -> Self {
        Self {
            status: 200,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `charset` parameter of the Content-Type header, if any.
    pub fn charset(&self) -> Option<&str> {
        self.content_type
            .as_deref()?
            .split(';')
            .skip(1)
            .find_map(|param| {
                let (key, value) = param.split_once('=')?;
                key.trim()
                    .eq_ignore_ascii_case("charset")
                    .then(|| value.trim().trim_matches('"'))
            })
    }

    /// Body decoded with the declared charset, UTF-8 when none is declared
    /// or the label is unknown. A byte order mark takes precedence.
    pub fn text(&self) -> String {
        let encoding = self
            .charset()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        let (text, _, _) = encoding.decode(&self.body);
        text.into_owned()
    }
}

/// Outbound HTTP used by the import pipeline.
///
/// A non-2xx status is returned as a response, not an error; transport
/// errors (DNS, TLS, timeout) are errors.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, Box<dyn Error + Send + Sync>>;
}

/// One way of reaching a target URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Relay through a proxy; the encoded target is appended to the prefix
    Proxy(String),
    Direct,
}

impl Route {
    /// Proxies in the given order, then a direct request.
    pub fn chain(proxies: &[String], include_direct: bool) -> Vec<Route> {
        let mut routes: Vec<Route> = proxies.iter().cloned().map(Route::Proxy).collect();
        if include_direct {
            routes.push(Route::Direct);
        }
        routes
    }

    pub fn target(&self, url: &str) -> String {
        match self {
            Route::Proxy(prefix) => format!("{prefix}{}", encode_component(url)),
            Route::Direct => url.to_string(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Route::Proxy(prefix) => prefix,
            Route::Direct => "direct",
        }
    }
}

fn encode_component(url: &str) -> String {
    form_urlencoded::byte_serialize(url.as_bytes()).collect()
}

/// Try each route once, in order, and return the first successful response.
///
/// Routes are never raced and nothing is retried. On exhaustion the number
/// of attempts is returned.
pub async fn fetch_first(
    client: &dyn HttpClient,
    routes: &[Route],
    url: &str,
) -> Result<HttpResponse, usize> {
    for route in routes {
        let target = route.target(url);
        debug!("Fetching {} via {}", url, route.label());
        match client.get(&target).await {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) => {
                warn!(
                    "Fetch of {} via {} returned status {}",
                    url,
                    route.label(),
                    response.status
                );
            }
            Err(e) => {
                warn!("Fetch of {} via {} failed: {}", url, route.label(), e);
            }
        }
    }
    Err(routes.len())
}
