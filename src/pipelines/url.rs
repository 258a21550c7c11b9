use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::extractors::{extract_candidate, ParsingContext};
use crate::fetchers::{fetch_first, HttpClient, Route};
use crate::images::ImageAcquirer;
use crate::model::{clean_recipe_data, timestamp_now, ExtractionCandidate, RecipeDraft};
use log::{debug, info};
use url::Url;

/// Import the recipe published at `locator`.
///
/// This pipeline:
/// 1. Rejects anything that is not an absolute http(s) URL, before any request
/// 2. Fetches the page through the configured proxies, then directly
/// 3. Runs the extraction strategies (json_ld, microdata, open_graph, html_class)
/// 4. Cleans the winning candidate into a draft
/// 5. Embeds the draft's images, unless image fetching is disabled
pub async fn process(
    client: &dyn HttpClient,
    config: &ImportConfig,
    locator: &str,
) -> Result<RecipeDraft, ImportError> {
    let url = validate_locator(locator)?;
    let locator = url.as_str();

    let html = fetch_document(client, config, locator).await?;

    let candidate = extract_from_html(locator, &html)
        .ok_or_else(|| ImportError::NoRecipeFound(locator.to_string()))?;

    let mut draft = clean_recipe_data(candidate, locator, &timestamp_now());

    if config.fetch_images {
        let acquirer = ImageAcquirer::new(client, config);
        draft.images = acquirer.acquire_all(&draft.images, Some(locator)).await;
    }

    info!(
        "Imported \"{}\" from {} ({} images)",
        draft.title,
        locator,
        draft.images.len()
    );
    Ok(draft)
}

/// Parse `locator` as an absolute http or https URL.
pub fn validate_locator(locator: &str) -> Result<Url, ImportError> {
    let url = Url::parse(locator.trim())
        .map_err(|_| ImportError::InvalidLocator(locator.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ImportError::InvalidLocator(locator.to_string())),
    }
}

/// Page body from the first transport that answers with a 2xx status.
pub async fn fetch_document(
    client: &dyn HttpClient,
    config: &ImportConfig,
    url: &str,
) -> Result<String, ImportError> {
    let routes = Route::chain(&config.proxies, true);
    let response = fetch_first(client, &routes, url)
        .await
        .map_err(|attempts| ImportError::FetchFailure {
            url: url.to_string(),
            attempts,
        })?;
    debug!("Fetched {} bytes from {}", response.body.len(), url);
    Ok(response.text())
}

/// Run the strategies over a fetched page.
///
/// The parsed document is not `Send`, so it lives only inside this call.
pub fn extract_from_html(url: &str, html: &str) -> Option<ExtractionCandidate> {
    let context = ParsingContext::new(url, html);
    let (strategy, candidate) = extract_candidate(&context)?;
    debug!("Strategy {} matched {}", strategy, url);
    Some(candidate)
}
