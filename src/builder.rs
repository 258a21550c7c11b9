use std::sync::Arc;
use std::time::Duration;

use crate::config::ImportConfig;
use crate::fetchers::{HttpClient, RequestFetcher};
use crate::model::RecipeDraft;
use crate::pipelines;
use crate::ImportError;

/// Imports recipes from web pages.
///
/// Holds the configuration and the HTTP client shared by every import.
/// Use [`RecipeImporter::builder()`] to construct one.
pub struct RecipeImporter {
    config: ImportConfig,
    request_timeout: Duration,
    client: Arc<dyn HttpClient>,
}

impl RecipeImporter {
    /// Create a new builder for configuring an importer
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Timeout applied to each request by the default HTTP client
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Fetch the page at `url` and extract a cleaned recipe from it.
    ///
    /// # Errors
    /// * [`ImportError::InvalidLocator`] when `url` is not an absolute http(s) URL
    /// * [`ImportError::FetchFailure`] when every proxy and the direct request fail
    /// * [`ImportError::NoRecipeFound`] when no extraction strategy matches
    pub async fn extract_recipe(&self, url: &str) -> Result<RecipeDraft, ImportError> {
        pipelines::url::process(self.client.as_ref(), &self.config, url).await
    }
}

/// Builder for configuring a [`RecipeImporter`]
///
/// # Example
/// ```no_run
/// use recipe_catalog::RecipeImporter;
/// use std::time::Duration;
///
/// # async fn run() -> Result<(), recipe_catalog::ImportError> {
/// let importer = RecipeImporter::builder()
///     .timeout(Duration::from_secs(10))
///     .skip_images()
///     .build()?;
/// let recipe = importer.extract_recipe("https://example.com/recipe").await?;
/// println!("{}", recipe.title);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct RecipeImporterBuilder {
    config: Option<ImportConfig>,
    proxies: Option<Vec<String>>,
    timeout: Option<Duration>,
    max_images: Option<usize>,
    skip_images: bool,
    client: Option<Arc<dyn HttpClient>>,
}

impl RecipeImporterBuilder {
    /// Start from a loaded configuration instead of the defaults.
    /// Other builder settings override its fields.
    pub fn config(mut self, config: ImportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the proxy prefixes. An empty list means direct requests only.
    pub fn proxies<I, S>(mut self, proxies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proxies = Some(proxies.into_iter().map(Into::into).collect());
        self
    }

    /// Set a timeout for each HTTP request (default: 30 seconds).
    /// Sub-second precision is kept.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_images(mut self, max_images: usize) -> Self {
        self.max_images = Some(max_images);
        self
    }

    /// Keep image references as found instead of embedding them
    pub fn skip_images(mut self) -> Self {
        self.skip_images = true;
        self
    }

    /// Use a custom HTTP client instead of the reqwest-backed default
    pub fn client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the importer
    ///
    /// # Errors
    /// Returns [`ImportError::BuilderError`] for unusable settings, or
    /// [`ImportError::Http`] if the default HTTP client cannot be created.
    pub fn build(self) -> Result<RecipeImporter, ImportError> {
        let mut config = self.config.unwrap_or_default();

        if let Some(proxies) = self.proxies {
            config.proxies = proxies;
        }
        let request_timeout = match self.timeout {
            Some(timeout) => {
                // The config keeps whole seconds, rounded up
                config.timeout = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
                timeout
            }
            None => config.request_timeout(),
        };
        if request_timeout.is_zero() {
            return Err(ImportError::BuilderError(
                "Timeout must be greater than zero".to_string(),
            ));
        }
        if let Some(max_images) = self.max_images {
            config.max_images = max_images;
        }
        if self.skip_images {
            config.fetch_images = false;
        }

        if !(1..=100).contains(&config.jpeg_quality) {
            return Err(ImportError::BuilderError(format!(
                "JPEG quality must be between 1 and 100, got {}",
                config.jpeg_quality
            )));
        }
        if config.proxies.iter().any(|p| p.trim().is_empty()) {
            return Err(ImportError::BuilderError(
                "Proxy prefixes must not be empty".to_string(),
            ));
        }

        let client = match self.client {
            Some(client) => client,
            None => Arc::new(RequestFetcher::new(
                Some(request_timeout),
                &config.user_agent,
            )?),
        };

        Ok(RecipeImporter {
            config,
            request_timeout,
            client,
        })
    }
}
