use thiserror::Error;

/// Errors that can occur during recipe import and catalog operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// The locator is not a well-formed absolute http(s) URL
    #[error("Invalid URL provided: {0}")]
    InvalidLocator(String),

    /// Every document transport (proxies, then direct) failed
    #[error("Unable to fetch page content from {url}. The website may not allow cross-origin requests ({attempts} transports tried)")]
    FetchFailure { url: String, attempts: usize },

    /// The page was retrieved but no extraction strategy matched
    #[error("Could not extract recipe data from {0}")]
    NoRecipeFound(String),

    /// Failed to construct the HTTP client
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Snapshot could not be encoded or decoded
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// No stored recipe with this id
    #[error("Recipe {0} not found")]
    RecipeNotFound(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
