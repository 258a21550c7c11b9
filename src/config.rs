use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Settings for the import pipeline
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ImportConfig {
    /// Proxy prefixes tried in order before a direct request; the
    /// percent-encoded target URL is appended to each prefix
    #[serde(default = "default_proxies")]
    pub proxies: Vec<String>,
    /// Request timeout in whole seconds, applied to every HTTP request.
    /// `RecipeImporterBuilder::timeout` accepts finer durations.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Ceiling in seconds for one transcode attempt of an image
    #[serde(default = "default_image_timeout")]
    pub image_timeout: u64,
    /// Images beyond this count are ignored
    #[serde(default = "default_max_images")]
    pub max_images: usize,
    /// JPEG quality (1-100) used when re-encoding images
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Whether image references are downloaded and embedded
    #[serde(default = "default_fetch_images")]
    pub fetch_images: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            proxies: default_proxies(),
            timeout: default_timeout(),
            image_timeout: default_image_timeout(),
            max_images: default_max_images(),
            jpeg_quality: default_jpeg_quality(),
            fetch_images: default_fetch_images(),
            user_agent: default_user_agent(),
        }
    }
}

// Default value functions
fn default_proxies() -> Vec<String> {
    vec![
        "https://api.allorigins.win/raw?url=".to_string(),
        "https://cors-anywhere.herokuapp.com/".to_string(),
    ]
}

fn default_timeout() -> u64 {
    30
}

fn default_image_timeout() -> u64 {
    10
}

fn default_max_images() -> usize {
    5
}

fn default_jpeg_quality() -> u8 {
    80
}

fn default_fetch_images() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

impl ImportConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_CATALOG__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_CATALOG__IMAGE_TIMEOUT
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("RECIPE_CATALOG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn transcode_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout)
    }
}
