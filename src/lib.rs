//! Import recipes from arbitrary web pages into a local catalog.
//!
//! A page is fetched through a chain of proxies with a direct fallback,
//! a recipe is extracted by the first matching strategy (JSON-LD,
//! microdata, OpenGraph, common markup), cleaned into a [`RecipeDraft`]
//! and its images embedded as `data:` URLs.

pub mod builder;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod images;
pub mod model;
pub mod normalize;
pub mod pipelines;
pub mod snapshot;
pub mod store;

pub use builder::{RecipeImporter, RecipeImporterBuilder};
pub use config::ImportConfig;
pub use error::ImportError;
pub use fetchers::{HttpClient, HttpResponse};
pub use images::ImageOutcome;
pub use model::{clean_recipe_data, ExtractionCandidate, RecipeDraft};
pub use snapshot::{export_snapshot, import_snapshot, ImportSummary, MergeMode, Snapshot};
pub use store::{all_tags, search, MemoryStore, RecipeId, RecipeStore, SearchFilter, StoredRecipe};

/// Import a recipe using configuration from `config.toml` and the
/// environment, falling back to defaults.
///
/// # Example
/// ```no_run
/// # async fn run() -> Result<(), recipe_catalog::ImportError> {
/// let recipe = recipe_catalog::extract_recipe("https://example.com/recipe").await?;
/// println!("{} ({} images)", recipe.title, recipe.images.len());
/// # Ok(())
/// # }
/// ```
pub async fn extract_recipe(url: &str) -> Result<RecipeDraft, ImportError> {
    let config = ImportConfig::load()?;
    RecipeImporter::builder()
        .config(config)
        .build()?
        .extract_recipe(url)
        .await
}
