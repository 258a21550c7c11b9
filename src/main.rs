use log::{debug, error, info};
use recipe_catalog::{
    export_snapshot, import_snapshot, ImportConfig, ImportError, MemoryStore, MergeMode,
    RecipeImporter, RecipeStore,
};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str =
    "Usage: recipe-catalog <url> [--skip-images] [--output <file>] [--catalog <file>]";

#[derive(Debug, Default, PartialEq)]
struct Options {
    url: String,
    skip_images: bool,
    output: Option<PathBuf>,
    catalog: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut url = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--skip-images" => options.skip_images = true,
            "--output" | "-o" => {
                let path = iter.next().ok_or("--output requires a file path")?;
                options.output = Some(PathBuf::from(path));
            }
            "--catalog" => {
                let path = iter.next().ok_or("--catalog requires a file path")?;
                options.catalog = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {flag}")),
            value => {
                if url.replace(value.to_string()).is_some() {
                    return Err("Only one URL may be given".to_string());
                }
            }
        }
    }

    options.url = url.ok_or("Please provide a URL as an argument")?;
    Ok(options)
}

fn describe(err: &ImportError) -> String {
    match err {
        ImportError::InvalidLocator(url) => format!("Invalid URL provided: {url}"),
        ImportError::FetchFailure { url, .. } => format!(
            "Unable to fetch page content from {url}. The website may not allow cross-origin requests."
        ),
        ImportError::NoRecipeFound(url) => format!(
            "Could not extract recipe data from {url}. The page may not contain a recognisable recipe."
        ),
        other => other.to_string(),
    }
}

/// Append the draft to a snapshot file, creating it if missing.
async fn save_to_catalog(
    path: &Path,
    recipe: recipe_catalog::RecipeDraft,
) -> Result<(), ImportError> {
    let mut store = MemoryStore::new();
    match tokio::fs::read_to_string(path).await {
        Ok(json) => {
            import_snapshot(&mut store, &json, MergeMode::Replace)?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Starting new catalog at {}", path.display());
        }
        Err(e) => return Err(e.into()),
    }

    let id = store.insert(recipe);
    tokio::fs::write(path, export_snapshot(&store).to_json()?).await?;
    info!("Saved recipe {} to {} ({} total)", id, path.display(), store.len());
    Ok(())
}

async fn run(options: Options) -> Result<(), ImportError> {
    let config = ImportConfig::load()?;
    let mut builder = RecipeImporter::builder().config(config);
    if options.skip_images {
        builder = builder.skip_images();
    }
    let importer = builder.build()?;

    let recipe = importer.extract_recipe(&options.url).await?;
    let json = serde_json::to_string_pretty(&recipe)?;

    match &options.output {
        Some(path) => tokio::fs::write(path, &json).await?,
        None => println!("{}", json),
    }

    if let Some(catalog) = &options.catalog {
        save_to_catalog(catalog, recipe).await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", describe(&e));
            ExitCode::FAILURE
        }
    }
}
