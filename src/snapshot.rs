use crate::error::ImportError;
use crate::model::timestamp_now;
use crate::store::{RecipeStore, StoredRecipe};
use log::info;
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Portable copy of a whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub recipes: Vec<StoredRecipe>,
    #[serde(default)]
    pub export_date: String,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, ImportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// How an imported snapshot combines with existing records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// Upsert by id, keeping records the snapshot does not mention
    #[default]
    Add,
    /// Clear the store first
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub recipes_imported: usize,
}

pub fn export_snapshot<S>(store: &S) -> Snapshot
where
    S: RecipeStore + ?Sized,
{
    Snapshot {
        recipes: store.all().into_iter().cloned().collect(),
        export_date: timestamp_now(),
        version: SNAPSHOT_VERSION,
    }
}

/// Load a snapshot into `store`.
///
/// The JSON is fully decoded before the store is touched, so a malformed
/// snapshot leaves the store unchanged even in replace mode.
pub fn import_snapshot<S>(
    store: &mut S,
    json: &str,
    mode: MergeMode,
) -> Result<ImportSummary, ImportError>
where
    S: RecipeStore + ?Sized,
{
    let snapshot = Snapshot::from_json(json)?;

    if mode == MergeMode::Replace {
        store.clear();
    }

    let recipes_imported = snapshot.recipes.len();
    for recipe in snapshot.recipes {
        store.put(recipe);
    }

    info!(
        "Imported {} recipes from snapshot dated {} ({:?})",
        recipes_imported, snapshot.export_date, mode
    );
    Ok(ImportSummary { recipes_imported })
}
