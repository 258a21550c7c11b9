//! Local recipe records: the store contract plus an in-memory reference
//! implementation, and the catalog queries built on top of it.

use crate::error::ImportError;
use crate::model::{timestamp_now, RecipeDraft};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type RecipeId = u64;

/// A draft as saved in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecipe {
    pub id: RecipeId,
    #[serde(flatten)]
    pub recipe: RecipeDraft,
    pub created_at: String,
    pub updated_at: String,
}

/// Keyed recipe storage.
pub trait RecipeStore {
    /// Save a new draft under a fresh id.
    fn insert(&mut self, recipe: RecipeDraft) -> RecipeId;

    /// Save a record as-is, replacing any record with the same id.
    fn put(&mut self, recipe: StoredRecipe) -> RecipeId;

    /// Replace the content of an existing record, keeping its creation time.
    fn update(&mut self, id: RecipeId, recipe: RecipeDraft) -> Result<(), ImportError>;

    fn get(&self, id: RecipeId) -> Option<&StoredRecipe>;

    fn delete(&mut self, id: RecipeId) -> Result<StoredRecipe, ImportError>;

    /// Every record, in id order.
    fn all(&self) -> Vec<&StoredRecipe>;

    fn clear(&mut self);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    next_id: RecipeId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    fn allocate_id(&mut self) -> RecipeId {
        let mut id = self.next_id.max(1);
        if self.recipes.contains_key(&id) {
            // Counter pinned at RecipeId::MAX by an imported record
            id = self.lowest_free_id();
        }
        self.next_id = id.saturating_add(1);
        id
    }

    fn lowest_free_id(&self) -> RecipeId {
        let mut candidate: RecipeId = 1;
        for &id in self.recipes.keys() {
            if id > candidate {
                break;
            }
            if id == candidate {
                candidate = candidate.saturating_add(1);
            }
        }
        candidate
    }
}

impl RecipeStore for MemoryStore {
    fn insert(&mut self, recipe: RecipeDraft) -> RecipeId {
        let id = self.allocate_id();
        let now = timestamp_now();
        self.recipes.insert(
            id,
            StoredRecipe {
                id,
                recipe,
                created_at: now.clone(),
                updated_at: now,
            },
        );
        debug!("Stored recipe {}", id);
        id
    }

    fn put(&mut self, mut recipe: StoredRecipe) -> RecipeId {
        if recipe.id == 0 {
            recipe.id = self.allocate_id();
        } else {
            self.next_id = self.next_id.max(recipe.id.saturating_add(1));
        }
        let id = recipe.id;
        self.recipes.insert(id, recipe);
        id
    }

    fn update(&mut self, id: RecipeId, recipe: RecipeDraft) -> Result<(), ImportError> {
        let stored = self
            .recipes
            .get_mut(&id)
            .ok_or(ImportError::RecipeNotFound(id))?;
        stored.recipe = recipe;
        stored.updated_at = timestamp_now();
        Ok(())
    }

    fn get(&self, id: RecipeId) -> Option<&StoredRecipe> {
        self.recipes.get(&id)
    }

    fn delete(&mut self, id: RecipeId) -> Result<StoredRecipe, ImportError> {
        self.recipes
            .remove(&id)
            .ok_or(ImportError::RecipeNotFound(id))
    }

    fn all(&self) -> Vec<&StoredRecipe> {
        self.recipes.values().collect()
    }

    fn clear(&mut self) {
        self.recipes.clear();
    }
}

/// Criteria for [`search`]. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Case-insensitive substring of the title, ingredients or a tag
    pub query: String,
    /// Matches when the recipe carries any of these tags
    pub tags: Vec<String>,
    /// Recipes without a cooking time always pass
    pub max_time: Option<u32>,
}

impl SearchFilter {
    fn matches(&self, recipe: &RecipeDraft) -> bool {
        let query = self.query.trim().to_lowercase();
        let matches_query = query.is_empty()
            || recipe.title.to_lowercase().contains(&query)
            || recipe.ingredients.to_lowercase().contains(&query)
            || recipe
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&query));

        let matches_tags =
            self.tags.is_empty() || self.tags.iter().any(|tag| recipe.tags.contains(tag));

        let matches_time = match (self.max_time, recipe.cooking_time_minutes) {
            (Some(max), Some(time)) => time <= max,
            _ => true,
        };

        matches_query && matches_tags && matches_time
    }
}

pub fn search<'a, S>(store: &'a S, filter: &SearchFilter) -> Vec<&'a StoredRecipe>
where
    S: RecipeStore + ?Sized,
{
    store
        .all()
        .into_iter()
        .filter(|stored| filter.matches(&stored.recipe))
        .collect()
}

/// Every distinct tag in the store, sorted.
pub fn all_tags<S>(store: &S) -> Vec<String>
where
    S: RecipeStore + ?Sized,
{
    store
        .all()
        .into_iter()
        .flat_map(|stored| stored.recipe.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
