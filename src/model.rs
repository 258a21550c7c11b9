use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// A finished recipe as produced by an import, ready to hand to a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    /// Newline-separated ingredient lines
    pub ingredients: String,
    /// Newline-separated steps, numbering left as found
    pub instructions: String,
    pub cooking_time_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub tags: Vec<String>,
    pub description: String,
    /// Image references before acquisition, embeddable `data:` URLs after
    pub images: Vec<String>,
    pub source_locator: String,
    /// ISO-8601 timestamp
    pub extracted_at_timestamp: String,
}

/// Intermediate output of a single extraction strategy.
///
/// Absence is always `None` or an empty `Vec`; strategies never hand back
/// empty strings standing in for missing data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionCandidate {
    pub title: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub cooking_time: Option<u32>,
    pub servings: Option<u32>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
}

/// `Some(text)` when `text` has non-whitespace content.
pub(crate) fn non_empty(text: impl Into<String>) -> Option<String> {
    let text = text.into();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

impl From<RecipeDraft> for ExtractionCandidate {
    fn from(draft: RecipeDraft) -> Self {
        Self {
            title: non_empty(draft.title),
            ingredients: non_empty(draft.ingredients),
            instructions: non_empty(draft.instructions),
            cooking_time: draft.cooking_time_minutes,
            servings: draft.servings,
            tags: draft.tags,
            description: non_empty(draft.description),
            images: draft.images,
        }
    }
}

/// Current time in the ISO-8601 form used for `extracted_at_timestamp`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fill every field of the winning candidate with a type-correct value.
///
/// Missing text becomes empty, a missing title becomes the placeholder,
/// numeric fields stay absent, blank tags are removed. Cleaning an already
/// cleaned draft changes nothing.
pub fn clean_recipe_data(
    candidate: ExtractionCandidate,
    source_locator: &str,
    extracted_at: &str,
) -> RecipeDraft {
    let title = candidate
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED_RECIPE.to_string());

    let tags = candidate
        .tags
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();

    let images = candidate
        .images
        .into_iter()
        .map(|img| img.trim().to_string())
        .filter(|img| !img.is_empty())
        .collect();

    RecipeDraft {
        title,
        ingredients: candidate.ingredients.and_then(non_empty).unwrap_or_default(),
        instructions: candidate.instructions.and_then(non_empty).unwrap_or_default(),
        cooking_time_minutes: candidate.cooking_time,
        servings: candidate.servings,
        tags,
        description: candidate
            .description
            .map(|d| d.trim().to_string())
            .unwrap_or_default(),
        images,
        source_locator: source_locator.to_string(),
        extracted_at_timestamp: extracted_at.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candidate() -> ExtractionCandidate {
        ExtractionCandidate {
            title: Some("  Lentil Soup ".to_string()),
            ingredients: Some("1 cup lentils\n1 onion".to_string()),
            instructions: None,
            cooking_time: Some(0),
            servings: Some(4),
            tags: vec!["Soup".to_string(), "".to_string(), "  ".to_string(), "Soup".to_string()],
            description: None,
            images: vec!["https://example.com/a.jpg".to_string()],
        }
    }

    #[test]
    fn test_clean_fills_defaults() {
        let draft = clean_recipe_data(
            ExtractionCandidate::default(),
            "https://example.com/r",
            "2024-01-01T00:00:00.000Z",
        );

        assert_eq!(draft.title, UNTITLED_RECIPE);
        assert_eq!(draft.ingredients, "");
        assert_eq!(draft.instructions, "");
        assert_eq!(draft.description, "");
        assert!(draft.cooking_time_minutes.is_none());
        assert!(draft.servings.is_none());
        assert!(draft.tags.is_empty());
        assert!(draft.images.is_empty());
        assert_eq!(draft.source_locator, "https://example.com/r");
        assert_eq!(draft.extracted_at_timestamp, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_clean_keeps_zero_and_duplicate_tags() {
        let draft = clean_recipe_data(sample_candidate(), "u", "t");

        assert_eq!(draft.title, "Lentil Soup");
        assert_eq!(draft.cooking_time_minutes, Some(0));
        assert_eq!(draft.servings, Some(4));
        assert_eq!(draft.tags, vec!["Soup", "Soup"]);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let once = clean_recipe_data(sample_candidate(), "u", "t");
        let twice = clean_recipe_data(once.clone().into(), "u", "t");
        assert_eq!(once, twice);

        let empty_once = clean_recipe_data(ExtractionCandidate::default(), "u", "t");
        let empty_twice = clean_recipe_data(empty_once.clone().into(), "u", "t");
        assert_eq!(empty_once, empty_twice);
    }

    #[test]
    fn test_draft_serializes_camel_case() {
        let draft = clean_recipe_data(sample_candidate(), "u", "t");
        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(json["cookingTimeMinutes"], 0);
        assert_eq!(json["sourceLocator"], "u");
        assert_eq!(json["extractedAtTimestamp"], "t");
    }

    #[test]
    fn test_timestamp_is_iso() {
        let ts = timestamp_now();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        assert!(ts.ends_with('Z'));
    }
}
