use super::{Extractor, ParsingContext};
use crate::model::{non_empty, ExtractionCandidate};
use crate::normalize::{extract_text, parse_count, parse_duration_value};
use html_escape::decode_html_entities;
use log::debug;
use scraper::Selector;
use serde_json::Value;

/// Nesting limit for the Recipe node search; deeper branches are skipped.
const MAX_SEARCH_DEPTH: usize = 32;

pub struct JsonLdExtractor;

impl JsonLdExtractor {
    fn convert_to_candidate(&self, recipe: &Value) -> ExtractionCandidate {
        let field = |key: &str| recipe.get(key).filter(|v| is_present(v));

        ExtractionCandidate {
            title: field("name").and_then(|v| non_empty(decode_html_symbols(&extract_text(v)))),
            ingredients: field("recipeIngredient").and_then(|v| non_empty(ingredient_text(v))),
            instructions: field("recipeInstructions")
                .and_then(|v| non_empty(instruction_text(v))),
            cooking_time: field("cookTime")
                .or_else(|| field("totalTime"))
                .and_then(parse_duration_value),
            servings: field("recipeYield")
                .or_else(|| field("yield"))
                .and_then(parse_count),
            tags: collect_tags(
                field("recipeCategory"),
                field("recipeCuisine"),
                field("keywords"),
            ),
            description: field("description")
                .and_then(|v| non_empty(decode_html_symbols(&extract_text(v)))),
            images: field("image").map(image_urls).unwrap_or_default(),
        }
    }
}

/// Falsy values (null, empty string) count as missing, so `cookTime: ""`
/// falls through to `totalTime`.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn decode_html_symbols(text: &str) -> String {
    // Some sites double-encode entities (&amp;amp;)
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

/// Depth-first search in document order for the first Recipe node.
fn find_recipe(value: &Value, depth: usize) -> Option<&Value> {
    if depth > MAX_SEARCH_DEPTH {
        debug!("JsonLdExtractor: search depth limit reached");
        return None;
    }
    match value {
        Value::Array(items) => items.iter().find_map(|item| find_recipe(item, depth + 1)),
        Value::Object(map) => {
            if is_recipe_type(value) {
                return Some(value);
            }
            map.values().find_map(|child| find_recipe(child, depth + 1))
        }
        _ => None,
    }
}

fn ingredient_text(value: &Value) -> String {
    match value {
        Value::String(s) => decode_html_symbols(s),
        Value::Array(items) => items
            .iter()
            .map(|item| decode_html_symbols(&extract_text(item)))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

fn instruction_text(value: &Value) -> String {
    match value {
        Value::String(s) => decode_html_symbols(s),
        Value::Array(_) => {
            let mut steps = Vec::new();
            collect_steps(value, &mut steps, 0);
            steps.join("\n")
        }
        _ => String::new(),
    }
}

/// Flatten step lists, `HowToStep` objects and `HowToSection` groups into
/// one line per step. Existing numbering is kept as written.
fn collect_steps(value: &Value, steps: &mut Vec<String>, depth: usize) {
    if depth > MAX_SEARCH_DEPTH {
        return;
    }
    match value {
        Value::Array(items) => {
            for item in items {
                collect_steps(item, steps, depth + 1);
            }
        }
        Value::Object(map) => {
            if let Some(children) = map.get("itemListElement") {
                collect_steps(children, steps, depth + 1);
                return;
            }
            let text = map
                .get("text")
                .map(extract_text)
                .filter(|t| !t.is_empty())
                .or_else(|| map.get("name").map(extract_text))
                .unwrap_or_else(|| extract_text(value));
            push_step(steps, &text);
        }
        Value::String(s) => push_step(steps, s),
        _ => {}
    }
}

fn push_step(steps: &mut Vec<String>, text: &str) {
    let text = decode_html_symbols(text.trim());
    if !text.is_empty() {
        steps.push(text);
    }
}

fn collect_tags(
    category: Option<&Value>,
    cuisine: Option<&Value>,
    keywords: Option<&Value>,
) -> Vec<String> {
    let mut tags = Vec::new();

    for source in [category, cuisine].into_iter().flatten() {
        match source {
            Value::Array(items) => tags.extend(items.iter().map(extract_text)),
            other => tags.push(extract_text(other)),
        }
    }

    if let Some(keywords) = keywords {
        match keywords {
            Value::String(s) => tags.extend(s.split(',').map(|k| k.trim().to_string())),
            Value::Array(items) => tags.extend(items.iter().map(extract_text)),
            other => tags.push(extract_text(other)),
        }
    }

    tags.into_iter()
        .map(|tag| decode_html_symbols(&tag))
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("url")
            .or_else(|| map.get("@id"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn image_urls(value: &Value) -> Vec<String> {
    let urls = match value {
        Value::Array(items) => items.iter().filter_map(image_url).collect(),
        other => image_url(other).into_iter().collect::<Vec<_>>(),
    };
    urls.into_iter()
        .map(|url| decode_html_symbols(url.trim()))
        .filter(|url| !url.is_empty())
        .collect()
}

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn parse(&self, context: &ParsingContext) -> Option<ExtractionCandidate> {
        let selector = Selector::parse("script[type='application/ld+json']").ok()?;
        let scripts: Vec<_> = context.document.select(&selector).collect();
        debug!(
            "JsonLdExtractor: Found {} JSON-LD script tags",
            scripts.len()
        );

        for (index, script) in scripts.iter().enumerate() {
            let raw_json = script.text().collect::<String>();
            let json_ld = match serde_json::from_str::<Value>(raw_json.trim()) {
                Ok(json_ld) => json_ld,
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to parse JSON-LD {}: {}", index, e);
                    continue;
                }
            };

            if let Some(recipe) = find_recipe(&json_ld, 0) {
                debug!("JsonLdExtractor: Found Recipe node in script {}", index);
                return Some(self.convert_to_candidate(recipe));
            }
        }

        debug!("JsonLdExtractor: No valid recipe found in any JSON-LD script");
        None
    }
}
