use super::{element_text, Extractor, ParsingContext};
use crate::model::{non_empty, ExtractionCandidate};
use crate::normalize::{parse_count_str, parse_duration};
use log::debug;
use scraper::{Html, Selector};

/// Last-resort extraction from common recipe markup conventions.
pub struct HtmlClassExtractor;

/// Candidate selectors per field, most specific first.
struct FieldSelectors {
    title: &'static [&'static str],
    ingredients: &'static [&'static str],
    instructions: &'static [&'static str],
    time: &'static [&'static str],
    servings: &'static [&'static str],
}

const SELECTORS: FieldSelectors = FieldSelectors {
    title: &[
        "h1",
        ".recipe-title",
        ".entry-title",
        ".wprm-recipe-name",
        ".tasty-recipes-title",
        "[class*='title']",
    ],
    ingredients: &[
        ".recipe-ingredients li",
        ".ingredients li",
        ".wprm-recipe-ingredient",
        ".tasty-recipes-ingredients li",
        "[class*='ingredient']",
    ],
    instructions: &[
        ".recipe-instructions li",
        ".instructions li",
        ".wprm-recipe-instruction",
        ".tasty-recipes-instructions li",
        "[class*='instruction']",
        "[class*='direction']",
    ],
    time: &["[class*='time']", "[class*='duration']"],
    servings: &["[class*='serving']", "[class*='yield']"],
};

impl HtmlClassExtractor {
    /// Text of the first element matched by the first selector whose first
    /// match has text.
    fn find_by_selectors(&self, document: &Html, selectors: &[&str]) -> Option<String> {
        selectors.iter().find_map(|selector_str| {
            let selector = Selector::parse(selector_str).ok()?;
            let text = document.select(&selector).next().map(element_text)?;
            if text.is_empty() {
                return None;
            }
            debug!("HtmlClassExtractor: matched {}", selector_str);
            Some(text)
        })
    }

    /// Texts of every element matched by the first selector matching
    /// anything at all.
    fn find_list_by_selectors(&self, document: &Html, selectors: &[&str]) -> Vec<String> {
        for selector_str in selectors {
            let Ok(selector) = Selector::parse(selector_str) else {
                continue;
            };
            let elements: Vec<_> = document.select(&selector).collect();
            if !elements.is_empty() {
                debug!(
                    "HtmlClassExtractor: {} items via {}",
                    elements.len(),
                    selector_str
                );
                return elements
                    .into_iter()
                    .map(element_text)
                    .filter(|text| !text.is_empty())
                    .collect();
            }
        }
        Vec::new()
    }
}

impl Extractor for HtmlClassExtractor {
    fn name(&self) -> &'static str {
        "html_class"
    }

    fn parse(&self, context: &ParsingContext) -> Option<ExtractionCandidate> {
        let document = &context.document;

        let Some(title) = self.find_by_selectors(document, SELECTORS.title) else {
            debug!("HtmlClassExtractor: Could not extract recipe title");
            return None;
        };

        let ingredients = self.find_list_by_selectors(document, SELECTORS.ingredients);
        let instructions = self.find_list_by_selectors(document, SELECTORS.instructions);

        Some(ExtractionCandidate {
            title: Some(title),
            ingredients: non_empty(ingredients.join("\n")),
            instructions: non_empty(instructions.join("\n")),
            cooking_time: self
                .find_by_selectors(document, SELECTORS.time)
                .and_then(|t| parse_duration(&t)),
            servings: self
                .find_by_selectors(document, SELECTORS.servings)
                .and_then(|s| parse_count_str(&s)),
            ..Default::default()
        })
    }
}
