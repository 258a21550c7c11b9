use super::{element_text, Extractor, ParsingContext};
use crate::model::{non_empty, ExtractionCandidate};
use crate::normalize::{parse_count_str, parse_duration};
use log::debug;
use scraper::{ElementRef, Html, Selector};

pub struct MicroDataExtractor;

impl MicroDataExtractor {
    fn find_recipe_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let selector = Selector::parse("[itemtype*='Recipe']").ok()?;
        document.select(&selector).next()
    }

    fn itemprop_selector(prop: &str) -> Option<Selector> {
        Selector::parse(&format!("[itemprop='{prop}']")).ok()
    }

    fn get_itemprop(&self, root: ElementRef, prop: &str) -> Option<String> {
        let selector = Self::itemprop_selector(prop)?;
        root.select(&selector)
            .next()
            .and_then(|el| non_empty(element_text(el)))
    }

    /// Machine-readable value of a property: `datetime`/`content` attribute
    /// first, text content otherwise.
    fn get_itemprop_value(&self, root: ElementRef, prop: &str) -> Option<String> {
        let selector = Self::itemprop_selector(prop)?;
        let el = root.select(&selector).next()?;
        ["datetime", "content"]
            .iter()
            .find_map(|attr| el.value().attr(attr).and_then(non_empty))
            .or_else(|| non_empty(element_text(el)))
    }

    fn get_itemprop_list(&self, root: ElementRef, prop: &str) -> Vec<String> {
        let Some(selector) = Self::itemprop_selector(prop) else {
            return Vec::new();
        };
        root.select(&selector)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// Image sources, taken from `src`, `content` or `href` in that order.
    fn get_itemprop_images(&self, root: ElementRef, prop: &str) -> Vec<String> {
        let Some(selector) = Self::itemprop_selector(prop) else {
            return Vec::new();
        };
        root.select(&selector)
            .filter_map(|el| {
                ["src", "content", "href"]
                    .iter()
                    .find_map(|attr| el.value().attr(attr).and_then(non_empty))
            })
            .map(|src| src.trim().to_string())
            .collect()
    }
}

impl Extractor for MicroDataExtractor {
    fn name(&self) -> &'static str {
        "microdata"
    }

    fn parse(&self, context: &ParsingContext) -> Option<ExtractionCandidate> {
        let Some(container) = self.find_recipe_container(&context.document) else {
            debug!("MicroDataExtractor: No Recipe container found");
            return None;
        };

        let mut ingredients = self.get_itemprop_list(container, "recipeIngredient");
        if ingredients.is_empty() {
            // Older data-vocabulary markup
            ingredients = self.get_itemprop_list(container, "ingredients");
        }
        let instructions = self.get_itemprop_list(container, "recipeInstructions");

        debug!(
            "MicroDataExtractor: {} ingredients, {} instructions",
            ingredients.len(),
            instructions.len()
        );

        Some(ExtractionCandidate {
            title: self.get_itemprop(container, "name"),
            ingredients: non_empty(ingredients.join("\n")),
            instructions: non_empty(instructions.join("\n")),
            cooking_time: self
                .get_itemprop_value(container, "cookTime")
                .and_then(|t| parse_duration(&t)),
            servings: self
                .get_itemprop_value(container, "recipeYield")
                .and_then(|y| parse_count_str(&y)),
            tags: self.get_itemprop_list(container, "recipeCategory"),
            description: self.get_itemprop(container, "description"),
            images: self.get_itemprop_images(container, "image"),
        })
    }
}
