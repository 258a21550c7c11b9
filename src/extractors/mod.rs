use crate::model::ExtractionCandidate;
use log::debug;
use scraper::{ElementRef, Html};

mod html_class;
mod json_ld;
mod microdata;
mod open_graph;

pub use html_class::HtmlClassExtractor;
pub use json_ld::JsonLdExtractor;
pub use microdata::MicroDataExtractor;
pub use open_graph::OpenGraphExtractor;

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

/// One recipe extraction strategy.
///
/// `None` means the strategy found nothing it recognises on the page.
pub trait Extractor {
    fn name(&self) -> &'static str;
    fn parse(&self, context: &ParsingContext) -> Option<ExtractionCandidate>;
}

/// Strategies in priority order: structured data, microdata, social meta
/// tags, class-name heuristics.
pub fn strategies() -> [&'static dyn Extractor; 4] {
    [
        &JsonLdExtractor,
        &MicroDataExtractor,
        &OpenGraphExtractor,
        &HtmlClassExtractor,
    ]
}

/// Run the strategies in order and return the first candidate found.
/// Later strategies never run once one has matched.
pub fn extract_candidate(context: &ParsingContext) -> Option<(&'static str, ExtractionCandidate)> {
    strategies().into_iter().find_map(|extractor| {
        debug!("Trying {} extractor on {}", extractor.name(), context.url);
        let candidate = extractor.parse(context)?;
        debug!("{} extractor matched {}", extractor.name(), context.url);
        Some((extractor.name(), candidate))
    })
}

/// Whitespace-normalised text content of an element.
pub(crate) fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_order() {
        let names: Vec<_> = strategies().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["json_ld", "microdata", "open_graph", "html_class"]);
    }

    #[test]
    fn test_empty_page_has_no_candidate() {
        let context = ParsingContext::new("https://example.com", "<html><body></body></html>");
        assert!(extract_candidate(&context).is_none());
    }

    #[test]
    fn test_element_text_collapses_whitespace() {
        let document = Html::parse_fragment("<p>  2 cups\n   <b>flour</b>  </p>");
        let selector = scraper::Selector::parse("p").unwrap();
        let p = document.select(&selector).next().unwrap();
        assert_eq!(element_text(p), "2 cups flour");
    }
}
