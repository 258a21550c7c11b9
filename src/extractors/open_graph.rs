use super::{element_text, Extractor, ParsingContext};
use crate::model::{non_empty, ExtractionCandidate};
use log::debug;
use scraper::{Html, Selector};

/// Page-level social metadata. Only identifies the page; never yields a
/// recipe body.
pub struct OpenGraphExtractor;

fn meta_content(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        let selector = Selector::parse(selector).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .and_then(|content| non_empty(content.trim()))
    })
}

impl Extractor for OpenGraphExtractor {
    fn name(&self) -> &'static str {
        "open_graph"
    }

    fn parse(&self, context: &ParsingContext) -> Option<ExtractionCandidate> {
        let document = &context.document;

        let title = meta_content(
            document,
            &["meta[property='og:title']", "meta[name='twitter:title']"],
        )
        .or_else(|| {
            let selector = Selector::parse("title").ok()?;
            document
                .select(&selector)
                .next()
                .and_then(|el| non_empty(element_text(el)))
        });

        let Some(title) = title else {
            debug!("OpenGraphExtractor: No page title found");
            return None;
        };

        let description = meta_content(
            document,
            &[
                "meta[property='og:description']",
                "meta[name='twitter:description']",
                "meta[name='description']",
            ],
        );

        let image = meta_content(
            document,
            &["meta[property='og:image']", "meta[name='twitter:image']"],
        );

        Some(ExtractionCandidate {
            title: Some(title),
            description,
            images: image.into_iter().collect(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_graph_tags() {
        let html = r#"
            <html><head>
                <title>Fallback Title</title>
                <meta property="og:title" content=" Grilled Peaches ">
                <meta property="og:description" content="Summer dessert">
                <meta name="description" content="Generic description">
                <meta property="og:image" content="https://example.com/peach.jpg">
            </head></html>
        "#;
        let context = ParsingContext::new("https://example.com", html);
        let recipe = OpenGraphExtractor.parse(&context).unwrap();

        assert_eq!(recipe.title.as_deref(), Some("Grilled Peaches"));
        assert_eq!(recipe.description.as_deref(), Some("Summer dessert"));
        assert_eq!(recipe.images, vec!["https://example.com/peach.jpg"]);
        assert!(recipe.ingredients.is_none());
        assert!(recipe.instructions.is_none());
        assert!(recipe.tags.is_empty());
        assert!(recipe.cooking_time.is_none());
    }

    #[test]
    fn test_fallbacks() {
        let html = r#"
            <html><head>
                <title> Plain Page </title>
                <meta name="twitter:image" content="https://example.com/t.jpg">
                <meta name="description" content="Generic description">
            </head></html>
        "#;
        let context = ParsingContext::new("https://example.com", html);
        let recipe = OpenGraphExtractor.parse(&context).unwrap();

        assert_eq!(recipe.title.as_deref(), Some("Plain Page"));
        assert_eq!(recipe.description.as_deref(), Some("Generic description"));
        assert_eq!(recipe.images, vec!["https://example.com/t.jpg"]);
    }

    #[test]
    fn test_requires_title() {
        let html = r#"
            <html><head>
                <meta property="og:description" content="No title here">
                <title>   </title>
            </head></html>
        "#;
        let context = ParsingContext::new("https://example.com", html);
        assert!(OpenGraphExtractor.parse(&context).is_none());
    }
}
