mod common;

use common::{direct_importer, serve_page};
use recipe_catalog::ImportError;

const MICRODATA_BLOCK: &str = r#"
    <div itemscope itemtype="https://schema.org/Recipe">
        <h2 itemprop="name">Microdata Muffins</h2>
        <ul>
            <li itemprop="recipeIngredient">2 cups flour</li>
            <li itemprop="recipeIngredient">1 cup blueberries</li>
        </ul>
        <div itemprop="recipeInstructions">Mix and bake.</div>
        <meta itemprop="cookTime" content="PT25M">
        <span itemprop="recipeYield">12 muffins</span>
        <span itemprop="recipeCategory">Breakfast</span>
    </div>
"#;

const SELECTOR_BLOCK: &str = r#"
    <h1>Selector Soup</h1>
    <div class="recipe-ingredients"><ul><li>water</li><li>stone</li></ul></div>
    <div class="recipe-instructions"><ol><li>Boil.</li></ol></div>
"#;

async fn import(body: String) -> Result<recipe_catalog::RecipeDraft, ImportError> {
    let mut server = mockito::Server::new_async().await;
    let _m = serve_page(&mut server, "/page", &body).await;
    let url = format!("{}/page", server.url());
    direct_importer()
        .skip_images()
        .build()
        .unwrap()
        .extract_recipe(&url)
        .await
}

#[tokio::test]
async fn test_json_ld_beats_microdata_and_selectors() {
    let body = format!(
        r#"<html><head>
            <meta property="og:title" content="OpenGraph Title">
            <script type="application/ld+json">
                {{"@type": "Recipe", "name": "JSON-LD Lasagna", "recipeIngredient": ["noodles"]}}
            </script>
        </head><body>{MICRODATA_BLOCK}{SELECTOR_BLOCK}</body></html>"#
    );

    let recipe = import(body).await.unwrap();

    assert_eq!(recipe.title, "JSON-LD Lasagna");
    assert_eq!(recipe.ingredients, "noodles");
}

#[tokio::test]
async fn test_microdata_when_no_json_ld() {
    let body = format!(
        r#"<html><head><meta property="og:title" content="OpenGraph Title"></head>
        <body>{MICRODATA_BLOCK}{SELECTOR_BLOCK}</body></html>"#
    );

    let recipe = import(body).await.unwrap();

    assert_eq!(recipe.title, "Microdata Muffins");
    assert_eq!(recipe.ingredients, "2 cups flour\n1 cup blueberries");
    assert_eq!(recipe.instructions, "Mix and bake.");
    assert_eq!(recipe.cooking_time_minutes, Some(25));
    assert_eq!(recipe.servings, Some(12));
    assert_eq!(recipe.tags, vec!["Breakfast"]);
}

#[tokio::test]
async fn test_open_graph_identifies_page_only() {
    let body = format!(
        r#"<html><head>
            <meta property="og:title" content="Tomato Tart">
            <meta property="og:description" content="Flaky and bright">
        </head><body>{SELECTOR_BLOCK}</body></html>"#
    );

    let recipe = import(body).await.unwrap();

    assert_eq!(recipe.title, "Tomato Tart");
    assert_eq!(recipe.description, "Flaky and bright");
    assert_eq!(recipe.ingredients, "");
    assert_eq!(recipe.instructions, "");
}

#[tokio::test]
async fn test_common_selectors_as_last_resort() {
    let body = format!("<html><body>{SELECTOR_BLOCK}</body></html>");

    let recipe = import(body).await.unwrap();

    assert_eq!(recipe.title, "Selector Soup");
    assert_eq!(recipe.ingredients, "water\nstone");
    assert_eq!(recipe.instructions, "Boil.");
}

#[tokio::test]
async fn test_no_recipe_found() {
    let body = "<html><body><p>Just a blog post.</p></body></html>".to_string();

    let result = import(body).await;

    assert!(matches!(result, Err(ImportError::NoRecipeFound(_))));
}

#[tokio::test]
async fn test_malformed_json_ld_falls_through() {
    let body = format!(
        r#"<html><head>
            <script type="application/ld+json">{{ "@type": "Recipe", "name": </script>
        </head><body>{MICRODATA_BLOCK}</body></html>"#
    );

    let recipe = import(body).await.unwrap();

    assert_eq!(recipe.title, "Microdata Muffins");
}
