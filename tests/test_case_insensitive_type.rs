mod common;

use common::{create_recipe_html, direct_importer, serve_page};

#[tokio::test]
async fn test_lowercase_recipe_type() {
    // @type is "recipe" instead of "Recipe"
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "recipe",
        "name": "Easy Black Bean Soup",
        "description": "This black bean soup recipe is easy to make and full of flavor.",
        "keywords": ["black bean soup", "vegetarian", "easy"],
        "prepTime": "PT10M",
        "cookTime": "PT30M",
        "totalTime": "PT40M",
        "recipeYield": "6",
        "recipeCategory": "Soup",
        "recipeCuisine": "Mexican",
        "recipeIngredient": [
            "2 cans black beans",
            "1 onion, diced",
            "2 cloves garlic, minced"
        ],
        "recipeInstructions": [
            {"@type": "HowToStep", "text": "Sauté onion and garlic."},
            {"@type": "HowToStep", "text": "Add beans and simmer for 20 minutes."}
        ]
    }
    "#;
    let _m = serve_page(&mut server, "/recipe", &create_recipe_html(json_ld)).await;

    let url = format!("{}/recipe", server.url());
    let importer = direct_importer().skip_images().build().unwrap();
    let recipe = importer.extract_recipe(&url).await.unwrap();

    assert_eq!(recipe.title, "Easy Black Bean Soup");
    assert_eq!(
        recipe.description,
        "This black bean soup recipe is easy to make and full of flavor."
    );
    assert_eq!(
        recipe.ingredients,
        "2 cans black beans\n1 onion, diced\n2 cloves garlic, minced"
    );
    assert_eq!(
        recipe.instructions,
        "Sauté onion and garlic.\nAdd beans and simmer for 20 minutes."
    );
    assert_eq!(recipe.cooking_time_minutes, Some(30));
    assert_eq!(recipe.servings, Some(6));
    assert_eq!(
        recipe.tags,
        vec!["Soup", "Mexican", "black bean soup", "vegetarian", "easy"]
    );
    assert_eq!(recipe.source_locator, url);
}

#[tokio::test]
async fn test_uppercase_recipe_type() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "RECIPE",
        "name": "Quick Pasta",
        "recipeIngredient": ["pasta", "sauce"],
        "recipeInstructions": "Cook pasta, add sauce."
    }
    "#;
    let _m = serve_page(&mut server, "/recipe", &create_recipe_html(json_ld)).await;

    let url = format!("{}/recipe", server.url());
    let importer = direct_importer().skip_images().build().unwrap();
    let recipe = importer.extract_recipe(&url).await.unwrap();

    assert_eq!(recipe.title, "Quick Pasta");
    assert_eq!(recipe.ingredients, "pasta\nsauce");
    assert_eq!(recipe.instructions, "Cook pasta, add sauce.");
    assert_eq!(recipe.cooking_time_minutes, None);
}

#[tokio::test]
async fn test_graph_with_lowercase_type() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "WebSite", "name": "Food Blog"},
            {"@type": "BreadcrumbList", "itemListElement": []},
            {
                "@type": "recipe",
                "name": "Graph Recipe",
                "recipeIngredient": ["ingredient 1", "ingredient 2"],
                "recipeInstructions": [{"@type": "HowToStep", "text": "Step 1"}],
                "totalTime": "PT1H15M"
            }
        ]
    }
    "#;
    let _m = serve_page(&mut server, "/recipe", &create_recipe_html(json_ld)).await;

    let url = format!("{}/recipe", server.url());
    let importer = direct_importer().skip_images().build().unwrap();
    let recipe = importer.extract_recipe(&url).await.unwrap();

    assert_eq!(recipe.title, "Graph Recipe");
    assert_eq!(recipe.instructions, "Step 1");
    assert_eq!(recipe.cooking_time_minutes, Some(75));
}

#[tokio::test]
async fn test_array_with_mixed_case_types() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": ["Thing", "ReCiPe"],
        "name": "Multi-Type Recipe",
        "recipeIngredient": ["flour"]
    }
    "#;
    let _m = serve_page(&mut server, "/recipe", &create_recipe_html(json_ld)).await;

    let url = format!("{}/recipe", server.url());
    let importer = direct_importer().skip_images().build().unwrap();
    let recipe = importer.extract_recipe(&url).await.unwrap();

    assert_eq!(recipe.title, "Multi-Type Recipe");
    assert_eq!(recipe.ingredients, "flour");
    assert_eq!(recipe.instructions, "");
}
