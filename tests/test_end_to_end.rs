use recipe_scrape::{ErrorKind, Recipe, RecipeScraper, RecipeTime, ScrapeError};

fn create_recipe_html(head: &str, json_ld: &[&str]) -> String {
    let scripts: String = json_ld
        .iter()
        .map(|json| {
            format!(
                r#"
            <script type="application/ld+json">
                {json}
            </script>"#
            )
        })
        .collect();

    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            {head}
            {scripts}
        </head>
        <body>
            <h1>Recipe</h1>
        </body>
        </html>
        "#
    )
}

async fn scrape(
    server: &mut mockito::ServerGuard,
    body: String,
) -> Result<Recipe, ScrapeError> {
    let _m = server
        .mock("GET", "/recipe")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(body)
        .create_async()
        .await;

    let scraper = RecipeScraper::builder().build().unwrap();
    scraper.fetch_recipe(&format!("{}/recipe", server.url())).await
}

#[tokio::test]
async fn test_pie_with_meta_image() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "Recipe",
        "name": "Pie",
        "recipeIngredient": ["1 egg", "1 cup flour"],
        "recipeInstructions": "Mix and bake.",
        "prepTime": "PT10M"
    }
    "#;
    let head = r#"<meta property="og:image" content="https://x/img.jpg">"#;

    let recipe = scrape(&mut server, create_recipe_html(head, &[json_ld]))
        .await
        .unwrap();

    assert_eq!(
        recipe,
        Recipe {
            name: "Pie".to_string(),
            description: String::new(),
            image: "https://x/img.jpg".to_string(),
            tags: vec![],
            ingredients: vec!["1 egg".to_string(), "1 cup flour".to_string()],
            instructions: vec!["Mix and bake.".to_string()],
            sectioned_instructions: vec![],
            time: RecipeTime {
                prep: "10 minutes".to_string(),
                ..Default::default()
            },
            servings: String::new(),
        }
    );
}

#[tokio::test]
async fn test_description_from_og_meta() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"{"@type": "Recipe", "name": "Soup"}"#;
    let head = "<meta property=\"og:description\" content=\"  Hearty\nwinter soup \">";

    let recipe = scrape(&mut server, create_recipe_html(head, &[json_ld]))
        .await
        .unwrap();

    assert_eq!(recipe.description, "Hearty winter soup");
}

#[tokio::test]
async fn test_first_match_skips_unparsable_payload() {
    let mut server = mockito::Server::new_async().await;
    let broken = r#"{"@type": "Recipe", "name": "Broken", "recipeIngredient": [}"#;
    let valid = r#"{"@type": "Recipe", "name": "Second"}"#;

    let recipe = scrape(&mut server, create_recipe_html("", &[broken, valid]))
        .await
        .unwrap();

    assert_eq!(recipe.name, "Second");
}

#[tokio::test]
async fn test_graph_recipe_with_sections() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "WebSite", "name": "Kitchen"},
            {
                "@type": ["Recipe"],
                "name": "Layer Cake",
                "keywords": "cake, baking",
                "recipeCategory": "Dessert|baking",
                "recipeCuisine": "French",
                "recipeYield": ["12", "12 slices"],
                "totalTime": "PT2H15M",
                "image": {"@type": "ImageObject", "url": "https://x/cake.jpg"},
                "thumbnailUrl": "https://x/thumb.jpg",
                "recipeInstructions": [
                    {
                        "@type": "HowToSection",
                        "name": "Sponge",
                        "itemListElement": [
                            {"@type": "HowToStep", "text": "Whisk eggs &amp; sugar."},
                            {"@type": "HowToStep", "text": "Fold in flour."}
                        ]
                    },
                    {
                        "@type": "HowToSection",
                        "name": "Frosting",
                        "itemListElement": [
                            {"@type": "HowToStep", "text": "Beat butter."}
                        ]
                    }
                ]
            }
        ]
    }
    "#;

    let recipe = scrape(&mut server, create_recipe_html("", &[json_ld]))
        .await
        .unwrap();

    assert_eq!(recipe.name, "Layer Cake");
    assert_eq!(recipe.tags, vec!["cake", "baking", "French", "Dessert"]);
    assert_eq!(recipe.servings, "12");
    assert_eq!(recipe.time.total, "2 hours 15 minutes");
    // ImageObject without a recipe url falls through to the thumbnail
    assert_eq!(recipe.image, "https://x/thumb.jpg");
    assert_eq!(
        recipe.instructions,
        vec!["Whisk eggs & sugar.", "Fold in flour.", "Beat butter."]
    );
    assert_eq!(recipe.sectioned_instructions.len(), 3);
    assert_eq!(recipe.sectioned_instructions[2].section_title, "Frosting");
    for step in &recipe.sectioned_instructions {
        assert!(recipe.instructions.contains(&step.text));
    }
}

#[tokio::test]
async fn test_missing_name_fails_validation() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@type": "Recipe",
        "recipeIngredient": ["2 eggs"],
        "recipeInstructions": "Scramble."
    }
    "#;

    let err = scrape(&mut server, create_recipe_html("", &[json_ld]))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_page_without_recipe() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"{"@type": "Article", "name": "Ten dinner ideas"}"#;

    let err = scrape(&mut server, create_recipe_html("", &[json_ld]))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoStructuredDataFound);
}

#[tokio::test]
async fn test_error_status_is_transport_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/recipe")
        .with_status(503)
        .create_async()
        .await;

    let scraper = RecipeScraper::builder().build().unwrap();
    let err = scraper
        .fetch_recipe(&format!("{}/recipe", server.url()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_concurrent_extractions_are_independent() {
    let mut server = mockito::Server::new_async().await;
    let _a = server
        .mock("GET", "/a")
        .with_status(200)
        .with_body(create_recipe_html("", &[r#"{"@type": "Recipe", "name": "A"}"#]))
        .create_async()
        .await;
    let _b = server
        .mock("GET", "/b")
        .with_status(200)
        .with_body(create_recipe_html("", &[r#"{"@type": "Recipe", "name": "B"}"#]))
        .create_async()
        .await;

    let scraper = RecipeScraper::builder().build().unwrap();
    let url_a = format!("{}/a", server.url());
    let url_b = format!("{}/b", server.url());
    let (a, b) = tokio::join!(scraper.fetch_recipe(&url_a), scraper.fetch_recipe(&url_b));

    assert_eq!(a.unwrap().name, "A");
    assert_eq!(b.unwrap().name, "B");
}

#[tokio::test]
async fn test_probe_reachable() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/up")
        .with_status(200)
        .create_async()
        .await;

    assert!(recipe_scrape::probe_reachable(&format!("{}/up", server.url())).await);
    assert!(!recipe_scrape::probe_reachable("http://127.0.0.1:1/down").await);
}
