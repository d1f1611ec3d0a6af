//! Integration tests for the recipe catalogue and its file cache

mod common;

use common::{test_config, ANON_KEY};
use cookcraft_client::services::recipes::{search, CULTURAL_MEALS_FILE};
use cookcraft_client::services::RecipeService;
use cookcraft_client::supabase::SupabaseClient;
use cookcraft_shared::models::MealType;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> RecipeService {
    let config = test_config(server);
    let client = SupabaseClient::new(&config.supabase).unwrap();
    RecipeService::new(client, &config.recipes)
}

async fn mount_file(server: &MockServer, file: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/storage/v1/object/recipe_enriched/{}", file)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn cultural_meals() -> Value {
    json!([
        { "name": "Githeri", "ingredients": "maize, beans ,onion", "mealType": "Lunch", "dietaryTags": null },
        { "name": "Mandazi", "ingredients": ["flour", "coconut milk"], "mealType": "Breakfast" },
        { "name": "Ugali", "mealType": " lunch " }
    ])
}

#[tokio::test]
async fn test_second_load_is_served_from_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/storage/v1/object/recipe_enriched/recipes_breakfast_part0.json"))
        .and(header("apikey", ANON_KEY))
        .and(header("authorization", format!("Bearer {}", ANON_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Oat Porridge", "ingredients": ["oats", "milk"], "mealType": "Breakfast" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let first = service.load_file("recipes_breakfast_part0.json").await.unwrap();
    let second = service.load_file("recipes_breakfast_part0.json").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].ingredients, vec!["oats", "milk"]);
    assert!(service.cache_dir().join("recipes_breakfast_part0.json").exists());
}

#[tokio::test]
async fn test_missing_file_is_an_error() {
    let server = MockServer::start().await;
    let service = service_for(&server);

    let err = service.load_file("recipes_snack_part0.json").await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    assert!(!service.cache_dir().join("recipes_snack_part0.json").exists());
}

#[tokio::test]
async fn test_fetch_category_strict() {
    let server = MockServer::start().await;
    mount_file(&server, CULTURAL_MEALS_FILE, cultural_meals()).await;
    mount_file(
        &server,
        "recipes_lunch_part0.json",
        json!([
            { "name": "GITHERI", "mealType": "Lunch" },
            { "name": "Chapati Wrap", "ingredients": ["chapati", "beans"], "mealType": "LUNCH" },
            { "name": "Pancakes", "mealType": "Breakfast" },
            { "name": "Mystery Stew" }
        ]),
    )
    .await;

    let service = service_for(&server);
    let recipes = service
        .fetch_category_strict("recipes_lunch_part0.json", "Quick Lunches", MealType::Lunch)
        .await
        .unwrap();

    let names: Vec<&str> = recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Githeri", "Ugali", "Chapati Wrap"]);

    // Cultural entries keep their own category
    assert_eq!(recipes[0].category, None);
    assert_eq!(recipes[0].ingredients, vec!["maize", "beans", "onion"]);
    assert!(recipes[0].dietary_tags.is_empty());
    assert_eq!(recipes[2].category.as_deref(), Some("Quick Lunches"));
}

#[tokio::test]
async fn test_fetch_all_skips_missing_files() {
    let server = MockServer::start().await;
    mount_file(&server, CULTURAL_MEALS_FILE, cultural_meals()).await;
    mount_file(
        &server,
        "recipes_dessert_part0.json",
        json!([
            { "name": "Mango Sorbet", "ingredients": ["mango"], "mealType": "Dessert" },
            { "name": "mandazi", "mealType": "Dessert" }
        ]),
    )
    .await;

    let service = service_for(&server);
    let recipes = service.fetch_all().await;

    assert_eq!(recipes.len(), 4);
    assert!(recipes.iter().any(|r| r.name == "Mango Sorbet"));

    // First occurrence wins on duplicate names
    let mandazi: Vec<_> = recipes.iter().filter(|r| r.dedup_key() == "mandazi").collect();
    assert_eq!(mandazi.len(), 1);
    assert_eq!(mandazi[0].meal_type.as_deref(), Some("Breakfast"));

    assert_eq!(search(&recipes, "coconut").len(), 1);
    assert_eq!(search(&recipes, "BEANS")[0].name, "Githeri");
}
