//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in a background thread, then
//! drives every endpoint through `UreqTransport` over real HTTP. The server
//! counts authorized hits, which lets the tests observe the response cache
//! from the outside.

use edamam_core::{
    Config, Credentials, FoodSearch, NutritionAnalysis, Parameters, RecipeSearch, Request,
    RequestError, TransportError, UreqTransport,
};
use mock_server::Hits;
use serde_json::{json, Value};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Start a mock server and return its base URL and hit counter.
fn start_server() -> (String, Hits) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let hits = Hits::default();
    let server_hits = hits.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_hits(listener, server_hits).await
        })
        .unwrap();
    });

    (format!("http://{addr}"), hits)
}

fn config(base_url: &str) -> Config {
    Config::new(Credentials::new(mock_server::APP_ID, mock_server::APP_KEY)).with_base_url(base_url)
}

fn params(value: Value) -> Parameters {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[test]
fn food_search_lifecycle() {
    init_logging();
    let (base_url, hits) = start_server();
    let config = config(&base_url);

    let mut request: Request<FoodSearch, _> = Request::new(
        &config,
        UreqTransport::new(),
        params(json!({"ingr": "1 large apple", "unknown": "dropped"})),
    );

    // First fetch goes over the wire.
    let results = request.food_results().unwrap();
    assert_eq!(results.text.as_deref(), Some("1 large apple"));
    let apple = results.foods().next().unwrap();
    assert_eq!(apple.label.as_deref(), Some("Apple"));
    assert_eq!(apple.food_id.as_deref(), Some("food_apple"));
    assert_eq!(apple.source, None);
    let kcal = apple
        .nutrients
        .iter()
        .find(|n| n.code.as_deref() == Some("ENERC_KCAL"))
        .unwrap();
    assert_eq!(kcal.value, Some(52.0));
    assert_eq!(results.parsed[0].measures[0].weight, Some(182.0));
    assert_eq!(hits.count(), 1);

    // Cached: no new hit, even after changing parameters.
    request.set_parameters(params(json!({"ingr": "banana"})));
    let again = request.food_results().unwrap();
    assert_eq!(again.foods().next().unwrap().label.as_deref(), Some("Apple"));
    assert_eq!(hits.count(), 1);

    // Invalidation picks up the new parameters.
    request.invalidate();
    let fresh = request.food_results().unwrap();
    assert_eq!(fresh.foods().next().unwrap().label.as_deref(), Some("Banana"));
    assert_eq!(hits.count(), 2);
}

#[test]
fn barcode_lookup() {
    init_logging();
    let (base_url, _hits) = start_server();

    let mut request: Request<FoodSearch, _> = Request::new(
        &config(&base_url),
        UreqTransport::new(),
        params(json!({"upc": "0000000000031"})),
    );
    let results = request.food_results().unwrap();
    assert_eq!(results.hints[0].food.as_ref().unwrap().label.as_deref(), Some("Rice"));

    request.invalidate();
    request.set_parameters(params(json!({"upc": "999"})));
    let err = request.fetch().unwrap_err();
    assert!(matches!(
        err,
        RequestError::Transport(TransportError::Status { status: 404, .. })
    ));
    assert!(request.response().is_none());
}

#[test]
fn validation_failure_never_reaches_the_server() {
    init_logging();
    let (base_url, hits) = start_server();

    let mut request: Request<FoodSearch, _> =
        Request::new(&config(&base_url), UreqTransport::new(), Parameters::new());
    let err = request.fetch().unwrap_err();
    assert!(matches!(err, RequestError::Validation(_)));
    assert_eq!(hits.count(), 0);
}

#[test]
fn wrong_credentials_surface_as_transport_status() {
    init_logging();
    let (base_url, hits) = start_server();
    let config = Config::new(Credentials::new("someone", "else")).with_base_url(&base_url);

    let mut request: Request<FoodSearch, _> = Request::from_endpoint(
        FoodSearch::for_ingredient("apple"),
        &config,
        UreqTransport::new(),
    );
    match request.fetch() {
        Err(RequestError::Transport(TransportError::Status { status, body })) => {
            assert_eq!(status, 401);
            assert!(body.contains("Unauthorized"));
        }
        other => panic!("expected 401, got {other:?}"),
    }
    assert_eq!(hits.count(), 0);
}

#[test]
fn nutrition_analysis_posts_json() {
    init_logging();
    let (base_url, hits) = start_server();

    let mut request: Request<NutritionAnalysis, _> = Request::new(
        &config(&base_url),
        UreqTransport::new(),
        params(json!({"title": "Rice Bowl", "ingr": ["1 rice", "2 banana"], "yield": null})),
    );
    let facts = request.nutrition_facts().unwrap();
    assert_eq!(facts.calories, Some(308.0));
    assert_eq!(facts.health_labels, vec!["VEGAN"]);
    assert_eq!(
        facts.nutrient("ENERC_KCAL").unwrap().unit.as_deref(),
        Some("kcal")
    );
    assert_eq!(
        facts.uri.as_deref(),
        Some("http://www.edamam.com/ontologies/edamam.owl#recipe_rice_bowl")
    );
    assert_eq!(hits.count(), 1);
}

#[test]
fn recipe_search_sends_repeated_filters() {
    init_logging();
    let (base_url, _hits) = start_server();

    let mut request: Request<RecipeSearch, _> = Request::new(
        &config(&base_url),
        UreqTransport::new(),
        params(json!({"q": "rice", "health": ["vegan", "vegetarian"]})),
    );
    let results = request.recipe_results().unwrap();
    assert_eq!(results.count, Some(1));
    let recipe = results.recipes().next().unwrap();
    assert_eq!(recipe.label.as_deref(), Some("Vegan Rice Bowl"));
    assert_eq!(recipe.ingredient_lines, vec!["1 cup rice", "1 banana"]);
    assert_eq!(recipe.total_nutrients[0].value, Some(3.1));
}

#[test]
fn raw_results_are_structured_json() {
    init_logging();
    let (base_url, _hits) = start_server();

    let mut request: Request<RecipeSearch, _> = Request::from_endpoint(
        RecipeSearch::for_query("chicken"),
        &config(&base_url),
        UreqTransport::new(),
    );
    let body = request.results().unwrap();
    assert_eq!(body["hits"][0]["recipe"]["label"], "Chicken Vesuvio");
    assert_eq!(request.response().unwrap().status, 200);
}
