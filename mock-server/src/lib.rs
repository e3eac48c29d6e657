use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const APP_ID: &str = "test-app-id";
pub const APP_KEY: &str = "test-app-key";

/// Number of authenticated requests the server has answered.
#[derive(Clone, Debug, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

type QueryPairs = Vec<(String, String)>;
type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

#[derive(Deserialize)]
pub struct NutritionRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub ingr: Vec<String>,
}

pub fn app() -> Router {
    app_with_hits(Hits::default())
}

pub fn app_with_hits(hits: Hits) -> Router {
    Router::new()
        .route("/api/food-database/v2/parser", get(parse_food))
        .route("/api/nutrition-details", post(nutrition_details))
        .route("/api/recipes/v2", get(search_recipes))
        .with_state(hits)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_hits(listener: TcpListener, hits: Hits) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_hits(hits)).await
}

fn first<'a>(query: &'a QueryPairs, key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

fn all<'a>(query: &'a QueryPairs, key: &str) -> Vec<&'a str> {
    query
        .iter()
        .filter(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
        .collect()
}

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({"status": "error", "message": message})))
}

fn authorize(query: &QueryPairs, hits: &Hits) -> Result<(), (StatusCode, Json<Value>)> {
    if first(query, "app_id") != Some(APP_ID) || first(query, "app_key") != Some(APP_KEY) {
        return Err(error(StatusCode::UNAUTHORIZED, "Unauthorized app_id"));
    }
    hits.record();
    Ok(())
}

fn foods() -> Vec<Value> {
    vec![
        json!({
            "foodId": "food_apple",
            "uri": "http://www.edamam.com/ontologies/edamam.owl#Food_apple",
            "label": "Apple",
            "category": "Generic foods",
            "categoryLabel": "food",
            "upc": "0000000000017",
            "nutrients": {"ENERC_KCAL": 52.0, "PROCNT": 0.26, "FAT": 0.17, "CHOCDF": 13.81},
            "measures": [
                {"uri": "http://www.edamam.com/ontologies/edamam.owl#Measure_unit", "label": "Whole", "weight": 182.0},
                {"uri": "http://www.edamam.com/ontologies/edamam.owl#Measure_gram", "label": "Gram", "weight": 1.0}
            ]
        }),
        json!({
            "foodId": "food_banana",
            "uri": "http://www.edamam.com/ontologies/edamam.owl#Food_banana",
            "label": "Banana",
            "category": "Generic foods",
            "categoryLabel": "food",
            "upc": "0000000000024",
            "nutrients": {"ENERC_KCAL": 89.0, "PROCNT": 1.09, "FAT": 0.33, "CHOCDF": 22.84},
            "measures": [
                {"uri": "http://www.edamam.com/ontologies/edamam.owl#Measure_unit", "label": "Whole", "weight": 118.0}
            ]
        }),
        json!({
            "foodId": "food_rice",
            "uri": "http://www.edamam.com/ontologies/edamam.owl#Food_rice",
            "label": "Rice",
            "category": "Generic foods",
            "categoryLabel": "food",
            "upc": "0000000000031",
            "nutrients": {"ENERC_KCAL": 130.0, "PROCNT": 2.69, "FAT": 0.28, "CHOCDF": 28.17},
            "measures": [
                {"uri": "http://www.edamam.com/ontologies/edamam.owl#Measure_cup", "label": "Cup", "weight": 158.0}
            ]
        }),
    ]
}

fn recipes() -> Vec<Value> {
    vec![
        json!({
            "uri": "http://www.edamam.com/ontologies/edamam.owl#recipe_vesuvio",
            "label": "Chicken Vesuvio",
            "source": "Serious Eats",
            "url": "http://www.seriouseats.com/recipes/2011/12/chicken-vesuvio-recipe.html",
            "yield": 4.0,
            "calories": 4228.0,
            "healthLabels": ["Dairy-Free", "Gluten-Free"],
            "ingredientLines": ["1/2 cup olive oil", "1 chicken, cut into pieces"],
            "totalNutrients": {"FAT": {"label": "Fat", "quantity": 274.6, "unit": "g"}}
        }),
        json!({
            "uri": "http://www.edamam.com/ontologies/edamam.owl#recipe_rice_bowl",
            "label": "Vegan Rice Bowl",
            "source": "Food52",
            "url": "https://food52.com/recipes/rice-bowl",
            "yield": 2.0,
            "calories": 820.0,
            "healthLabels": ["Vegan", "Vegetarian"],
            "ingredientLines": ["1 cup rice", "1 banana"],
            "totalNutrients": {"FAT": {"label": "Fat", "quantity": 3.1, "unit": "g"}}
        }),
    ]
}

fn food_match(food: &Value) -> Value {
    let mut record = food.clone();
    let measures = record
        .as_object_mut()
        .and_then(|fields| {
            fields.remove("upc");
            fields.remove("measures")
        })
        .unwrap_or_else(|| json!([]));
    json!({"food": record, "measures": measures})
}

fn label_of(value: &Value) -> String {
    value["label"].as_str().unwrap_or_default().to_lowercase()
}

async fn parse_food(State(hits): State<Hits>, Query(query): Query<QueryPairs>) -> ApiResult {
    authorize(&query, &hits)?;

    let catalog = foods();
    let matched: Vec<&Value> = match (first(&query, "ingr"), first(&query, "upc")) {
        (Some(ingr), _) if !ingr.trim().is_empty() => {
            let text = ingr.to_lowercase();
            catalog
                .iter()
                .filter(|food| text.contains(&label_of(food)))
                .collect()
        }
        (_, Some(upc)) => {
            let found: Vec<&Value> = catalog.iter().filter(|food| food["upc"] == upc).collect();
            if found.is_empty() {
                return Err(error(StatusCode::NOT_FOUND, "No food found for upc"));
            }
            found
        }
        _ => return Err(error(StatusCode::BAD_REQUEST, "Missing ingr or upc")),
    };

    let parsed: Vec<Value> = matched.iter().map(|food| food_match(food)).collect();
    Ok(Json(json!({
        "text": first(&query, "ingr").unwrap_or_default(),
        "parsed": parsed,
        "hints": parsed,
    })))
}

fn line_calories(line: &str, catalog: &[Value]) -> Option<f64> {
    let text = line.to_lowercase();
    let food = catalog.iter().find(|food| text.contains(&label_of(food)))?;
    let amount = text
        .split_whitespace()
        .next()
        .and_then(|word| word.parse::<f64>().ok())
        .unwrap_or(1.0);
    let per_unit = food["nutrients"]["ENERC_KCAL"].as_f64()?;
    Some(amount * per_unit)
}

async fn nutrition_details(
    State(hits): State<Hits>,
    Query(query): Query<QueryPairs>,
    Json(input): Json<NutritionRequest>,
) -> ApiResult {
    authorize(&query, &hits)?;

    if input.ingr.is_empty() {
        return Err(error(StatusCode::UNPROCESSABLE_ENTITY, "No ingredients"));
    }

    let catalog = foods();
    let mut calories = 0.0;
    for line in &input.ingr {
        match line_calories(line, &catalog) {
            Some(amount) => calories += amount,
            None => {
                return Err(error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Unrecognized ingredient line",
                ))
            }
        }
    }

    Ok(Json(json!({
        "uri": format!(
            "http://www.edamam.com/ontologies/edamam.owl#recipe_{}",
            input.title.as_deref().unwrap_or("untitled").to_lowercase().replace(' ', "_")
        ),
        "yield": 1.0,
        "calories": calories,
        "totalWeight": 100.0 * input.ingr.len() as f64,
        "dietLabels": [],
        "healthLabels": ["VEGAN"],
        "cautions": [],
        "totalNutrients": {
            "ENERC_KCAL": {"label": "Energy", "quantity": calories, "unit": "kcal"}
        }
    })))
}

fn has_health_label(recipe: &Value, wanted: &str) -> bool {
    recipe["healthLabels"].as_array().is_some_and(|labels| {
        labels
            .iter()
            .filter_map(Value::as_str)
            .any(|label| label.eq_ignore_ascii_case(wanted))
    })
}

async fn search_recipes(State(hits): State<Hits>, Query(query): Query<QueryPairs>) -> ApiResult {
    authorize(&query, &hits)?;

    if first(&query, "type") != Some("public") {
        return Err(error(StatusCode::BAD_REQUEST, "type must be public"));
    }
    let term = match first(&query, "q") {
        Some(term) if !term.trim().is_empty() => term.to_lowercase(),
        _ => return Err(error(StatusCode::BAD_REQUEST, "Missing q")),
    };
    let health = all(&query, "health");

    let hits_json: Vec<Value> = recipes()
        .into_iter()
        .filter(|recipe| label_of(recipe).contains(&term))
        .filter(|recipe| health.iter().all(|wanted| has_health_label(recipe, wanted)))
        .map(|recipe| json!({"recipe": recipe}))
        .collect();

    let count = hits_json.len();
    Ok(Json(json!({
        "from": if count == 0 { 0 } else { 1 },
        "to": count,
        "count": count,
        "hits": hits_json,
    })))
}
