//! Food search tools
//!
//! Searching FoodData Central and caching the results so they can be added
//! to the label.

use serde::Serialize;

use crate::db::Database;
use crate::models::FoodRecord;
use crate::nutrition::{HouseholdUnit, LabelEngine, DEFAULT_UNIT};
use crate::provider::FoodSearchProvider;

/// Foods per page when the caller does not say
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// One row of the search grid
#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub fdc_id: i64,
    pub description: String,
    pub brand_owner: Option<String>,
    pub food_category: Option<String>,
    pub nutrient_count: usize,
}

impl From<&FoodRecord> for FoodSummary {
    fn from(food: &FoodRecord) -> Self {
        Self {
            fdc_id: food.fdc_id,
            description: food.description.clone(),
            brand_owner: food.brand_owner.clone(),
            food_category: food.food_category.clone(),
            nutrient_count: food.nutrients.len(),
        }
    }
}

/// Response for search_foods
#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    pub foods: Vec<FoodSummary>,
    pub has_previous: bool,
    pub next_page: Option<u32>,
    pub message: Option<String>,
}

/// Search for foods and cache every result
pub async fn search_foods(
    db: &Database,
    provider: &dyn FoodSearchProvider,
    query: &str,
    page: u32,
    page_size: u32,
) -> Result<SearchFoodsResponse, String> {
    let foods = provider.search(query, page, page_size).await.map_err(|e| {
        tracing::warn!(query, page, error = %e, "Food search failed");
        e.to_string()
    })?;

    // Foods already on the label keep the copy their entries were built from
    let pinned = db
        .with_transaction(|tx| {
            let mut pinned = 0;
            for food in &foods {
                if !FoodRecord::upsert(tx, food)? {
                    pinned += 1;
                }
            }
            Ok(pinned)
        })
        .map_err(|e| e.to_string())?;
    if pinned > 0 {
        tracing::debug!(pinned, "Kept cached copies of foods on the label");
    }

    // A full page means there may be more
    let next_page = if foods.len() as u32 == page_size { Some(page + 1) } else { None };
    let message = if foods.is_empty() {
        Some("No results found.".to_string())
    } else {
        None
    };

    Ok(SearchFoodsResponse {
        query: query.trim().to_string(),
        page,
        page_size,
        foods: foods.iter().map(FoodSummary::from).collect(),
        has_previous: page > 1,
        next_page,
        message,
    })
}

/// Response for list_household_units
#[derive(Debug, Serialize)]
pub struct HouseholdUnitsResponse {
    pub units: Vec<HouseholdUnit>,
    pub default_unit: &'static str,
    pub unknown_unit_grams: f64,
}

pub fn list_household_units(engine: &LabelEngine) -> HouseholdUnitsResponse {
    HouseholdUnitsResponse {
        units: engine.units().units(),
        default_unit: DEFAULT_UNIT,
        unknown_unit_grams: crate::nutrition::units::FALLBACK_FACTOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::provider::MockFoodProvider;

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        db
    }

    #[tokio::test]
    async fn test_search_caches_results() {
        let db = setup();
        let provider = MockFoodProvider::with_sample_foods();

        let response = search_foods(&db, &provider, "milk", 1, 10).await.unwrap();
        assert_eq!(response.foods.len(), 1);
        assert_eq!(response.foods[0].brand_owner.as_deref(), Some("Dairy Farms"));
        assert!(!response.has_previous);
        assert_eq!(response.next_page, None);
        assert!(response.message.is_none());

        let cached = db
            .with_conn(|conn| FoodRecord::get_by_fdc_id(conn, 2340760))
            .unwrap()
            .unwrap();
        assert_eq!(cached.description, "Milk, whole");
        assert_eq!(cached.nutrients.len(), 4);
    }

    #[tokio::test]
    async fn test_pagination_flags() {
        let db = setup();
        let provider = MockFoodProvider::with_sample_foods();

        let first = search_foods(&db, &provider, ",", 1, 2).await.unwrap();
        assert!(!first.has_previous);
        assert_eq!(first.next_page, Some(2));

        let second = search_foods(&db, &provider, ",", 2, 2).await.unwrap();
        assert!(second.has_previous);
        assert_eq!(second.next_page, None);
    }

    #[tokio::test]
    async fn test_no_results_message() {
        let db = setup();
        let provider = MockFoodProvider::with_sample_foods();
        let response = search_foods(&db, &provider, "durian", 1, 10).await.unwrap();
        assert!(response.foods.is_empty());
        assert_eq!(response.message.as_deref(), Some("No results found."));
    }

    #[tokio::test]
    async fn test_provider_failure_is_error() {
        let db = setup();
        let provider = MockFoodProvider::with_sample_foods();
        provider.set_failing(true);
        assert!(search_foods(&db, &provider, "apple", 1, 10).await.is_err());
    }

    #[tokio::test]
    async fn test_search_does_not_change_foods_on_label() {
        let db = setup();
        let engine = LabelEngine::standard();
        search_foods(&db, &MockFoodProvider::with_sample_foods(), "milk", 1, 10).await.unwrap();
        crate::tools::selection::add_food_to_label(&db, &engine, 2340760, None, None).unwrap();

        let mut revised = FoodRecord::new(
            2340760,
            "Milk, whole",
            vec![crate::models::NutrientSample::new(2047, "Energy (Atwater General Factors)", 99.0, "KCAL")],
        );
        revised.brand_owner = Some("Dairy Farms".to_string());
        search_foods(&db, &MockFoodProvider::new(vec![revised]), "milk", 1, 10).await.unwrap();

        let cached = db
            .with_conn(|conn| FoodRecord::get_by_fdc_id(conn, 2340760))
            .unwrap()
            .unwrap();
        assert_eq!(cached.nutrient(2047).map(|n| n.amount_per_100), Some(61.0));
        assert_eq!(cached.nutrients.len(), 4);
    }

    #[test]
    fn test_list_household_units() {
        let response = list_household_units(&LabelEngine::standard());
        assert_eq!(response.default_unit, "cup");
        let cup = response.units.iter().find(|u| u.name == "cup").unwrap();
        assert_eq!(cup.grams, 240.0);
        assert_eq!(response.units.len(), 7);
    }
}
