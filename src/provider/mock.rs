//! In-memory provider for tests and offline use

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{validate_search, FoodSearchProvider, ProviderError};
use crate::models::{FoodRecord, NutrientSample};
use crate::nutrition::nutrients::{
    CHOLESTEROL, DIETARY_FIBER, ENERGY, ENERGY_ATWATER_GENERAL, PROTEIN, SATURATED_FAT, SODIUM,
    TOTAL_CARBOHYDRATE, TOTAL_FAT,
};

/// Provider serving a fixed list of foods
///
/// Matches on a case-insensitive substring of the description and pages in
/// list order. `set_failing(true)` makes every search fail with a transport
/// error.
pub struct MockFoodProvider {
    foods: Vec<FoodRecord>,
    failing: AtomicBool,
}

impl MockFoodProvider {
    pub fn new(foods: Vec<FoodRecord>) -> Self {
        Self {
            foods,
            failing: AtomicBool::new(false),
        }
    }

    /// A handful of SR Legacy style foods
    pub fn with_sample_foods() -> Self {
        let mut apple = FoodRecord::new(
            171688,
            "Apples, raw, with skin",
            vec![
                NutrientSample::new(ENERGY, "Energy", 52.0, "KCAL"),
                NutrientSample::new(PROTEIN, "Protein", 0.26, "G"),
                NutrientSample::new(TOTAL_FAT, "Total lipid (fat)", 0.17, "G"),
                NutrientSample::new(TOTAL_CARBOHYDRATE, "Carbohydrate, by difference", 13.81, "G"),
                NutrientSample::new(DIETARY_FIBER, "Fiber, total dietary", 2.4, "G"),
                NutrientSample::new(SODIUM, "Sodium, Na", 1.0, "MG"),
            ],
        );
        apple.food_category = Some("Fruits and Fruit Juices".to_string());

        let mut chicken = FoodRecord::new(
            171477,
            "Chicken, breast, meat only, cooked, roasted",
            vec![
                NutrientSample::new(ENERGY, "Energy", 165.0, "KCAL"),
                NutrientSample::new(PROTEIN, "Protein", 31.02, "G"),
                NutrientSample::new(TOTAL_FAT, "Total lipid (fat)", 3.57, "G"),
                NutrientSample::new(SATURATED_FAT, "Fatty acids, total saturated", 1.01, "G"),
                NutrientSample::new(CHOLESTEROL, "Cholesterol", 85.0, "MG"),
                NutrientSample::new(SODIUM, "Sodium, Na", 74.0, "MG"),
            ],
        );
        chicken.food_category = Some("Poultry Products".to_string());

        let mut milk = FoodRecord::new(
            2340760,
            "Milk, whole",
            vec![
                NutrientSample::new(ENERGY_ATWATER_GENERAL, "Energy (Atwater General Factors)", 61.0, "KCAL"),
                NutrientSample::new(PROTEIN, "Protein", 3.27, "G"),
                NutrientSample::new(TOTAL_FAT, "Total lipid (fat)", 3.2, "G"),
                NutrientSample::new(TOTAL_CARBOHYDRATE, "Carbohydrate, by difference", 4.63, "G"),
            ],
        );
        milk.brand_owner = Some("Dairy Farms".to_string());
        milk.food_category = Some("Dairy and Egg Products".to_string());

        Self::new(vec![apple, chicken, milk])
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Default for MockFoodProvider {
    fn default() -> Self {
        Self::with_sample_foods()
    }
}

#[async_trait]
impl FoodSearchProvider for MockFoodProvider {
    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<Vec<FoodRecord>, ProviderError> {
        validate_search(query, page, page_size)?;

        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Transport {
                service: "mock",
                message: "connection refused".to_string(),
            });
        }

        let needle = query.trim().to_lowercase();
        let skip = (page as usize - 1) * page_size as usize;
        Ok(self
            .foods
            .iter()
            .filter(|f| f.description.to_lowercase().contains(&needle))
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_matches_description() {
        let provider = MockFoodProvider::with_sample_foods();
        let foods = provider.search("CHICKEN", 1, 10).await.unwrap();
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].fdc_id, 171477);
    }

    #[tokio::test]
    async fn test_paging() {
        let provider = MockFoodProvider::with_sample_foods();
        // "," appears in every sample description
        let first = provider.search(",", 1, 2).await.unwrap();
        let second = provider.search(",", 2, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert!(provider.search(",", 3, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_not_empty_page() {
        let provider = MockFoodProvider::with_sample_foods();
        provider.set_failing(true);
        let err = provider.search("apple", 1, 10).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport { .. }));
    }
}
