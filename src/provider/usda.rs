//! USDA FoodData Central search client
//!
//! Calls `GET {base_url}/foods/search` and maps the result into
//! [`FoodRecord`]s. Application-level retry is left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{validate_search, FoodSearchProvider, ProviderError};
use crate::models::{FoodRecord, NutrientSample};

const SERVICE: &str = "USDA FoodData Central";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// USDA client configuration
#[derive(Debug, Clone)]
pub struct UsdaConfig {
    /// API key from <https://fdc.nal.usda.gov/api-key-signup.html>
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for UsdaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl UsdaConfig {
    /// Read `USDA_API_KEY`, `USDA_API_URL` and `USDA_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("USDA_API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            base_url: std::env::var("USDA_API_URL").unwrap_or(defaults.base_url),
            timeout_secs: std::env::var("USDA_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFood {
    fdc_id: i64,
    description: String,
    brand_owner: Option<String>,
    food_category: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<SearchNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNutrient {
    nutrient_id: Option<i64>,
    #[serde(default)]
    nutrient_name: String,
    #[serde(default)]
    unit_name: String,
    value: Option<f64>,
}

impl From<SearchFood> for FoodRecord {
    fn from(food: SearchFood) -> Self {
        let nutrients = food
            .food_nutrients
            .into_iter()
            .filter_map(|n| {
                let nutrient_id = n.nutrient_id?;
                let value = n.value?;
                Some(NutrientSample {
                    nutrient_id,
                    name: n.nutrient_name,
                    amount_per_100: value.max(0.0),
                    unit: n.unit_name,
                })
            })
            .collect();

        Self {
            fdc_id: food.fdc_id,
            description: food.description,
            brand_owner: food.brand_owner,
            food_category: food.food_category,
            nutrients,
        }
    }
}

/// Decode a `/foods/search` response body
pub fn parse_search_response(body: &str) -> Result<Vec<FoodRecord>, ProviderError> {
    let response: SearchResponse = serde_json::from_str(body).map_err(|e| ProviderError::Decode {
        service: SERVICE,
        message: e.to_string(),
    })?;
    Ok(response.foods.into_iter().map(FoodRecord::from).collect())
}

// ============================================================================
// Client
// ============================================================================

/// FoodData Central API client
pub struct UsdaClient {
    config: UsdaConfig,
    http_client: reqwest::Client,
}

impl UsdaClient {
    pub fn new(config: UsdaConfig) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Transport {
                service: SERVICE,
                message: e.to_string(),
            })?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &UsdaConfig {
        &self.config
    }
}

#[async_trait]
impl FoodSearchProvider for UsdaClient {
    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<Vec<FoodRecord>, ProviderError> {
        validate_search(query, page, page_size)?;
        let api_key = self.config.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;

        let url = format!("{}/foods/search", self.config.base_url.trim_end_matches('/'));
        tracing::info!(query, page, page_size, "Searching FoodData Central");

        let page_number = page.to_string();
        let page_size_param = page_size.to_string();
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", query),
                ("pageNumber", page_number.as_str()),
                ("pageSize", page_size_param.as_str()),
                ("api_key", api_key),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::Authentication {
                service: SERVICE,
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await.map_err(|e| ProviderError::Transport {
            service: SERVICE,
            message: e.to_string(),
        })?;

        let foods = parse_search_response(&body)?;
        tracing::info!(query, page, results = foods.len(), "FoodData Central search complete");
        Ok(foods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"{
        "totalHits": 2,
        "currentPage": 1,
        "totalPages": 1,
        "foods": [
            {
                "fdcId": 454004,
                "description": "APPLE",
                "dataType": "Branded",
                "brandOwner": "TREECRISP 2 GO",
                "foodCategory": "Pre-Packaged Fruit & Vegetables",
                "foodNutrients": [
                    {"nutrientId": 1003, "nutrientName": "Protein", "unitName": "G", "value": 0.0},
                    {"nutrientId": 1008, "nutrientName": "Energy", "unitName": "KCAL", "value": 52.0},
                    {"nutrientId": 1093, "nutrientName": "Sodium, Na", "unitName": "MG"},
                    {"nutrientId": 1004, "nutrientName": "Total lipid (fat)", "unitName": "G", "value": -0.1}
                ]
            },
            {
                "fdcId": 171688,
                "description": "Apples, raw, with skin"
            }
        ]
    }"#;

    #[test]
    fn test_parse_search_response() {
        let foods = parse_search_response(SEARCH_BODY).unwrap();
        assert_eq!(foods.len(), 2);

        let first = &foods[0];
        assert_eq!(first.fdc_id, 454004);
        assert_eq!(first.brand_owner.as_deref(), Some("TREECRISP 2 GO"));
        assert_eq!(first.food_category.as_deref(), Some("Pre-Packaged Fruit & Vegetables"));
        // The sodium sample has no value and is dropped
        assert_eq!(first.nutrients.len(), 3);
        assert_eq!(first.nutrient(1008).unwrap().unit, "KCAL");
        assert_eq!(first.nutrient(1004).unwrap().amount_per_100, 0.0);

        assert!(foods[1].nutrients.is_empty());
        assert!(foods[1].brand_owner.is_none());
    }

    #[test]
    fn test_missing_foods_is_empty_page() {
        assert!(parse_search_response(r#"{"totalHits": 0}"#).unwrap().is_empty());
    }

    #[test]
    fn test_bad_body_is_decode_error() {
        let err = parse_search_response("<html>").unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = UsdaClient::new(UsdaConfig::default()).unwrap();
        let err = client.search("apple", 1, 10).await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_invalid_request_checked_before_key() {
        let client = UsdaClient::new(UsdaConfig::default()).unwrap();
        let err = client.search("", 1, 10).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }
}
