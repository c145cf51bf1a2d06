//! Food search providers
//!
//! The label engine only needs pages of [`FoodRecord`]s; where they come from
//! is behind [`FoodSearchProvider`].

pub mod mock;
pub mod usda;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::FoodRecord;

pub use mock::MockFoodProvider;
pub use usda::{UsdaClient, UsdaConfig};

/// Largest page the provider accepts
pub const MAX_PAGE_SIZE: u32 = 200;

/// Provider failures
///
/// Distinct from an empty page: a failed search never looks like "no results".
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Missing USDA API key (set USDA_API_KEY)")]
    MissingApiKey,

    #[error("Invalid search request: {0}")]
    InvalidRequest(String),

    #[error("Authentication with {service} failed (HTTP {status})")]
    Authentication { service: &'static str, status: u16 },

    #[error("{service} request failed: {message}")]
    Transport { service: &'static str, message: String },

    #[error("{service} returned HTTP {status}: {body}")]
    Status { service: &'static str, status: u16, body: String },

    #[error("{service} response could not be decoded: {message}")]
    Decode { service: &'static str, message: String },
}

/// Source of food records
#[async_trait]
pub trait FoodSearchProvider: Send + Sync {
    /// One page of foods matching `query`; pages start at 1
    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<Vec<FoodRecord>, ProviderError>;
}

/// Check query and paging arguments
pub fn validate_search(query: &str, page: u32, page_size: u32) -> Result<(), ProviderError> {
    if query.trim().is_empty() {
        return Err(ProviderError::InvalidRequest("Search query cannot be empty".to_string()));
    }
    if page == 0 {
        return Err(ProviderError::InvalidRequest("Page numbers start at 1".to_string()));
    }
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ProviderError::InvalidRequest(format!(
            "Page size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }
    Ok(())
}
