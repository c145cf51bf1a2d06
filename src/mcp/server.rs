//! NutriFacts MCP Server Implementation
//!
//! Implements the MCP server with all NutriFacts tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::Database;
use crate::nutrition::LabelEngine;
use crate::provider::FoodSearchProvider;
use crate::render::RenderFormat;
use crate::tools::foods::{self, DEFAULT_PAGE_SIZE};
use crate::tools::label;
use crate::tools::selection;
use crate::tools::status::StatusTracker;

/// NutriFacts MCP Service
#[derive(Clone)]
pub struct NutriFactsService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    config: Arc<Config>,
    database: Database,
    provider: Arc<dyn FoodSearchProvider>,
    engine: Arc<LabelEngine>,
    tool_router: ToolRouter<NutriFactsService>,
}

impl NutriFactsService {
    pub fn new(config: Config, database: Database, provider: Arc<dyn FoodSearchProvider>) -> Self {
        let tracker = StatusTracker::new(config.database_path.clone(), config.usda.api_key.is_some());
        Self {
            status_tracker: Arc::new(Mutex::new(tracker)),
            config: Arc::new(config),
            database,
            provider,
            engine: Arc::new(LabelEngine::standard()),
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Search Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    /// Search text, e.g. "cheddar cheese"
    pub query: String,
    /// Page number starting at 1 (default 1)
    #[serde(default = "default_page")]
    pub page: u32,
    /// Results per page, 1 to 200 (default 25)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 { 1 }
fn default_page_size() -> u32 { DEFAULT_PAGE_SIZE }

// ============================================================================
// Label Entry Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodToLabelParams {
    /// FoodData Central id from search_foods
    pub fdc_id: i64,
    /// Number of units, up to 1000000 (default 1)
    pub quantity: Option<f64>,
    /// Household unit: cup, tbsp, tsp, fl oz, oz, slice, gr/ml (default cup)
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateLabelEntryParams {
    /// Entry id from list_label_entries
    pub entry_id: i64,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveLabelEntryParams {
    /// Entry id from list_label_entries
    pub entry_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetServingsParams {
    /// Servings in the container, greater than 0 and at most 10000
    pub servings_per_container: f64,
}

// ============================================================================
// Export Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportLabelParams {
    /// Output file; relative paths go in the export directory
    pub path: Option<String>,
    /// "pdf" or "text" (default from the file extension, else pdf)
    pub format: Option<String>,
}

impl NutriFactsService {
    fn export_path(&self, p: &ExportLabelParams) -> Result<PathBuf, String> {
        match &p.path {
            Some(path) => Ok(self.config.resolve_export_path(path)),
            None => {
                let format: RenderFormat = match &p.format {
                    Some(name) => name.parse().map_err(|e: crate::render::RenderError| e.to_string())?,
                    None => RenderFormat::Pdf,
                };
                let name = format!(
                    "nutrition-label-{}.{}",
                    chrono::Local::now().format("%Y%m%d-%H%M%S"),
                    format.extension()
                );
                Ok(self.config.export_dir.join(name))
            }
        }
    }
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl NutriFactsService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriFacts service including build info, database status, label size, and process information")]
    async fn nutrifacts_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        to_json(&status)
    }

    #[tool(description = "Get step-by-step instructions for building a nutrition label. Call this when starting a new label or when unsure how to use the tools.")]
    fn label_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LABEL_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LABEL_INSTRUCTIONS)]))
    }

    // --- Foods ---

    #[tool(description = "Search USDA FoodData Central for foods. Returns one page of results with fdc_id, description, brand owner and food category")]
    async fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::search_foods(&self.database, self.provider.as_ref(), &p.query, p.page, p.page_size)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List the household units and their gram equivalents")]
    fn list_household_units(&self) -> Result<CallToolResult, McpError> {
        to_json(&foods::list_household_units(&self.engine))
    }

    // --- Label Entries ---

    #[tool(description = "Add a searched food to the label with a quantity and household unit (default 1 cup)")]
    fn add_food_to_label(&self, Parameters(p): Parameters<AddFoodToLabelParams>) -> Result<CallToolResult, McpError> {
        let result = selection::add_food_to_label(&self.database, &self.engine, p.fdc_id, p.quantity, p.unit.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Change the quantity and/or unit of one label entry")]
    fn update_label_entry(&self, Parameters(p): Parameters<UpdateLabelEntryParams>) -> Result<CallToolResult, McpError> {
        let result = selection::update_label_entry(&self.database, &self.engine, p.entry_id, p.quantity, p.unit.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Remove one entry from the label")]
    fn remove_label_entry(&self, Parameters(p): Parameters<RemoveLabelEntryParams>) -> Result<CallToolResult, McpError> {
        let result = selection::remove_label_entry(&self.database, p.entry_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List the foods on the label with their entry ids, servings and resolved gram weights")]
    fn list_label_entries(&self) -> Result<CallToolResult, McpError> {
        let result = selection::list_label_entries(&self.database, &self.engine)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Remove every food from the label")]
    fn clear_label(&self) -> Result<CallToolResult, McpError> {
        let result = selection::clear_label(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Set the number of servings per container (greater than 0, at most 10000)")]
    fn set_servings_per_container(&self, Parameters(p): Parameters<SetServingsParams>) -> Result<CallToolResult, McpError> {
        let result = selection::set_servings_per_container(&self.database, p.servings_per_container)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Label ---

    #[tool(description = "Get the Nutrition Facts label for the current foods: per-serving and total amounts, % Daily Value, ingredients, and a text rendering")]
    fn get_nutrition_label(&self) -> Result<CallToolResult, McpError> {
        let result = label::get_nutrition_label(&self.database, &self.engine)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Export the Nutrition Facts label as a PDF or text file")]
    fn export_nutrition_label(&self, Parameters(p): Parameters<ExportLabelParams>) -> Result<CallToolResult, McpError> {
        let path = self.export_path(&p).map_err(|e| McpError::internal_error(e, None))?;
        let result = label::export_nutrition_label(&self.database, &self.engine, &path, p.format.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

#[tool_handler]
impl ServerHandler for NutriFactsService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrifacts".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriFacts Label Builder".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriFacts - Nutrition Facts labels from USDA FoodData Central. \
                 IMPORTANT: Call label_instructions before building a label. \
                 Foods: search_foods, list_household_units. \
                 Label: add_food_to_label, update_label_entry, remove_label_entry, list_label_entries, \
                 clear_label, set_servings_per_container. \
                 Output: get_nutrition_label, export_nutrition_label. \
                 Status: nutrifacts_status."
                    .into(),
            ),
        }
    }
}
