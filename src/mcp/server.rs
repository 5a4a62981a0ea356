//! MacroPlan MCP Server Implementation
//!
//! Implements the MCP server with all MacroPlan tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{ProfileCreate, ProfileUpdate};
use crate::tools::profiles::{self, RecalculateOutcome};
use crate::tools::status::{StatusTracker, PROFILE_INSTRUCTIONS};

/// MacroPlan MCP Service
#[derive(Clone)]
pub struct MacroPlanService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<MacroPlanService>,
}

impl MacroPlanService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateProfileParams {
    /// Name for the profile
    pub name: String,
    /// Current weight in kilograms (must be positive)
    pub weight_kg: Option<f64>,
    /// Height in centimeters (must be positive)
    pub height_cm: Option<f64>,
    /// Age in years (must be positive)
    pub age: Option<i64>,
    /// "male" or "female"
    pub gender: Option<String>,
    /// sedentary, light, moderate, active, or very_active (default moderate)
    pub activity_level: Option<String>,
    /// bulk, cut, or maintain (default maintain)
    pub goal: Option<String>,
    /// Target weight in kilograms (optional, defaults to current weight)
    pub target_weight_kg: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetProfileParams {
    /// Profile ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListProfilesParams {
    /// Maximum results (default 50)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateBodyMetricsParams {
    /// Profile ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New weight in kilograms (optional)
    pub weight_kg: Option<f64>,
    /// New height in centimeters (optional)
    pub height_cm: Option<f64>,
    /// New age in years (optional)
    pub age: Option<i64>,
    /// New gender (optional)
    pub gender: Option<String>,
    /// New activity level (optional)
    pub activity_level: Option<String>,
    /// New goal (optional)
    pub goal: Option<String>,
    /// New target weight in kilograms (optional)
    pub target_weight_kg: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteProfileParams {
    /// Profile ID to delete
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecalculateProfileParams {
    /// Profile ID to recalculate
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateTargetsParams {
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Age in years
    pub age: u32,
    /// "male" or "female"
    pub gender: String,
    /// sedentary, light, moderate, active, or very_active (default moderate)
    #[serde(default = "default_activity_level")]
    pub activity_level: String,
    /// bulk, cut, or maintain (default maintain)
    #[serde(default = "default_goal")]
    pub goal: String,
}

fn default_activity_level() -> String { "moderate".to_string() }
fn default_goal() -> String { "maintain".to_string() }

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl MacroPlanService {
    // --- Status ---

    #[tool(description = "Get the current status of the MacroPlan service including build info, database status, and process information")]
    async fn service_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for managing nutrition profiles and calorie/macro targets. Call this when starting a session or when unsure how to use the profile tools.")]
    fn profile_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(PROFILE_INSTRUCTIONS)]))
    }

    // --- Profiles ---

    #[tool(description = "Create a new nutrition profile. If weight, height, age, and gender are all supplied, calorie/macro targets are calculated immediately.")]
    fn create_profile(&self, Parameters(p): Parameters<CreateProfileParams>) -> Result<CallToolResult, McpError> {
        let data = ProfileCreate {
            name: p.name,
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            age: p.age,
            gender: p.gender,
            activity_level: p.activity_level,
            goal: p.goal,
            target_weight_kg: p.target_weight_kg,
        };
        let result = profiles::create_profile(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get a profile's stored targets and physical stats. Returns what is persisted; never recomputes.")]
    fn get_profile(&self, Parameters(p): Parameters<GetProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::get_profile(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(detail) => serde_json::to_string_pretty(&detail),
            None => Ok(format!(r#"{{"error": "Profile not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List nutrition profiles with pagination")]
    fn list_profiles(&self, Parameters(p): Parameters<ListProfilesParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::list_profiles(&self.database, p.limit, p.offset).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Update a profile's body metrics and settings. Changing weight, height, age, or gender automatically recalculates the derived targets.")]
    fn update_body_metrics(&self, Parameters(p): Parameters<UpdateBodyMetricsParams>) -> Result<CallToolResult, McpError> {
        let data = ProfileUpdate {
            name: p.name,
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            age: p.age,
            gender: p.gender,
            activity_level: p.activity_level,
            goal: p.goal,
            target_weight_kg: p.target_weight_kg,
        };
        let result = profiles::update_body_metrics(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(detail) => serde_json::to_string_pretty(&detail),
            None => Ok(format!(r#"{{"error": "Profile not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete a nutrition profile")]
    fn delete_profile(&self, Parameters(p): Parameters<DeleteProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::delete_profile(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Calculations ---

    #[tool(description = "Recalculate a profile's calorie/macro targets from its stored metrics and persist them. Fails if weight, height, age, or gender is missing.")]
    fn recalculate_profile(&self, Parameters(p): Parameters<RecalculateProfileParams>) -> Result<CallToolResult, McpError> {
        let outcome = profiles::recalculate_profile(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let response = match outcome {
            RecalculateOutcome::Updated(response) => response,
            RecalculateOutcome::NotFound => {
                return Err(McpError::invalid_params(format!("Profile {} not found", p.id), None));
            }
            RecalculateOutcome::MissingInputs(missing) => {
                return Err(McpError::invalid_params(
                    format!("Missing required profile information: {}", missing.join(", ")),
                    None,
                ));
            }
        };
        let json = serde_json::to_string_pretty(&response).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Calculate BMR, TDEE, target calories, and macro targets for the given metrics without saving anything. Rejects invalid gender or activity_level.")]
    fn calculate_targets(&self, Parameters(p): Parameters<CalculateTargetsParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::calculate_targets(
            p.weight_kg,
            p.height_cm,
            p.age,
            &p.gender,
            &p.activity_level,
            &p.goal,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for MacroPlanService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "macroplan".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("MacroPlan".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "MacroPlan - nutrition profiles and calorie/macro targets. \
                 IMPORTANT: Call profile_instructions when starting a session. \
                 Profiles: create_profile, get_profile, list_profiles, update_body_metrics, delete_profile. \
                 Targets: recalculate_profile (persists, requires complete metrics), \
                 calculate_targets (stateless one-off calculation, nothing saved). \
                 Targets derive from Mifflin-St Jeor BMR, activity-scaled TDEE, \
                 goal-based surplus/deficit, and goal-ratio macro splits."
                    .into(),
            ),
        }
    }
}
