//! MacroPlan tools module
//!
//! MCP tool implementations for nutrition profiles.

pub mod profiles;
pub mod status;
