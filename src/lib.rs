//! MacroPlan Library
//!
//! Core functionality for nutrition profiles and calorie/macro targets.

pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
