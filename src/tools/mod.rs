//! NutriFacts Tools module
//!
//! MCP tool implementations for building nutrition labels.

pub mod foods;
pub mod label;
pub mod selection;
pub mod status;
