//! NutriFacts Library
//!
//! Nutrition Facts label building from USDA FoodData Central data.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod provider;
pub mod render;
pub mod tools;
