//! FoodBuddy Library
//!
//! Meal planning backend: a unit catalog and converter, SQLite storage for
//! tags, ingredients and recipes, and the REST API over them.

pub mod build_info;
pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod seed;
pub mod service;
pub mod units;
