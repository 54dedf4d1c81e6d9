//! Classbook core: academic record models, the records API client, and the relational view engine.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod views;
