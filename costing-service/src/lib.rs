//! Client, system and cost-quotation service for solar installations.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;
