pub mod app;
pub mod assistant;
pub mod catalog;
pub mod config;
pub mod models;
pub mod providers;
