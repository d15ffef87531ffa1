pub mod config;
pub mod database;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod seed;
pub mod utils;

pub use database::Database;
