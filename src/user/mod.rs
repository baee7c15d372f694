pub mod handlers;
pub mod memory_repository;
pub mod models;
pub mod query;
pub mod repository;
