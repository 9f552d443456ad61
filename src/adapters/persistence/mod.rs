//! Persistence adapters: in-memory and SQLite stores, plus the seed file loader.

pub mod memory_store;
pub mod seed_json;
pub mod sqlite_repo;

pub use memory_store::MemoryStore;
pub use seed_json::load_catalog;
pub use sqlite_repo::SqliteRepo;
