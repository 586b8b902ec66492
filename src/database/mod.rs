pub mod error;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query_builder;
pub mod store;

pub use error::StoreError;
pub use manager::DatabaseManager;
pub use memory::MemoryTripStore;
pub use postgres::PgTripStore;
pub use store::TripStore;
