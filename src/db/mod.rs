pub mod context;
pub mod log;
pub mod memory;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod repository;
pub mod stats;

pub use context::QueryContext;
pub use memory::MemoryStore;
pub use pool::SqliteStore;
pub use repository::ScoreStore;
