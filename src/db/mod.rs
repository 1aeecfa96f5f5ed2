pub mod initialize;
pub mod log;
pub mod pool;
pub mod repository;
pub mod store;

pub use pool::DbPool;
pub use repository::{LedgerSnapshot, Repository};
pub use store::{BlobStore, MemoryStore};
