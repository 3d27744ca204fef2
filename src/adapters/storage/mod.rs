//! Storage Adapters
//!
//! - **InMemoryStore** - All store ports in memory (testing/development)
//!
//! PostgreSQL implementations live in `adapters::postgres`.
//!
//! ```ignore
//! let store = Arc::new(InMemoryStore::new());
//! let comments: Arc<dyn CommentRepository> = store.clone();
//! let purchases: Arc<dyn PurchaseRepository> = store;
//! ```

mod in_memory_store;

pub use in_memory_store::InMemoryStore;
