pub mod executor;
pub mod store;

pub use executor::{Executor, SyncExecutor};
pub use store::{DocumentStore, InMemoryDocumentStore, SharedBytes, StoreError};
