//! Session storage adapters.

mod file_store;
mod in_memory_store;

pub use file_store::FileSessionStore;
pub use in_memory_store::InMemorySessionStore;
