pub mod base;
pub mod file_store;
pub mod memory_store;
pub mod no_store;

// Re-export the primary store items so code outside can do
// "use crate::store::{TokenStore, create_token_store};"
pub use base::{create_token_store, TokenStore};
pub use file_store::FileTokenStore;
pub use memory_store::MemoryTokenStore;
pub use no_store::NoStore;
