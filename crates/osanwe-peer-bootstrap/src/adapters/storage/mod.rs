//! Storage Adapters
//!
//! Implementations of the `KeyValueStore` port.

mod file;
mod memory;

pub use file::FileBackedKvStore;
pub use memory::InMemoryKvStore;
