//! # Runtime Adapters
//!
//! Port implementations that live with the executable rather than the
//! bootstrap library.

pub mod storage;

pub use storage::open_store;
