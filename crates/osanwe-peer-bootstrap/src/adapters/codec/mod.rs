//! Codec Adapters
//!
//! Implementations of the `RecordCodec` port.

mod bincode;

pub use self::bincode::{BincodeCodec, CODEC_VERSION};
