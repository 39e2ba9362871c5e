//! # Address Book Indices
//!
//! In-memory mirror of the durable address book.
//!
//! - Primary index: node id -> record
//! - Secondary index: IPv4 -> record (last writer wins; IPs are not identity)
//!
//! The indices do no locking and no I/O; the registry service wraps them in a
//! reader/writer lock and persists before mutating.

mod index;

pub use index::AddressBookIndex;

#[cfg(test)]
mod tests;
