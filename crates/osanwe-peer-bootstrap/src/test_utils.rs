//! Test utilities for peer bootstrap.
//!
//! This module provides controllable implementations of the outbound ports.
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust
//! use osanwe_peer_bootstrap::test_utils::FixedTimeSource;
//! use osanwe_peer_bootstrap::ports::TimeSource;
//!
//! let time_source = FixedTimeSource::from_secs(1000);
//! assert_eq!(time_source.now().as_secs(), 1000);
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::adapters::InMemoryKvStore;
use crate::domain::{StoreError, Timestamp, TransportError};
use crate::ports::{Connection, KeyValueStore, Namespace, ScanResult, TimeSource};

/// A time source that returns a settable timestamp.
#[derive(Debug, Default)]
pub struct FixedTimeSource {
    nanos: AtomicU64,
}

impl FixedTimeSource {
    /// Fixed at `nanos` nanoseconds since the epoch.
    pub fn new(nanos: u64) -> Self {
        Self {
            nanos: AtomicU64::new(nanos),
        }
    }

    /// Fixed at whole seconds since the epoch.
    pub fn from_secs(secs: u64) -> Self {
        Self::new(Timestamp::from_secs(secs).as_nanos())
    }

    /// Move the clock.
    pub fn set(&self, ts: Timestamp) {
        self.nanos.store(ts.as_nanos(), Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// In-memory store whose writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct FailingKvStore {
    inner: InMemoryKvStore,
    fail_puts: AtomicBool,
    fail_scans: AtomicBool,
}

impl FailingKvStore {
    /// A store that behaves normally until told otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail (or succeed again).
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `scan` fail (or succeed again).
    pub fn fail_scans(&self, fail: bool) {
        self.fail_scans.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for FailingKvStore {
    fn get(&self, namespace: Namespace, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(namespace, key)
    }

    fn put(&self, namespace: Namespace, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                message: "injected write failure".into(),
            });
        }
        self.inner.put(namespace, key, value)
    }

    fn scan(&self, namespace: Namespace) -> Result<ScanResult, StoreError> {
        if self.fail_scans.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                message: "injected scan failure".into(),
            });
        }
        self.inner.scan(namespace)
    }
}

/// In-memory connection with preloaded inbound frames.
///
/// Frames sent through it are captured in a shared buffer the test keeps.
pub struct ScriptedConnection {
    peer_addr: SocketAddr,
    local_addr: SocketAddr,
    inbound: VecDeque<Vec<u8>>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl ScriptedConnection {
    /// Connection from `peer_addr` to `local_addr` that will deliver `inbound`.
    pub fn new(peer_addr: SocketAddr, local_addr: SocketAddr, inbound: Vec<Vec<u8>>) -> Self {
        Self {
            peer_addr,
            local_addr,
            inbound: inbound.into(),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the frames written by the code under test.
    pub fn sent(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.sent)
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    async fn send_frame(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        self.sent.lock().push(payload.to_vec());
        Ok(())
    }

    async fn recv_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        self.inbound.pop_front().ok_or(TransportError::Closed)
    }
}
