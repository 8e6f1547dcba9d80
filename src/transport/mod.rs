//! # Transport Module
//!
//! HID transport abstraction between the joystick and the report pipeline.
//!
//! This module handles:
//! - Timed and blocking report reads ([`HidTransport`])
//! - Opening the joystick through hidapi ([`hid::HidapiTransport`])
//! - Background reading for push delivery ([`events::EventStream`])

pub mod hid;
pub mod events;

use bytes::Bytes;

pub use crate::error::TransportError;

/// Item delivered by a push-mode transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// One input report
    Data(Bytes),
    /// Read failure; the stream ends after this event
    Error(TransportError),
}

/// Trait for HID report reads
#[cfg_attr(test, mockall::automock)]
pub trait HidTransport: Send {
    /// Reads one report, waiting at most `timeout_ms` (0 = do not wait).
    ///
    /// Returns an empty buffer when no report arrived in time.
    fn read_timeout(&mut self, timeout_ms: i32) -> Result<Bytes, TransportError>;

    /// Reads one report, blocking until it arrives.
    fn read_blocking(&mut self) -> Result<Bytes, TransportError>;

    /// Whether [`HidTransport::read_timeout`] is available.
    fn supports_timed_read(&self) -> bool {
        true
    }

    /// Releases the device. Later reads fail with [`TransportError::Closed`].
    fn close(&mut self);
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Transport replaying queued read results
    #[derive(Clone)]
    pub struct ScriptedTransport {
        pub reads: Arc<Mutex<VecDeque<Result<Bytes, TransportError>>>>,
        pub timeouts_seen: Arc<Mutex<Vec<i32>>>,
        pub blocking_reads: Arc<Mutex<usize>>,
        pub closed: Arc<Mutex<bool>>,
        pub timed: bool,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self {
                reads: Arc::new(Mutex::new(VecDeque::new())),
                timeouts_seen: Arc::new(Mutex::new(Vec::new())),
                blocking_reads: Arc::new(Mutex::new(0)),
                closed: Arc::new(Mutex::new(false)),
                timed: true,
            }
        }

        /// Transport that only offers blocking reads
        pub fn blocking_only() -> Self {
            Self {
                timed: false,
                ..Self::new()
            }
        }

        pub fn push_report(&self, report: &[u8]) {
            self.reads
                .lock()
                .unwrap()
                .push_back(Ok(Bytes::copy_from_slice(report)));
        }

        pub fn push_empty(&self) {
            self.reads.lock().unwrap().push_back(Ok(Bytes::new()));
        }

        pub fn push_error(&self, error: TransportError) {
            self.reads.lock().unwrap().push_back(Err(error));
        }

        pub fn is_closed(&self) -> bool {
            *self.closed.lock().unwrap()
        }

        fn next(&self) -> Result<Bytes, TransportError> {
            if self.is_closed() {
                return Err(TransportError::Closed);
            }
            self.reads
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Bytes::new()))
        }
    }

    impl HidTransport for ScriptedTransport {
        fn read_timeout(&mut self, timeout_ms: i32) -> Result<Bytes, TransportError> {
            self.timeouts_seen.lock().unwrap().push(timeout_ms);
            self.next()
        }

        fn read_blocking(&mut self) -> Result<Bytes, TransportError> {
            *self.blocking_reads.lock().unwrap() += 1;
            self.next()
        }

        fn supports_timed_read(&self) -> bool {
            self.timed
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }
}
