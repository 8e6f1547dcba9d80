//! # Event Stream
//!
//! Push-mode delivery: a reader thread owns the transport and forwards each
//! report as a [`TransportEvent`] over a channel. The controller consumes the
//! channel one event at a time, so processing of one report completes before
//! the next is looked at.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, warn};

use super::{HidTransport, TransportEvent};

/// Timed-read period of the reader thread, bounds how long `close` waits
pub const READER_POLL_MS: i32 = 50;

/// Pending events buffered between reader and controller
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Receiving end of a push-mode transport
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::Receiver<TransportEvent>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    ended: bool,
}

impl EventStream {
    /// Moves `transport` into a reader thread and returns its stream.
    ///
    /// The thread exits after forwarding a read error, when the stream is
    /// closed, or when the receiver is dropped. It closes the transport on exit.
    pub fn spawn<T: HidTransport + 'static>(mut transport: T) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);

        let worker = std::thread::Builder::new()
            .name("hid-reader".to_string())
            .spawn(move || {
                while !worker_stop.load(Ordering::Relaxed) {
                    let event = match transport.read_timeout(READER_POLL_MS) {
                        Ok(report) if report.is_empty() => continue,
                        Ok(report) => TransportEvent::Data(report),
                        Err(e) => TransportEvent::Error(e),
                    };
                    let is_error = matches!(event, TransportEvent::Error(_));
                    if tx.blocking_send(event).is_err() || is_error {
                        break;
                    }
                }
                transport.close();
                debug!("HID reader thread stopped");
            })?;

        Ok(Self {
            rx,
            stop,
            worker: Some(worker),
            ended: false,
        })
    }

    /// Wraps an externally fed channel.
    #[must_use]
    pub fn from_receiver(rx: mpsc::Receiver<TransportEvent>) -> Self {
        Self {
            rx,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
            ended: false,
        }
    }

    /// Returns the next event without waiting.
    ///
    /// `None` when nothing is pending or the stream has ended.
    pub fn try_next(&mut self) -> Option<TransportEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.ended = true;
                None
            }
        }
    }

    /// Waits for the next event. `None` once the stream has ended.
    pub async fn next(&mut self) -> Option<TransportEvent> {
        let event = self.rx.recv().await;
        if event.is_none() {
            self.ended = true;
        }
        event
    }

    /// Whether the sending side is gone and every event has been taken.
    ///
    /// A spawned reader has released its transport once this is true.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Stops the reader, discards undelivered events and waits for the
    /// reader thread to release the transport.
    ///
    /// The wait is bounded by one [`READER_POLL_MS`] read.
    pub fn close(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("HID reader thread panicked");
            }
        }
        self.ended = true;
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mocks::ScriptedTransport;
    use crate::transport::TransportError;
    use bytes::Bytes;
    use std::time::Duration;

    #[tokio::test]
    async fn test_spawned_reader_forwards_reports_then_error() {
        let transport = ScriptedTransport::new();
        transport.push_report(&[1, 2, 3, 4, 5, 6, 7]);
        transport.push_empty();
        transport.push_report(&[7, 6, 5, 4, 3, 2, 1]);
        transport.push_error(TransportError::Read("unplugged".to_string()));

        let mut stream = EventStream::spawn(transport.clone()).unwrap();

        assert_eq!(
            stream.next().await,
            Some(TransportEvent::Data(Bytes::from_static(&[1, 2, 3, 4, 5, 6, 7])))
        );
        assert_eq!(
            stream.next().await,
            Some(TransportEvent::Data(Bytes::from_static(&[7, 6, 5, 4, 3, 2, 1])))
        );
        assert_eq!(
            stream.next().await,
            Some(TransportEvent::Error(TransportError::Read("unplugged".to_string())))
        );
        // Reader stops after an error
        assert!(!stream.is_ended());
        assert_eq!(stream.next().await, None);
        assert!(stream.is_ended());
        assert!(transport.is_closed());
        assert!(transport
            .timeouts_seen
            .lock()
            .unwrap()
            .iter()
            .all(|&ms| ms == READER_POLL_MS));
    }

    #[tokio::test]
    async fn test_close_stops_reader() {
        let transport = ScriptedTransport::new();
        let mut stream = EventStream::spawn(transport.clone()).unwrap();

        stream.close();

        // The reader has released the transport by the time close returns
        assert!(transport.is_closed());
        assert!(stream.is_ended());
        assert_eq!(stream.try_next(), None);
    }

    #[test]
    fn test_close_waits_for_blocked_timed_read() {
        let transport = SlowTransport {
            closed: Arc::new(AtomicBool::new(false)),
        };
        let closed = Arc::clone(&transport.closed);
        let mut stream = EventStream::spawn(transport).unwrap();

        // Let the reader enter its first timed read
        std::thread::sleep(Duration::from_millis(10));
        stream.close();
        assert!(closed.load(Ordering::SeqCst));
    }

    /// Transport whose timed reads always run out the full timeout
    struct SlowTransport {
        closed: Arc<AtomicBool>,
    }

    impl HidTransport for SlowTransport {
        fn read_timeout(&mut self, timeout_ms: i32) -> Result<Bytes, TransportError> {
            std::thread::sleep(Duration::from_millis(timeout_ms as u64));
            Ok(Bytes::new())
        }

        fn read_blocking(&mut self) -> Result<Bytes, TransportError> {
            Ok(Bytes::new())
        }

        fn close(&mut self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_from_receiver_try_next() {
        let (tx, rx) = mpsc::channel(4);
        let mut stream = EventStream::from_receiver(rx);
        assert_eq!(stream.try_next(), None);

        tx.try_send(TransportEvent::Data(Bytes::from_static(&[0; 7])))
            .unwrap();
        assert!(matches!(stream.try_next(), Some(TransportEvent::Data(_))));
        assert_eq!(stream.try_next(), None);
        assert!(!stream.is_ended());

        drop(tx);
        assert_eq!(stream.try_next(), None);
        assert!(stream.is_ended());
    }
}
