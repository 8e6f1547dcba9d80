//! # Joystick Delivery Controller
//!
//! Runs each incoming report through decode, normalize and smoothing, keeps
//! the latest snapshot, and delivers it in one of two modes chosen at
//! construction:
//!
//! - **Events (push)**: reports arrive on an [`EventStream`]. Each one is
//!   processed, cached and handed to every `data` subscriber in order.
//! - **Poll (pull)**: the caller asks for state with [`Joystick::poll`].
//!   When no fresh report is available, or the read fails, the cached
//!   snapshot is returned instead. Poll reads never notify subscribers.
//!
//! A device that fails to open leaves the joystick without a handle: it
//! never delivers events and every read returns the cache (`None`).
//!
//! ## Usage
//!
//! ```no_run
//! use extreme3d_hid::controller::joystick::{Joystick, JoystickOptions};
//!
//! let options = JoystickOptions {
//!     use_events: false,
//!     smoothing_enabled: true,
//!     ..JoystickOptions::default()
//! };
//! let mut joystick = Joystick::open(&options)?;
//!
//! if let Some(state) = joystick.poll(10) {
//!     println!("roll: {:.3}", state.normalized_roll);
//! }
//! joystick.close();
//! # Ok::<(), extreme3d_hid::error::JoystickError>(())
//! ```

use bytes::Bytes;
use tracing::{debug, info, warn};

use super::cache::StateCache;
use super::smoothing::{validate_alpha, SmoothingFilter, DEFAULT_ALPHA};
use super::topics::{Subscribers, Topic};
use crate::error::{JoystickError, Result, TransportError};
use crate::report::protocol::{DEFAULT_PRODUCT_ID, DEFAULT_VENDOR_ID};
use crate::report::{process_report, ControlSnapshot};
use crate::transport::events::EventStream;
use crate::transport::hid::HidapiTransport;
use crate::transport::{HidTransport, TransportEvent};

/// Construction options
#[derive(Debug, Clone, PartialEq)]
pub struct JoystickOptions {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Push delivery when true, pull delivery otherwise
    pub use_events: bool,
    pub smoothing_enabled: bool,
    pub smoothing_alpha: f64,
}

impl Default for JoystickOptions {
    fn default() -> Self {
        Self {
            vendor_id: DEFAULT_VENDOR_ID,
            product_id: DEFAULT_PRODUCT_ID,
            use_events: true,
            smoothing_enabled: false,
            smoothing_alpha: DEFAULT_ALPHA,
        }
    }
}

/// Delivery mode, fixed for the joystick's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    Events,
    Poll,
}

/// Device handle as seen by the controller
enum Link {
    Poll(Box<dyn HidTransport>),
    Events(EventStream),
    /// Never opened, closed, or the event stream ended
    Detached,
}

/// Joystick state pipeline bound to one device handle
pub struct Joystick {
    mode: DeliveryMode,
    link: Link,
    filter: SmoothingFilter,
    cache: StateCache,
    subscribers: Subscribers,
}

impl std::fmt::Debug for Joystick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Joystick")
            .field("mode", &self.mode)
            .field("open", &self.is_open())
            .field("filter", &self.filter)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}

impl Joystick {
    /// Open the joystick described by `options` over hidapi
    ///
    /// A device that cannot be opened is logged and yields a joystick with
    /// no handle rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `options.smoothing_alpha` is not in (0, 1].
    pub fn open(options: &JoystickOptions) -> Result<Self> {
        // Reject bad options before touching the device
        validate_alpha(options.smoothing_alpha)?;

        match HidapiTransport::open(options.vendor_id, options.product_id) {
            Ok(transport) => Self::with_transport(transport, options),
            Err(e) => {
                warn!("{}; no data will be delivered", e);
                Self::detached(options)
            }
        }
    }

    /// Build a joystick over an already opened transport
    ///
    /// In event mode the transport is moved into a reader thread.
    pub fn with_transport<T: HidTransport + 'static>(
        transport: T,
        options: &JoystickOptions,
    ) -> Result<Self> {
        let mut joystick = Self::detached(options)?;
        joystick.link = if options.use_events {
            match EventStream::spawn(transport) {
                Ok(stream) => Link::Events(stream),
                Err(e) => {
                    warn!("Failed to start HID reader thread: {}", e);
                    Link::Detached
                }
            }
        } else {
            Link::Poll(Box::new(transport))
        };
        info!("Joystick ready in {:?} mode", joystick.mode);
        Ok(joystick)
    }

    /// Build an event-mode joystick fed by an existing stream
    pub fn with_event_stream(stream: EventStream, options: &JoystickOptions) -> Result<Self> {
        let mut joystick = Self::detached(options)?;
        joystick.mode = DeliveryMode::Events;
        joystick.link = Link::Events(stream);
        Ok(joystick)
    }

    /// Build a joystick with no device handle
    pub fn detached(options: &JoystickOptions) -> Result<Self> {
        Ok(Self {
            mode: if options.use_events {
                DeliveryMode::Events
            } else {
                DeliveryMode::Poll
            },
            link: Link::Detached,
            filter: SmoothingFilter::new(options.smoothing_enabled, options.smoothing_alpha)?,
            cache: StateCache::new(),
            subscribers: Subscribers::default(),
        })
    }

    #[must_use]
    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Whether a device handle is held
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self.link, Link::Detached)
    }

    /// Number of reports processed so far
    #[must_use]
    pub fn reports_processed(&self) -> u64 {
        self.cache.updates()
    }

    #[must_use]
    pub fn smoothing(&self) -> &SmoothingFilter {
        &self.filter
    }

    /// Enables or disables smoothing. Disabling forgets all smoothing history.
    pub fn set_smoothing_enabled(&mut self, enabled: bool) {
        self.filter.set_enabled(enabled);
        debug!("Smoothing {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Sets the smoothing factor
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `alpha` is not in (0, 1]; the current
    /// factor is kept.
    pub fn set_smoothing_alpha(&mut self, alpha: f64) -> Result<()> {
        self.filter.set_alpha(alpha)
    }

    /// Sets the enabled flag and, if given, the smoothing factor
    pub fn set_smoothing(&mut self, enabled: bool, alpha: Option<f64>) -> Result<()> {
        self.filter.set_smoothing(enabled, alpha)
    }

    /// Subscribe to a topic
    ///
    /// Subscribers are called in subscription order. Only [`Topic::Data`]
    /// is currently delivered.
    pub fn on<F>(&mut self, topic: Topic, callback: F)
    where
        F: FnMut(&ControlSnapshot) + Send + 'static,
    {
        self.subscribers.add(topic, Box::new(callback));
    }

    /// Subscribe to a topic given by name
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedTopic` for names other than `data`,
    /// `buttonPressed` and `axisMoved`.
    pub fn on_named<F>(&mut self, topic: &str, callback: F) -> Result<()>
    where
        F: FnMut(&ControlSnapshot) + Send + 'static,
    {
        let topic: Topic = topic.parse()?;
        self.on(topic, callback);
        Ok(())
    }

    /// Latest processed snapshot without any I/O
    #[must_use]
    pub fn get_state(&self) -> Option<ControlSnapshot> {
        self.cache.latest()
    }

    /// Read fresh state, falling back to the cache
    ///
    /// With a timed-read transport, waits at most `timeout_ms`. A
    /// blocking-only transport blocks until a report arrives. Read failures
    /// are logged and answered from the cache. Subscribers are not notified.
    pub fn poll(&mut self, timeout_ms: u32) -> Option<ControlSnapshot> {
        let report = match self.read_fresh(timeout_ms) {
            Ok(Some(report)) => report,
            Ok(None) => return self.cache.latest(),
            Err(e) => {
                warn!("Poll read failed, returning cached state: {}", e);
                return self.cache.latest();
            }
        };

        match self.process(&report) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Dropping report: {}", e);
                self.cache.latest()
            }
        }
    }

    /// One read attempt on a pull-mode handle; `None` means no fresh bytes
    fn read_fresh(&mut self, timeout_ms: u32) -> std::result::Result<Option<Bytes>, TransportError> {
        let transport = match &mut self.link {
            Link::Poll(transport) => transport,
            Link::Events(_) | Link::Detached => return Ok(None),
        };

        let report = if transport.supports_timed_read() {
            let timeout = i32::try_from(timeout_ms).unwrap_or(i32::MAX);
            transport.read_timeout(timeout)?
        } else {
            transport.read_blocking()?
        };

        Ok(if report.is_empty() { None } else { Some(report) })
    }

    /// Decode, normalize, smooth and cache one report
    fn process(&mut self, report: &[u8]) -> Result<ControlSnapshot> {
        let snapshot = self.filter.apply(process_report(report)?);
        self.cache.store(snapshot);
        debug!(
            "Report processed: roll={:.1} pitch={:.1} yaw={:.1} throttle={:.1} view={} buttons={:?}",
            snapshot.roll,
            snapshot.pitch,
            snapshot.yaw,
            snapshot.throttle,
            snapshot.view,
            snapshot.pressed_buttons()
        );
        Ok(snapshot)
    }

    /// Handle one push-mode transport event
    ///
    /// Data is processed, cached and delivered to `data` subscribers.
    /// Malformed reports and transport errors are logged and leave the cache
    /// untouched. Returns the delivered snapshot, if any.
    pub fn handle_event(&mut self, event: TransportEvent) -> Option<ControlSnapshot> {
        match event {
            TransportEvent::Data(report) => match self.process(&report) {
                Ok(snapshot) => {
                    self.subscribers.emit(Topic::Data, &snapshot);
                    Some(snapshot)
                }
                Err(e) => {
                    warn!("Dropping pushed report: {}", e);
                    None
                }
            },
            TransportEvent::Error(e) => {
                warn!("{}", JoystickError::TransportRead(e));
                None
            }
        }
    }

    fn pending_event(&mut self) -> Option<TransportEvent> {
        match &mut self.link {
            Link::Events(stream) => stream.try_next(),
            Link::Poll(_) | Link::Detached => None,
        }
    }

    /// Drop an event stream whose reader has stopped
    ///
    /// The reader releases the transport when it stops, so the joystick no
    /// longer holds a device handle.
    fn detach_if_ended(&mut self) {
        if !matches!(&self.link, Link::Events(stream) if stream.is_ended()) {
            return;
        }
        if let Link::Events(mut stream) = std::mem::replace(&mut self.link, Link::Detached) {
            stream.close();
        }
        info!(
            "Joystick event stream ended, device released after {} reports",
            self.cache.updates()
        );
    }

    /// Handle every event already queued, without waiting
    ///
    /// If the stream has ended, the joystick is detached afterwards.
    /// Returns the number of snapshots delivered.
    pub fn process_pending(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.pending_event() {
            if self.handle_event(event).is_some() {
                delivered += 1;
            }
        }
        self.detach_if_ended();
        delivered
    }

    /// Handle events as they arrive until the stream ends
    ///
    /// Returns immediately for pull-mode or detached joysticks. When the
    /// stream ends the joystick is detached. Returns the number of snapshots
    /// delivered.
    pub async fn run_events(&mut self) -> usize {
        let mut delivered = 0;
        loop {
            let event = match &mut self.link {
                Link::Events(stream) => stream.next().await,
                Link::Poll(_) | Link::Detached => None,
            };
            let Some(event) = event else {
                break;
            };
            if self.handle_event(event).is_some() {
                delivered += 1;
            }
        }
        self.detach_if_ended();
        debug!("Event stream ended after {} snapshots", delivered);
        delivered
    }

    /// Release the device handle
    ///
    /// Idempotent. Afterwards `poll` returns the cached state and no more
    /// events are delivered.
    pub fn close(&mut self) {
        match std::mem::replace(&mut self.link, Link::Detached) {
            Link::Poll(mut transport) => transport.close(),
            Link::Events(mut stream) => stream.close(),
            Link::Detached => return,
        }
        info!(
            "Joystick closed after {} reports",
            self.cache.updates()
        );
    }
}

impl Drop for Joystick {
    fn drop(&mut self) {
        self.close();
    }
}
