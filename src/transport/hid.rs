//! # hidapi Transport
//!
//! Opens the joystick by vendor/product ID and reads input reports.

use bytes::Bytes;
use hidapi::{HidApi, HidDevice};
use tracing::{debug, info};

use super::HidTransport;
use crate::error::{JoystickError, Result, TransportError};

/// Read buffer size; the Extreme 3D Pro report is 7 bytes
const READ_BUFFER_SIZE: usize = 64;

/// Joystick handle backed by hidapi
pub struct HidapiTransport {
    device: Option<HidDevice>,
    vendor_id: u16,
    product_id: u16,
}

impl std::fmt::Debug for HidapiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidapiTransport")
            .field("vendor_id", &format_args!("0x{:04x}", self.vendor_id))
            .field("product_id", &format_args!("0x{:04x}", self.product_id))
            .field("open", &self.device.is_some())
            .finish()
    }
}

impl HidapiTransport {
    /// Open the first HID device matching the IDs
    ///
    /// # Errors
    ///
    /// Returns `DeviceUnavailable` if hidapi cannot be initialized or no
    /// matching device can be opened.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use extreme3d_hid::transport::hid::HidapiTransport;
    ///
    /// let transport = HidapiTransport::open(1133, 49685)?;
    /// # Ok::<(), extreme3d_hid::error::JoystickError>(())
    /// ```
    pub fn open(vendor_id: u16, product_id: u16) -> Result<Self> {
        let unavailable = |reason: String| JoystickError::DeviceUnavailable {
            vendor_id,
            product_id,
            reason,
        };

        let api = HidApi::new().map_err(|e| unavailable(format!("hidapi init failed: {}", e)))?;

        debug!(
            "Opening HID device (vendor: 0x{:04x}, product: 0x{:04x})",
            vendor_id, product_id
        );
        let device = api
            .open(vendor_id, product_id)
            .map_err(|e| unavailable(e.to_string()))?;

        info!(
            "Opened HID device 0x{:04x}:0x{:04x}",
            vendor_id, product_id
        );

        Ok(Self {
            device: Some(device),
            vendor_id,
            product_id,
        })
    }

    fn device(&self) -> std::result::Result<&HidDevice, TransportError> {
        self.device.as_ref().ok_or(TransportError::Closed)
    }
}

impl HidTransport for HidapiTransport {
    fn read_timeout(&mut self, timeout_ms: i32) -> std::result::Result<Bytes, TransportError> {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let n = self
            .device()?
            .read_timeout(&mut buf, timeout_ms)
            .map_err(|e| TransportError::Read(e.to_string()))?;
        Ok(Bytes::copy_from_slice(&buf[..n]))
    }

    fn read_blocking(&mut self) -> std::result::Result<Bytes, TransportError> {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let n = self
            .device()?
            .read(&mut buf)
            .map_err(|e| TransportError::Read(e.to_string()))?;
        Ok(Bytes::copy_from_slice(&buf[..n]))
    }

    fn close(&mut self) {
        if self.device.take().is_some() {
            info!(
                "Closed HID device 0x{:04x}:0x{:04x}",
                self.vendor_id, self.product_id
            );
        }
    }
}
