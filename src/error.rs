//! # Error Types
//!
//! Custom error types for Extreme3D HID using `thiserror`.

use thiserror::Error;

/// Failure reported by a HID transport while reading a report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The device handle has already been released
    #[error("device handle is closed")]
    Closed,

    /// The underlying HID read failed
    #[error("HID read failed: {0}")]
    Read(String),
}

/// Main error type for Extreme3D HID
#[derive(Debug, Error)]
pub enum JoystickError {
    /// The HID device could not be opened
    #[error("HID device {vendor_id:04x}:{product_id:04x} unavailable: {reason}")]
    DeviceUnavailable {
        vendor_id: u16,
        product_id: u16,
        reason: String,
    },

    /// Report buffer too short to decode
    #[error("Malformed report: expected at least {expected} bytes, got {len}")]
    MalformedReport { len: usize, expected: usize },

    /// Rejected configuration argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Subscription to an unknown event topic
    #[error("Unsupported topic: {0:?}")]
    UnsupportedTopic(String),

    /// Timed or blocking read failure
    #[error("Transport read error: {0}")]
    TransportRead(#[from] TransportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Extreme3D HID
pub type Result<T> = std::result::Result<T, JoystickError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_report_message() {
        let err = JoystickError::MalformedReport { len: 3, expected: 7 };
        assert_eq!(
            err.to_string(),
            "Malformed report: expected at least 7 bytes, got 3"
        );
    }

    #[test]
    fn test_transport_error_converts() {
        let err: JoystickError = TransportError::Closed.into();
        assert!(matches!(err, JoystickError::TransportRead(TransportError::Closed)));
    }

    #[test]
    fn test_device_unavailable_message_uses_hex_ids() {
        let err = JoystickError::DeviceUnavailable {
            vendor_id: 1133,
            product_id: 49685,
            reason: "not found".to_string(),
        };
        assert!(err.to_string().contains("046d:c215"));
    }
}
