//! # Extreme3D HID Library
//!
//! Read a Logitech Extreme 3D Pro joystick over HID.
//!
//! This library decodes the joystick's 7-byte input reports into a
//! [`ControlSnapshot`], optionally smooths the axes, and delivers the result
//! either by pushing to subscribers or on demand through polling.

pub mod config;
pub mod error;
pub mod report;
pub mod controller;
pub mod transport;

pub use controller::{DeliveryMode, Joystick, JoystickOptions, Topic};
pub use error::{JoystickError, Result};
pub use report::ControlSnapshot;
