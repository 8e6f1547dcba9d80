//! # Controller Module
//!
//! Joystick state handling on top of the report decoder.
//!
//! This module handles:
//! - Optional exponential smoothing of axis values
//! - Caching the latest processed snapshot
//! - Push delivery to topic subscribers
//! - Pull delivery with fallback to the cached snapshot

pub mod smoothing;
pub mod cache;
pub mod topics;
pub mod joystick;

pub use joystick::{DeliveryMode, Joystick, JoystickOptions};
pub use topics::Topic;
