//! # Report Module
//!
//! Decoding of Extreme 3D Pro HID input reports.
//!
//! This module handles:
//! - Fixed bit extraction of axes, hat switch and buttons
//! - Inverting the throttle slider
//! - Normalizing stick axes to the 0.0-1.0 range

pub mod protocol;
pub mod decoder;
pub mod normalizer;

pub use protocol::{ControlSnapshot, HatDirection, RawReport};

use crate::error::Result;

/// Decodes and normalizes one report into an unsmoothed snapshot.
pub fn process_report(report: &[u8]) -> Result<ControlSnapshot> {
    let raw = decoder::decode_report(report)?;
    Ok(normalizer::normalize(&raw))
}
