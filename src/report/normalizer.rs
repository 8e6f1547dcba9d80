//! # Normalizer
//!
//! Builds a [`ControlSnapshot`] from a decoded report, adding the
//! normalized [0, 1] stick axes.
//!
//! The formula used is: `normalized = (value - min) / (max - min)`
//!
//! Throttle, view and buttons are not normalized.

use super::protocol::*;

/// Linearly rescales `value` from `[min, max]` to `[0, 1]`.
#[inline]
#[must_use]
pub fn rescale(value: f64, min: f64, max: f64) -> f64 {
    (value - min) / (max - min)
}

/// Produces an unsmoothed snapshot from a decoded report.
///
/// Axis values are copied into both the working fields and the `raw_*`
/// fields, so `roll == raw_roll as f64` on the returned value.
#[must_use]
pub fn normalize(raw: &RawReport) -> ControlSnapshot {
    let stick_min = f64::from(STICK_AXIS_MIN);
    let stick_max = f64::from(STICK_AXIS_MAX);

    ControlSnapshot {
        roll: f64::from(raw.roll),
        pitch: f64::from(raw.pitch),
        yaw: f64::from(raw.yaw),
        view: raw.view,
        throttle: f64::from(raw.throttle),
        buttons: raw.buttons,

        raw_roll: raw.roll,
        raw_pitch: raw.pitch,
        raw_yaw: raw.yaw,
        raw_throttle: raw.throttle,

        normalized_roll: rescale(f64::from(raw.roll), stick_min, stick_max),
        normalized_pitch: rescale(f64::from(raw.pitch), stick_min, stick_max),
        normalized_yaw: rescale(f64::from(raw.yaw), f64::from(YAW_MIN), f64::from(YAW_MAX)),
    }
}
