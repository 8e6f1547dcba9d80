//! # Smoothing Module
//!
//! Optional exponential moving average (EMA) over the noisy axis fields of a
//! [`ControlSnapshot`].
//!
//! ## Formula
//!
//! `output = alpha * input + (1 - alpha) * previous`
//!
//! - `alpha = 1.0`: No smoothing, output follows input
//! - `alpha = 0.25`: Default, moderate smoothing
//! - smaller alpha: smoother but slower response
//!
//! The first value seen for a field passes through unchanged and seeds the
//! average. Disabling the filter forgets every seeded value.
//!
//! ## Usage
//!
//! ```
//! use extreme3d_hid::controller::smoothing::SmoothingFilter;
//! use extreme3d_hid::report::process_report;
//!
//! let mut filter = SmoothingFilter::new(true, 0.5)?;
//! let first = filter.apply(process_report(&[10, 0, 0, 0, 0, 0, 0])?);
//! let second = filter.apply(process_report(&[20, 0, 0, 0, 0, 0, 0])?);
//! assert_eq!(first.roll, 10.0);
//! assert_eq!(second.roll, 15.0);
//! assert_eq!(second.raw_roll, 20);
//! # Ok::<(), extreme3d_hid::error::JoystickError>(())
//! ```

use crate::error::{JoystickError, Result};
use crate::report::ControlSnapshot;

/// Default smoothing factor.
pub const DEFAULT_ALPHA: f64 = 0.25;

/// Last emitted average for each smoothable field.
///
/// `None` means the field has not been seen since the filter was created or
/// last disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothingState {
    pub roll: Option<f64>,
    pub pitch: Option<f64>,
    pub yaw: Option<f64>,
    pub throttle: Option<f64>,
    pub normalized_roll: Option<f64>,
    pub normalized_pitch: Option<f64>,
    pub normalized_yaw: Option<f64>,
}

impl SmoothingState {
    /// Returns true when no field has been seeded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Checks that `alpha` is a finite number in (0, 1].
pub fn validate_alpha(alpha: f64) -> Result<f64> {
    if alpha.is_finite() && alpha > 0.0 && alpha <= 1.0 {
        Ok(alpha)
    } else {
        Err(JoystickError::InvalidArgument(format!(
            "smoothing alpha must be a number in (0, 1], got {}",
            alpha
        )))
    }
}

/// Blends `input` into the slot, seeding it on first use.
#[inline]
fn ema(slot: &mut Option<f64>, input: f64, alpha: f64) -> f64 {
    let output = match *slot {
        Some(previous) => alpha * input + (1.0 - alpha) * previous,
        None => input,
    };
    *slot = Some(output);
    output
}

/// Per-device exponential smoothing filter.
#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    enabled: bool,
    alpha: f64,
    state: SmoothingState,
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self {
            enabled: false,
            alpha: DEFAULT_ALPHA,
            state: SmoothingState::default(),
        }
    }
}

impl SmoothingFilter {
    /// Creates a filter with the given settings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `alpha` is not in (0, 1].
    pub fn new(enabled: bool, alpha: f64) -> Result<Self> {
        Ok(Self {
            enabled,
            alpha: validate_alpha(alpha)?,
            state: SmoothingState::default(),
        })
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the current per-field memory.
    #[must_use]
    pub fn state(&self) -> &SmoothingState {
        &self.state
    }

    /// Enables or disables smoothing. Disabling clears all per-field memory.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.state = SmoothingState::default();
        }
    }

    /// Sets the smoothing factor. On error the current alpha is kept.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<()> {
        self.alpha = validate_alpha(alpha)?;
        Ok(())
    }

    /// Sets both the enabled flag and, if given, the smoothing factor.
    ///
    /// Alpha is validated before anything changes.
    pub fn set_smoothing(&mut self, enabled: bool, alpha: Option<f64>) -> Result<()> {
        if let Some(alpha) = alpha {
            self.set_alpha(alpha)?;
        }
        self.set_enabled(enabled);
        Ok(())
    }

    /// Returns a smoothed copy of `snapshot`.
    ///
    /// Only the seven smoothable fields change. When disabled the snapshot is
    /// returned as-is.
    #[must_use]
    pub fn apply(&mut self, snapshot: ControlSnapshot) -> ControlSnapshot {
        if !self.enabled {
            return snapshot;
        }

        let alpha = self.alpha;
        let state = &mut self.state;
        ControlSnapshot {
            roll: ema(&mut state.roll, snapshot.roll, alpha),
            pitch: ema(&mut state.pitch, snapshot.pitch, alpha),
            yaw: ema(&mut state.yaw, snapshot.yaw, alpha),
            throttle: ema(&mut state.throttle, snapshot.throttle, alpha),
            normalized_roll: ema(&mut state.normalized_roll, snapshot.normalized_roll, alpha),
            normalized_pitch: ema(&mut state.normalized_pitch, snapshot.normalized_pitch, alpha),
            normalized_yaw: ema(&mut state.normalized_yaw, snapshot.normalized_yaw, alpha),
            ..snapshot
        }
    }
}
