//! # Report Layout Constants and Types
//!
//! Core definitions for the Extreme 3D Pro input report.
//!
//! ## Report Layout (7 bytes)
//!
//! | Byte | Bits | Field |
//! |------|------|-------|
//! | 0 | 0-7 | Roll (low 8 bits) |
//! | 1 | 0-1 | Roll (high 2 bits) |
//! | 1 | 2-7 | Pitch (low 6 bits) |
//! | 2 | 0-3 | Pitch (high 4 bits) |
//! | 2 | 4-7 | View (hat switch) |
//! | 3 | 0-7 | Yaw (twist) |
//! | 4 | 0-7 | Buttons 1-8 |
//! | 5 | 0-7 | Throttle (inverted) |
//! | 6 | 0-3 | Buttons 9-12 |

use serde::Serialize;

/// Logitech vendor ID (1133)
pub const DEFAULT_VENDOR_ID: u16 = 0x046d;

/// Extreme 3D Pro product ID (49685)
pub const DEFAULT_PRODUCT_ID: u16 = 0xc215;

/// Minimum report length in bytes
pub const REPORT_MIN_LEN: usize = 7;

/// Number of buttons carried by a report
pub const BUTTON_COUNT: usize = 12;

/// Roll/pitch range (10-bit)
pub const STICK_AXIS_MIN: u16 = 0;
pub const STICK_AXIS_MAX: u16 = 1023;

/// Yaw (twist) range
pub const YAW_MIN: u8 = 0;
pub const YAW_MAX: u8 = 254;

/// Throttle range (after inversion)
pub const THROTTLE_MIN: u8 = 0;
pub const THROTTLE_MAX: u8 = 255;

/// Decoded report fields, exactly as extracted from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawReport {
    /// Roll (stick X), 0-1023
    pub roll: u16,
    /// Pitch (stick Y), 0-1023
    pub pitch: u16,
    /// Yaw (stick twist), 0-254
    pub yaw: u8,
    /// Hat switch nibble, 0-15
    pub view: u8,
    /// Throttle slider, already inverted so that 255 is full throttle
    pub throttle: u8,
    /// Buttons 1-12 in report order
    pub buttons: [bool; BUTTON_COUNT],
}

/// Eight-way hat switch direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HatDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl HatDirection {
    /// Maps a hat nibble to a direction. Values outside 0-7 mean centered.
    #[must_use]
    pub fn from_nibble(view: u8) -> Option<Self> {
        match view {
            0 => Some(Self::North),
            1 => Some(Self::NorthEast),
            2 => Some(Self::East),
            3 => Some(Self::SouthEast),
            4 => Some(Self::South),
            5 => Some(Self::SouthWest),
            6 => Some(Self::West),
            7 => Some(Self::NorthWest),
            _ => None,
        }
    }
}

/// One fully processed set of control values.
///
/// `roll`, `pitch`, `yaw`, `throttle` and the `normalized_*` fields may be
/// smoothed. The `raw_*` fields always hold the decoder's output and are
/// never touched by smoothing.
///
/// # Examples
///
/// ```
/// use extreme3d_hid::report::decoder::decode_report;
/// use extreme3d_hid::report::normalizer::normalize;
///
/// let raw = decode_report(&[0xFF, 0x03, 0x00, 0x05, 0x01, 0x80, 0x00])?;
/// let snapshot = normalize(&raw);
/// assert_eq!(snapshot.raw_roll, 1023);
/// assert_eq!(snapshot.normalized_roll, 1.0);
/// assert!(snapshot.is_pressed(0));
/// # Ok::<(), extreme3d_hid::error::JoystickError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlSnapshot {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub view: u8,
    pub throttle: f64,
    pub buttons: [bool; BUTTON_COUNT],

    pub raw_roll: u16,
    pub raw_pitch: u16,
    pub raw_yaw: u8,
    pub raw_throttle: u8,

    pub normalized_roll: f64,
    pub normalized_pitch: f64,
    pub normalized_yaw: f64,
}

impl ControlSnapshot {
    /// Returns whether button `index` (0-based) is pressed.
    ///
    /// Out-of-range indices report `false`.
    #[must_use]
    pub fn is_pressed(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    /// Returns the 0-based indices of all pressed buttons.
    #[must_use]
    pub fn pressed_buttons(&self) -> Vec<usize> {
        self.buttons
            .iter()
            .enumerate()
            .filter(|(_, &pressed)| pressed)
            .map(|(index, _)| index)
            .collect()
    }

    /// Returns the hat switch direction, or `None` when centered.
    #[must_use]
    pub fn view_direction(&self) -> Option<HatDirection> {
        HatDirection::from_nibble(self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> ControlSnapshot {
        let mut buttons = [false; BUTTON_COUNT];
        buttons[0] = true;
        buttons[11] = true;
        ControlSnapshot {
            roll: 512.0,
            pitch: 512.0,
            yaw: 127.0,
            view: 8,
            throttle: 0.0,
            buttons,
            raw_roll: 512,
            raw_pitch: 512,
            raw_yaw: 127,
            raw_throttle: 0,
            normalized_roll: 512.0 / 1023.0,
            normalized_pitch: 512.0 / 1023.0,
            normalized_yaw: 0.5,
        }
    }

    #[test]
    fn test_default_device_ids() {
        assert_eq!(DEFAULT_VENDOR_ID, 1133);
        assert_eq!(DEFAULT_PRODUCT_ID, 49685);
    }

    #[test]
    fn test_pressed_buttons() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.pressed_buttons(), vec![0, 11]);
        assert!(snapshot.is_pressed(11));
        assert!(!snapshot.is_pressed(5));
        assert!(!snapshot.is_pressed(BUTTON_COUNT));
    }

    #[test]
    fn test_hat_directions() {
        assert_eq!(HatDirection::from_nibble(0), Some(HatDirection::North));
        assert_eq!(HatDirection::from_nibble(2), Some(HatDirection::East));
        assert_eq!(HatDirection::from_nibble(7), Some(HatDirection::NorthWest));
        assert_eq!(HatDirection::from_nibble(8), None);
        assert_eq!(HatDirection::from_nibble(15), None);
        assert_eq!(sample_snapshot().view_direction(), None);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let json = serde_json::to_value(sample_snapshot()).unwrap();
        assert_eq!(json["raw_roll"], 512);
        assert_eq!(json["buttons"].as_array().unwrap().len(), BUTTON_COUNT);
    }
}
