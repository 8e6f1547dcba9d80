//! # Report Decoder
//!
//! Extracts the raw control fields from a 7-byte joystick input report.

use super::protocol::*;
use crate::error::{JoystickError, Result};

/// Decode a raw input report
///
/// # Arguments
///
/// * `report` - Report bytes as delivered by the HID transport (at least 7 bytes)
///
/// # Returns
///
/// * `Result<RawReport>` - Decoded fields
///
/// # Errors
///
/// Returns `MalformedReport` if the buffer is shorter than [`REPORT_MIN_LEN`].
/// Bytes past the seventh are ignored.
///
/// # Examples
///
/// ```
/// use extreme3d_hid::report::decoder::decode_report;
///
/// let raw = decode_report(&[0xFF, 0x03, 0x00, 0x05, 0x01, 0x80, 0x00])?;
/// assert_eq!(raw.roll, 1023);
/// assert_eq!(raw.throttle, 127);
/// # Ok::<(), extreme3d_hid::error::JoystickError>(())
/// ```
pub fn decode_report(report: &[u8]) -> Result<RawReport> {
    if report.len() < REPORT_MIN_LEN {
        return Err(JoystickError::MalformedReport {
            len: report.len(),
            expected: REPORT_MIN_LEN,
        });
    }

    // Roll: 10 bits = byte0 | byte1[0..2] << 8
    let roll = (((report[1] & 0x03) as u16) << 8) | report[0] as u16;

    // Pitch: 10 bits = byte1[2..8] | byte2[0..4] << 6
    let pitch = (((report[2] & 0x0F) as u16) << 6) | ((report[1] & 0xFC) >> 2) as u16;

    let yaw = report[3];
    let view = (report[2] & 0xF0) >> 4;

    // Slider reads 255 at minimum throttle
    let throttle = THROTTLE_MAX - report[5];

    let mut buttons = [false; BUTTON_COUNT];
    for (bit, button) in buttons.iter_mut().take(8).enumerate() {
        *button = report[4] & (1 << bit) != 0;
    }
    for (bit, button) in buttons.iter_mut().skip(8).enumerate() {
        *button = report[6] & (1 << bit) != 0;
    }

    Ok(RawReport {
        roll,
        pitch,
        yaw,
        view,
        throttle,
        buttons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_REPORT: [u8; 7] = [0xFF, 0x03, 0x00, 0x05, 0x01, 0x80, 0x00];

    #[test]
    fn test_decode_sample_report() {
        let raw = decode_report(&SAMPLE_REPORT).unwrap();

        assert_eq!(raw.roll, 1023);
        assert_eq!(raw.pitch, 0);
        assert_eq!(raw.yaw, 5);
        assert_eq!(raw.view, 0);
        assert_eq!(raw.throttle, 127);
        assert!(raw.buttons[0]);
        assert!(raw.buttons[1..].iter().all(|&b| !b));
    }

    #[test]
    fn test_decode_is_deterministic() {
        let first = decode_report(&SAMPLE_REPORT).unwrap();
        let _ = decode_report(&[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE]).unwrap();
        let second = decode_report(&SAMPLE_REPORT).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_decode_pitch_spans_two_bytes() {
        // byte1 upper 6 bits all set, byte2 low nibble all set
        let raw = decode_report(&[0x00, 0xFC, 0x0F, 0x00, 0x00, 0xFF, 0x00]).unwrap();
        assert_eq!(raw.roll, 0);
        assert_eq!(raw.pitch, 1023);
        assert_eq!(raw.view, 0);
        assert_eq!(raw.throttle, 0);
    }

    #[test]
    fn test_decode_view_nibble() {
        let raw = decode_report(&[0x00, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(raw.view, 8);
        assert_eq!(raw.pitch, 0);

        let raw = decode_report(&[0x00, 0x00, 0xF3, 0x00, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(raw.view, 15);
        assert_eq!(raw.pitch, 3 << 6);
    }

    #[test]
    fn test_decode_throttle_is_inverted() {
        let full = decode_report(&[0, 0, 0, 0, 0, 0x00, 0]).unwrap();
        let idle = decode_report(&[0, 0, 0, 0, 0, 0xFF, 0]).unwrap();
        assert_eq!(full.throttle, 255);
        assert_eq!(idle.throttle, 0);
    }

    #[test]
    fn test_decode_buttons_from_both_bytes() {
        let raw = decode_report(&[0, 0, 0, 0, 0b1000_0010, 0, 0b1111_1001]).unwrap();
        let expected = [
            false, true, false, false, false, false, false, true, // byte 4
            true, false, false, true, // byte 6, low nibble only
        ];
        assert_eq!(raw.buttons, expected);
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut long = SAMPLE_REPORT.to_vec();
        long.extend_from_slice(&[0xAA; 9]);
        assert_eq!(
            decode_report(&long).unwrap(),
            decode_report(&SAMPLE_REPORT).unwrap()
        );
    }

    #[test]
    fn test_decode_short_report_is_rejected() {
        for len in 0..REPORT_MIN_LEN {
            match decode_report(&SAMPLE_REPORT[..len]) {
                Err(JoystickError::MalformedReport { len: got, expected }) => {
                    assert_eq!(got, len);
                    assert_eq!(expected, REPORT_MIN_LEN);
                }
                other => panic!("Expected MalformedReport for {} bytes, got: {:?}", len, other),
            }
        }
    }
}
