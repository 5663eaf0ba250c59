//! 3E response parsing and validation.
//!
//! # Response Structure
//!
//! | Offset | Field | Size |
//! |--------|-------|------|
//! | 0 | Common header | 7 |
//! | 7 | Data length | 2 |
//! | 9 | End code | 2 |
//! | 11 | Payload | data length - 2 |
//!
//! The data length counts the end code, so a response that carries no
//! payload declares a length of 2. An end code of `0x0000` means success;
//! any other value is a fault code reported by the controller.
//!
//! # Example
//!
//! ```
//! use slmp::ResponseFrame;
//!
//! let bytes = [
//!     0xD0, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00, // header
//!     0x04, 0x00, // data length
//!     0x00, 0x00, // end code
//!     0x2A, 0x00, // payload
//! ];
//!
//! let response = ResponseFrame::from_bytes(&bytes).unwrap();
//! assert!(response.is_success());
//! assert_eq!(response.payload, vec![0x2A, 0x00]);
//! ```

use crate::error::{Result, SlmpError};
use crate::frame::LENGTH_FIELD_SIZE;
use crate::header::{CommonHeader, HEADER_SIZE};

/// Size of the end code field.
pub const END_CODE_SIZE: usize = 2;

/// Minimum response size: header (7) + data length (2) + end code (2) = 11 bytes.
pub const MIN_RESPONSE_SIZE: usize = HEADER_SIZE + LENGTH_FIELD_SIZE + END_CODE_SIZE;

/// End code reported for a successful request.
pub const END_CODE_SUCCESS: u16 = 0x0000;

/// Parsed 3E response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    /// Routing header echoed by the controller.
    pub header: CommonHeader,
    /// Value of the data length field (end code + payload).
    pub data_length: u16,
    /// Completion status (0 = success).
    pub end_code: u16,
    /// Response data (if any).
    pub payload: Vec<u8>,
}

impl ResponseFrame {
    /// Parses a response from raw bytes.
    ///
    /// The bytes after the end code are the payload; their count must equal
    /// the declared data length minus the end code width.
    ///
    /// # Errors
    ///
    /// - `SlmpError::TruncatedResponse` if fewer than [`MIN_RESPONSE_SIZE`] bytes are given
    /// - `SlmpError::FrameLengthMismatch` if the payload length disagrees with the data length field
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::{ResponseFrame, SlmpError};
    ///
    /// // Declares 2 payload bytes but carries only 1
    /// let bytes = [0xD0, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00, 0x04, 0x00, 0x00, 0x00, 0x2A];
    /// assert!(matches!(
    ///     ResponseFrame::from_bytes(&bytes),
    ///     Err(SlmpError::FrameLengthMismatch { .. })
    /// ));
    /// ```
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_RESPONSE_SIZE {
            return Err(SlmpError::truncated_response(MIN_RESPONSE_SIZE, data.len()));
        }

        let header = CommonHeader::from_bytes(&data[..HEADER_SIZE])?;
        let data_length = u16::from_le_bytes([data[7], data[8]]);
        let end_code = u16::from_le_bytes([data[9], data[10]]);
        let payload = &data[MIN_RESPONSE_SIZE..];

        let declared = usize::from(data_length);
        let carried = END_CODE_SIZE + payload.len();
        if declared != carried {
            return Err(SlmpError::frame_length_mismatch(declared, carried));
        }

        Ok(Self {
            header,
            data_length,
            end_code,
            payload: payload.to_vec(),
        })
    }

    /// Returns whether the end code indicates success.
    pub fn is_success(&self) -> bool {
        self.end_code == END_CODE_SUCCESS
    }

    /// Returns an error if the controller reported a fault.
    ///
    /// # Errors
    ///
    /// Returns `SlmpError::ControllerFault` carrying the raw end code if it is non-zero.
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::{ResponseFrame, SlmpError};
    ///
    /// let bytes = [0xD0, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00, 0x02, 0x00, 0x59, 0xC0];
    /// let response = ResponseFrame::from_bytes(&bytes).unwrap();
    /// assert!(matches!(
    ///     response.check_end_code(),
    ///     Err(SlmpError::ControllerFault { code: 0xC059 })
    /// ));
    /// ```
    pub fn check_end_code(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(SlmpError::controller_fault(self.end_code))
        }
    }
}

/// Returns the total length of the frame starting at `prefix`, once enough
/// of it is buffered to read the data length field.
///
/// Stream transports use this to know how many bytes make up one response.
///
/// # Example
///
/// ```
/// use slmp::frame_len;
///
/// assert_eq!(frame_len(&[0xD0, 0x00, 0x00]), None);
/// assert_eq!(frame_len(&[0xD0, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00, 0x04, 0x00]), Some(13));
/// ```
pub fn frame_len(prefix: &[u8]) -> Option<usize> {
    if prefix.len() < HEADER_SIZE + LENGTH_FIELD_SIZE {
        return None;
    }
    let data_length = u16::from_le_bytes([prefix[7], prefix[8]]);
    Some(HEADER_SIZE + LENGTH_FIELD_SIZE + usize::from(data_length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(end_code: u16, payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0xD0, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00];
        bytes.extend_from_slice(&((payload.len() + 2) as u16).to_le_bytes());
        bytes.extend_from_slice(&end_code.to_le_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_response_from_bytes_success() {
        let bytes = hex::decode("d00000ffff030004000000ffff").unwrap();
        let response = ResponseFrame::from_bytes(&bytes).unwrap();

        assert!(response.header.is_response());
        assert_eq!(response.header.unit_io, 0x03FF);
        assert_eq!(response.data_length, 4);
        assert_eq!(response.end_code, 0);
        assert_eq!(response.payload, vec![0xFF, 0xFF]);
        assert!(response.check_end_code().is_ok());
    }

    #[test]
    fn test_response_without_payload() {
        let response = ResponseFrame::from_bytes(&make_response(0, &[])).unwrap();
        assert_eq!(response.data_length, 2);
        assert!(response.payload.is_empty());
    }

    #[test]
    fn test_response_too_short() {
        let bytes = make_response(0, &[]);
        for len in 0..MIN_RESPONSE_SIZE {
            assert!(matches!(
                ResponseFrame::from_bytes(&bytes[..len]),
                Err(SlmpError::TruncatedResponse { expected: 11, actual }) if actual == len
            ));
        }
    }

    #[test]
    fn test_length_mismatch_short_payload() {
        let mut bytes = make_response(0, &[0x2A, 0x00]);
        bytes.pop();
        assert!(matches!(
            ResponseFrame::from_bytes(&bytes),
            Err(SlmpError::FrameLengthMismatch {
                declared: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_length_mismatch_extra_bytes() {
        let mut bytes = make_response(0, &[0x01]);
        bytes.push(0x00);
        assert!(matches!(
            ResponseFrame::from_bytes(&bytes),
            Err(SlmpError::FrameLengthMismatch {
                declared: 3,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_length_below_end_code_width() {
        let mut bytes = make_response(0, &[]);
        bytes[7] = 0x01;
        assert!(matches!(
            ResponseFrame::from_bytes(&bytes),
            Err(SlmpError::FrameLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_length_check_is_exact() {
        for payload_len in 0..4usize {
            for declared in 0..8u16 {
                let mut bytes = make_response(0, &vec![0u8; payload_len]);
                bytes[7..9].copy_from_slice(&declared.to_le_bytes());
                let result = ResponseFrame::from_bytes(&bytes);
                assert_eq!(
                    result.is_ok(),
                    usize::from(declared) == payload_len + 2,
                    "declared {declared}, payload {payload_len}"
                );
            }
        }
    }

    #[test]
    fn test_end_code_not_interpreted_by_parser() {
        let response = ResponseFrame::from_bytes(&make_response(0x0001, &[])).unwrap();
        assert!(!response.is_success());
        assert!(matches!(
            response.check_end_code(),
            Err(SlmpError::ControllerFault { code: 1 })
        ));
    }

    #[test]
    fn test_end_code_little_endian() {
        let response = ResponseFrame::from_bytes(&make_response(0xC059, &[])).unwrap();
        assert_eq!(response.end_code, 0xC059);
        assert_eq!(&make_response(0xC059, &[])[9..11], &[0x59, 0xC0]);
    }

    #[test]
    fn test_frame_len() {
        let bytes = make_response(0, &[0x01]);
        assert_eq!(frame_len(&bytes[..8]), None);
        assert_eq!(frame_len(&bytes[..9]), Some(bytes.len()));
        assert_eq!(frame_len(&bytes), Some(12));
    }
}
