//! Typed register values extracted from responses.
//!
//! A successful single-point read answers with a 1-byte payload for a bit
//! and a 2-byte little-endian payload for a word. The extractors check the
//! end code and the payload width before producing a value, so a fault or a
//! mismatched response never turns into a silently wrong number.
//!
//! # Example
//!
//! ```
//! use slmp::{extract_word, ResponseFrame, RegisterValue, Signedness};
//!
//! let bytes = [0xD0, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00, 0x04, 0x00, 0x00, 0x00, 0xFF, 0xFF];
//! let response = ResponseFrame::from_bytes(&bytes).unwrap();
//!
//! let raw = extract_word(&response).unwrap();
//! assert_eq!(raw, 65535);
//!
//! let value = RegisterValue::Word { raw, signedness: Signedness::Signed };
//! assert_eq!(value.as_i16(), Some(-1));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SlmpError};
use crate::response::ResponseFrame;

/// Payload width of a single-bit read.
pub const BIT_PAYLOAD_SIZE: usize = 1;

/// Payload width of a single-word read.
pub const WORD_PAYLOAD_SIZE: usize = 2;

/// How the bit pattern of a word register is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Signedness {
    /// 0..=65535.
    #[default]
    Unsigned,
    /// Two's complement, -32768..=32767.
    Signed,
}

/// A value held by a single device point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegisterValue {
    /// Bit device state.
    Bit(bool),
    /// Word device content.
    Word {
        /// Bit pattern as transmitted.
        raw: u16,
        /// Requested interpretation of `raw`.
        signedness: Signedness,
    },
}

impl RegisterValue {
    /// Creates an unsigned word value.
    pub fn unsigned(raw: u16) -> Self {
        Self::Word {
            raw,
            signedness: Signedness::Unsigned,
        }
    }

    /// Creates a signed word value from an `i16`.
    pub fn signed(value: i16) -> Self {
        Self::Word {
            raw: value as u16,
            signedness: Signedness::Signed,
        }
    }

    /// Returns the bit state, or `None` for a word.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bit(bit) => Some(bit),
            Self::Word { .. } => None,
        }
    }

    /// Returns the raw word, or `None` for a bit.
    pub fn as_u16(&self) -> Option<u16> {
        match *self {
            Self::Word { raw, .. } => Some(raw),
            Self::Bit(_) => None,
        }
    }

    /// Returns the word reinterpreted as two's complement, or `None` for a bit.
    pub fn as_i16(&self) -> Option<i16> {
        self.as_u16().map(|raw| raw as i16)
    }

    /// Returns the value as an integer honoring the signedness; bits map to 0/1.
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::RegisterValue;
    ///
    /// assert_eq!(RegisterValue::Bit(true).as_i32(), 1);
    /// assert_eq!(RegisterValue::unsigned(0xFFFF).as_i32(), 65535);
    /// assert_eq!(RegisterValue::signed(-1).as_i32(), -1);
    /// ```
    pub fn as_i32(&self) -> i32 {
        match *self {
            Self::Bit(bit) => i32::from(bit),
            Self::Word {
                raw,
                signedness: Signedness::Unsigned,
            } => i32::from(raw),
            Self::Word {
                raw,
                signedness: Signedness::Signed,
            } => i32::from(raw as i16),
        }
    }
}

impl fmt::Display for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bit(bit) => write!(f, "{}", if *bit { "ON" } else { "OFF" }),
            Self::Word { .. } => write!(f, "{}", self.as_i32()),
        }
    }
}

/// Declared data type of a device, as used by `read`/`write` on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    /// Single bit.
    Bool,
    /// Signed 16-bit word.
    Int16,
    /// Unsigned 16-bit word.
    UInt16,
}

impl DataType {
    /// Returns the signedness for word types, `None` for `Bool`.
    pub fn signedness(self) -> Option<Signedness> {
        match self {
            DataType::Bool => None,
            DataType::Int16 => Some(Signedness::Signed),
            DataType::UInt16 => Some(Signedness::Unsigned),
        }
    }
}

impl FromStr for DataType {
    type Err = SlmpError;

    /// Parses `BOOL`, `INT16` or `UINT16` (case-insensitive).
    ///
    /// Wider types span two points and are rejected with `UnsupportedDataType`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOOL" => Ok(DataType::Bool),
            "INT16" => Ok(DataType::Int16),
            "UINT16" => Ok(DataType::UInt16),
            _ => Err(SlmpError::unsupported_data_type(s)),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "BOOL"),
            DataType::Int16 => write!(f, "INT16"),
            DataType::UInt16 => write!(f, "UINT16"),
        }
    }
}

fn checked_payload(frame: &ResponseFrame, width: usize) -> Result<&[u8]> {
    frame.check_end_code()?;
    if frame.payload.len() != width {
        return Err(SlmpError::unexpected_payload_shape(width, frame.payload.len()));
    }
    Ok(&frame.payload)
}

/// Extracts the state of a single bit from a read response.
///
/// # Errors
///
/// - `SlmpError::ControllerFault` if the end code is non-zero
/// - `SlmpError::UnexpectedPayloadShape` unless the payload is exactly 1 byte
pub fn extract_bit(frame: &ResponseFrame) -> Result<bool> {
    let payload = checked_payload(frame, BIT_PAYLOAD_SIZE)?;
    Ok(payload[0] & 0x01 != 0)
}

/// Extracts a single unsigned word from a read response.
///
/// # Errors
///
/// - `SlmpError::ControllerFault` if the end code is non-zero
/// - `SlmpError::UnexpectedPayloadShape` unless the payload is exactly 2 bytes
pub fn extract_word(frame: &ResponseFrame) -> Result<u16> {
    let payload = checked_payload(frame, WORD_PAYLOAD_SIZE)?;
    Ok(u16::from_le_bytes([payload[0], payload[1]]))
}

/// Extracts a value of the given data type from a read response.
pub fn extract(frame: &ResponseFrame, data_type: DataType) -> Result<RegisterValue> {
    match data_type.signedness() {
        None => extract_bit(frame).map(RegisterValue::Bit),
        Some(signedness) => {
            extract_word(frame).map(|raw| RegisterValue::Word { raw, signedness })
        }
    }
}
