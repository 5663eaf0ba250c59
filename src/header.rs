//! SLMP common header.
//!
//! Every 3E frame, request or response, starts with the same 7-byte routing
//! header:
//!
//! | Byte | Field | Request value |
//! |------|-------|---------------|
//! | 0-1 | Sub header | `50 00` (response: `D0 00`) |
//! | 2 | Network number | `00` (own network) |
//! | 3 | Station number | `FF` (own station) |
//! | 4-5 | Request destination unit I/O | `FF 03` (CPU unit, `0x03FF`) |
//! | 6 | Request destination multi-drop station | `00` |
//!
//! This crate always talks to the CPU unit of the connected station, so the
//! request header is a constant.
//!
//! # Example
//!
//! ```
//! use slmp::CommonHeader;
//!
//! let header = CommonHeader::own_station();
//! assert_eq!(header.to_bytes(), [0x50, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00]);
//! ```

use crate::error::{Result, SlmpError};

/// Common header size in bytes.
pub const HEADER_SIZE: usize = 7;

/// Sub header of a 3E request frame.
pub const SUB_HEADER_REQUEST: u16 = 0x0050;

/// Sub header of a 3E response frame.
pub const SUB_HEADER_RESPONSE: u16 = 0x00D0;

/// Network number of the own network.
pub const NETWORK_OWN: u8 = 0x00;

/// Station number of the own station.
pub const STATION_OWN: u8 = 0xFF;

/// Unit I/O number addressing the CPU unit.
pub const UNIT_IO_CPU: u16 = 0x03FF;

/// Multi-drop station number for a direct connection.
pub const MULTI_DROP_NONE: u8 = 0x00;

/// 3E frame common header (7 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonHeader {
    /// Sub header. Stored as the integer whose little-endian bytes are on the wire.
    pub sub_header: u16,
    /// Network number.
    pub network: u8,
    /// Station (PC) number.
    pub station: u8,
    /// Request destination unit I/O number.
    pub unit_io: u16,
    /// Request destination multi-drop station number.
    pub multi_drop: u8,
}

impl CommonHeader {
    /// Header for a request addressed to the CPU unit of the own station.
    pub const fn own_station() -> Self {
        Self {
            sub_header: SUB_HEADER_REQUEST,
            network: NETWORK_OWN,
            station: STATION_OWN,
            unit_io: UNIT_IO_CPU,
            multi_drop: MULTI_DROP_NONE,
        }
    }

    /// Serializes the header to bytes.
    pub fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let sub = self.sub_header.to_le_bytes();
        let io = self.unit_io.to_le_bytes();
        [
            sub[0],
            sub[1],
            self.network,
            self.station,
            io[0],
            io[1],
            self.multi_drop,
        ]
    }

    /// Parses a header from bytes.
    ///
    /// Only the first [`HEADER_SIZE`] bytes are consumed.
    ///
    /// # Errors
    ///
    /// Returns `SlmpError::TruncatedResponse` if the slice is too short.
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::CommonHeader;
    ///
    /// let header = CommonHeader::from_bytes(&[0xD0, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00]).unwrap();
    /// assert!(header.is_response());
    /// assert_eq!(header.unit_io, 0x03FF);
    /// ```
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(SlmpError::truncated_response(HEADER_SIZE, data.len()));
        }

        Ok(Self {
            sub_header: u16::from_le_bytes([data[0], data[1]]),
            network: data[2],
            station: data[3],
            unit_io: u16::from_le_bytes([data[4], data[5]]),
            multi_drop: data[6],
        })
    }

    /// Returns whether the sub header marks a response frame.
    pub fn is_response(self) -> bool {
        self.sub_header == SUB_HEADER_RESPONSE
    }
}

impl Default for CommonHeader {
    fn default() -> Self {
        Self::own_station()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_station_bytes() {
        let bytes = CommonHeader::own_station().to_bytes();
        assert_eq!(bytes, [0x50, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00]);
    }

    #[test]
    fn test_header_from_bytes() {
        let bytes = hex::decode("d00001fe0102ab").unwrap();
        let header = CommonHeader::from_bytes(&bytes).unwrap();

        assert_eq!(header.sub_header, SUB_HEADER_RESPONSE);
        assert_eq!(header.network, 0x01);
        assert_eq!(header.station, 0xFE);
        assert_eq!(header.unit_io, 0x0201);
        assert_eq!(header.multi_drop, 0xAB);
        assert!(header.is_response());
    }

    #[test]
    fn test_header_from_bytes_too_short() {
        let result = CommonHeader::from_bytes(&[0xD0, 0x00, 0x00]);
        assert!(matches!(
            result,
            Err(SlmpError::TruncatedResponse {
                expected: 7,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_request_header_is_not_response() {
        assert!(!CommonHeader::own_station().is_response());
        assert_eq!(CommonHeader::default(), CommonHeader::own_station());
    }
}
