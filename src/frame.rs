//! 3E request frame construction and serialization.
//!
//! A request carries exactly one device point. Layout (all multi-byte fields
//! little-endian):
//!
//! | Offset | Field | Size | Value |
//! |--------|-------|------|-------|
//! | 0 | Common header | 7 | see [`CommonHeader`] |
//! | 7 | Data length | 2 | bytes following this field |
//! | 9 | Monitoring timer | 2 | `0` (wait indefinitely) |
//! | 11 | Command | 2 | `0x0401` read / `0x1401` write |
//! | 13 | Sub command | 2 | `0x0000` word / `0x0001` bit |
//! | 15 | Device id | 3 | id + reserved zero |
//! | 18 | Device code | 1 | see [`DeviceCode`](crate::DeviceCode) |
//! | 19 | Point count | 2 | `1` |
//! | 21 | Write data | 0-2 | writes only |
//!
//! # Example
//!
//! ```
//! use slmp::{build_read_word, DeviceAddress};
//!
//! let address: DeviceAddress = "D100".parse().unwrap();
//! let bytes = build_read_word(&address);
//! assert_eq!(
//!     bytes,
//!     [
//!         0x50, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00, // common header
//!         0x0C, 0x00, // data length
//!         0x00, 0x00, // timer
//!         0x01, 0x04, // batch read
//!         0x00, 0x00, // word units
//!         0x64, 0x00, 0x00, // device id 100
//!         0xA8, // D
//!         0x01, 0x00, // 1 point
//!     ]
//! );
//! ```

use crate::device::{DeviceAddress, DEVICE_ID_SIZE};
use crate::error::{Result, SlmpError};
use crate::header::{CommonHeader, HEADER_SIZE};

/// Batch read command.
pub const CMD_BATCH_READ: u16 = 0x0401;
/// Batch write command.
pub const CMD_BATCH_WRITE: u16 = 0x1401;
/// Sub command selecting word units.
pub const SUBCMD_WORD: u16 = 0x0000;
/// Sub command selecting bit units.
pub const SUBCMD_BIT: u16 = 0x0001;
/// Monitoring timer value meaning "wait indefinitely".
pub const TIMER_WAIT_FOREVER: u16 = 0x0000;
/// Number of points addressed by every request.
pub const SINGLE_POINT: u16 = 1;

/// Size of the data length field.
pub(crate) const LENGTH_FIELD_SIZE: usize = 2;
/// Bytes from the timer through the point count.
const REQUEST_BODY_SIZE: usize = 2 + 2 + 2 + DEVICE_ID_SIZE + 1 + 2;
/// Size of a request frame without write data.
pub const REQUEST_FIXED_LEN: usize = HEADER_SIZE + LENGTH_FIELD_SIZE + REQUEST_BODY_SIZE;

/// Unit of access selected by the sub command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessUnit {
    /// One bit per point.
    Bit,
    /// One 16-bit word per point.
    Word,
}

impl AccessUnit {
    /// Returns the sub command for this unit.
    pub fn sub_command(self) -> u16 {
        match self {
            AccessUnit::Bit => SUBCMD_BIT,
            AccessUnit::Word => SUBCMD_WORD,
        }
    }
}

/// A single-point 3E request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFrame {
    /// Routing header.
    pub header: CommonHeader,
    /// Monitoring timer.
    pub timer: u16,
    /// Command code.
    pub command: u16,
    /// Sub command code.
    pub sub_command: u16,
    /// Addressed device.
    pub device: DeviceAddress,
    /// Number of points.
    pub point_count: u16,
    write_data: Option<Vec<u8>>,
}

impl RequestFrame {
    fn new(
        command: u16,
        unit: AccessUnit,
        device: DeviceAddress,
        write_data: Option<Vec<u8>>,
    ) -> Self {
        Self {
            header: CommonHeader::own_station(),
            timer: TIMER_WAIT_FOREVER,
            command,
            sub_command: unit.sub_command(),
            device,
            point_count: SINGLE_POINT,
            write_data,
        }
    }

    /// Request reading one bit.
    pub fn read_bit(device: DeviceAddress) -> Self {
        Self::new(CMD_BATCH_READ, AccessUnit::Bit, device, None)
    }

    /// Request reading one word.
    pub fn read_word(device: DeviceAddress) -> Self {
        Self::new(CMD_BATCH_READ, AccessUnit::Word, device, None)
    }

    /// Request writing one bit.
    pub fn write_bit(device: DeviceAddress, value: bool) -> Self {
        Self::new(
            CMD_BATCH_WRITE,
            AccessUnit::Bit,
            device,
            Some(vec![u8::from(value)]),
        )
    }

    /// Request writing one word.
    pub fn write_word(device: DeviceAddress, value: u16) -> Self {
        Self::new(
            CMD_BATCH_WRITE,
            AccessUnit::Word,
            device,
            Some(value.to_le_bytes().to_vec()),
        )
    }

    /// Returns the data to write, present only for write commands.
    pub fn write_data(&self) -> Option<&[u8]> {
        self.write_data.as_deref()
    }

    /// Returns the access unit selected by the sub command, if it is a known one.
    pub fn access_unit(&self) -> Option<AccessUnit> {
        match self.sub_command {
            SUBCMD_BIT => Some(AccessUnit::Bit),
            SUBCMD_WORD => Some(AccessUnit::Word),
            _ => None,
        }
    }

    /// Returns the value of the data length field: the number of bytes that
    /// follow it.
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::{DeviceAddress, RequestFrame};
    ///
    /// let address: DeviceAddress = "D0".parse().unwrap();
    /// assert_eq!(RequestFrame::read_word(address).data_length(), 12);
    /// assert_eq!(RequestFrame::write_bit(address, true).data_length(), 13);
    /// assert_eq!(RequestFrame::write_word(address, 7).data_length(), 14);
    /// ```
    pub fn data_length(&self) -> u16 {
        let write_len = self.write_data.as_ref().map_or(0, Vec::len);
        // Write data is set by the constructors or by `from_bytes`, whose
        // input already fits a 16-bit length field.
        u16::try_from(REQUEST_BODY_SIZE + write_len).unwrap_or(u16::MAX)
    }

    /// Serializes the frame to bytes for transmission.
    pub fn to_bytes(&self) -> Vec<u8> {
        let write_data = self.write_data.as_deref().unwrap_or_default();
        let (device_code, device_id) = self.device.encode();

        let mut bytes = Vec::with_capacity(REQUEST_FIXED_LEN + write_data.len());
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.extend_from_slice(&self.data_length().to_le_bytes());
        bytes.extend_from_slice(&self.timer.to_le_bytes());
        bytes.extend_from_slice(&self.command.to_le_bytes());
        bytes.extend_from_slice(&self.sub_command.to_le_bytes());
        bytes.extend_from_slice(&device_id);
        bytes.push(device_code);
        bytes.extend_from_slice(&self.point_count.to_le_bytes());
        bytes.extend_from_slice(write_data);
        bytes
    }

    /// Decodes a serialized request.
    ///
    /// Bytes following the fixed layout are taken as write data.
    ///
    /// # Errors
    ///
    /// - `SlmpError::TruncatedRequest` if fewer than [`REQUEST_FIXED_LEN`] bytes are given
    /// - `SlmpError::FrameLengthMismatch` if the data length field disagrees with the buffer
    /// - `SlmpError::UnknownDeviceCode` if the device code byte is not recognized
    /// - `SlmpError::MalformedAddress` if the reserved device id byte is not zero
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < REQUEST_FIXED_LEN {
            return Err(SlmpError::truncated_request(REQUEST_FIXED_LEN, data.len()));
        }

        let header = CommonHeader::from_bytes(&data[..HEADER_SIZE])?;
        let declared = usize::from(u16::from_le_bytes([data[7], data[8]]));
        let actual = data.len() - HEADER_SIZE - LENGTH_FIELD_SIZE;
        if declared != actual {
            return Err(SlmpError::frame_length_mismatch(declared, actual));
        }

        let device = DeviceAddress::decode(data[18], [data[15], data[16], data[17]])?;
        let write_data = &data[REQUEST_FIXED_LEN..];

        Ok(Self {
            header,
            timer: u16::from_le_bytes([data[9], data[10]]),
            command: u16::from_le_bytes([data[11], data[12]]),
            sub_command: u16::from_le_bytes([data[13], data[14]]),
            device,
            point_count: u16::from_le_bytes([data[19], data[20]]),
            write_data: (!write_data.is_empty()).then(|| write_data.to_vec()),
        })
    }
}

/// Builds the bytes of a single-bit read request.
pub fn build_read_bit(address: &DeviceAddress) -> Vec<u8> {
    RequestFrame::read_bit(*address).to_bytes()
}

/// Builds the bytes of a single-word read request.
pub fn build_read_word(address: &DeviceAddress) -> Vec<u8> {
    RequestFrame::read_word(*address).to_bytes()
}

/// Builds the bytes of a single-bit write request.
pub fn build_write_bit(address: &DeviceAddress, value: bool) -> Vec<u8> {
    RequestFrame::write_bit(*address, value).to_bytes()
}

/// Builds the bytes of a single-word write request.
pub fn build_write_word(address: &DeviceAddress, value: u16) -> Vec<u8> {
    RequestFrame::write_word(*address, value).to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceCode;

    fn d100() -> DeviceAddress {
        DeviceAddress::new(DeviceCode::DataRegister, 100)
    }

    fn declared_length(bytes: &[u8]) -> u16 {
        u16::from_le_bytes([bytes[7], bytes[8]])
    }

    #[test]
    fn test_read_word_serialization() {
        let bytes = build_read_word(&d100());
        assert_eq!(
            bytes,
            hex::decode("500000ffff03000c00000001040000640000a80100").unwrap()
        );
    }

    #[test]
    fn test_read_bit_serialization() {
        let address = DeviceAddress::new(DeviceCode::InternalRelay, 10);
        let bytes = build_read_bit(&address);

        assert_eq!(bytes.len(), REQUEST_FIXED_LEN);
        assert_eq!(&bytes[..7], &[0x50, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00]);
        assert_eq!(declared_length(&bytes), 12);
        assert_eq!(&bytes[9..11], &[0x00, 0x00]); // timer
        assert_eq!(&bytes[11..13], &[0x01, 0x04]); // batch read
        assert_eq!(&bytes[13..15], &[0x01, 0x00]); // bit units
        assert_eq!(&bytes[15..18], &[0x0A, 0x00, 0x00]);
        assert_eq!(bytes[18], 0x90);
        assert_eq!(&bytes[19..21], &[0x01, 0x00]);
    }

    #[test]
    fn test_write_bit_serialization() {
        let address = DeviceAddress::new(DeviceCode::Output, 0x1F);
        let on = build_write_bit(&address, true);
        let off = build_write_bit(&address, false);

        assert_eq!(on.len(), REQUEST_FIXED_LEN + 1);
        assert_eq!(declared_length(&on), 13);
        assert_eq!(&on[11..13], &[0x01, 0x14]); // batch write
        assert_eq!(&on[13..15], &[0x01, 0x00]);
        assert_eq!(&on[15..18], &[0x1F, 0x00, 0x00]);
        assert_eq!(on[18], 0x9D);
        assert_eq!(on[21], 0x01);
        assert_eq!(off[21], 0x00);
    }

    #[test]
    fn test_write_word_serialization() {
        let bytes = build_write_word(&d100(), 0x1234);

        assert_eq!(bytes.len(), REQUEST_FIXED_LEN + 2);
        assert_eq!(declared_length(&bytes), 14);
        assert_eq!(&bytes[11..13], &[0x01, 0x14]);
        assert_eq!(&bytes[13..15], &[0x00, 0x00]);
        assert_eq!(&bytes[21..23], &[0x34, 0x12]);
    }

    #[test]
    fn test_declared_length_matches_remaining_bytes() {
        let address = DeviceAddress::new(DeviceCode::LinkRegister, 0xFFFF);
        let frames = [
            build_read_bit(&address),
            build_read_word(&address),
            build_write_bit(&address, true),
            build_write_word(&address, u16::MAX),
        ];
        for bytes in frames {
            assert_eq!(usize::from(declared_length(&bytes)), bytes.len() - 9);
        }
    }

    #[test]
    fn test_end_to_end_d100_fields() {
        let address: DeviceAddress = "D100".parse().unwrap();
        let frame = RequestFrame::read_word(address);

        assert_eq!(frame.command, CMD_BATCH_READ);
        assert_eq!(frame.sub_command, SUBCMD_WORD);
        assert_eq!(frame.point_count, 1);
        assert_eq!(frame.access_unit(), Some(AccessUnit::Word));

        let bytes = frame.to_bytes();
        assert_eq!(bytes[18], 0xA8);
        assert_eq!(&bytes[15..18], &[0x64, 0x00, 0x00]);
    }

    #[test]
    fn test_from_bytes() {
        let bytes = build_write_word(&d100(), 42);
        let frame = RequestFrame::from_bytes(&bytes).unwrap();
        assert_eq!(frame, RequestFrame::write_word(d100(), 42));

        let bytes = build_read_bit(&d100());
        let frame = RequestFrame::from_bytes(&bytes).unwrap();
        assert_eq!(frame.write_data(), None);
    }

    #[test]
    fn test_from_bytes_write_data_and_length_agree() {
        let bytes = build_write_word(&d100(), 0xBEEF);
        let frame = RequestFrame::from_bytes(&bytes).unwrap();
        assert_eq!(frame.write_data(), Some(&[0xEF, 0xBE][..]));
        assert_eq!(frame.data_length(), 14);
        assert_eq!(frame.to_bytes(), bytes);
    }

    #[test]
    fn test_from_bytes_rejects_reserved_id_byte() {
        let mut bytes = build_read_word(&d100());
        bytes[17] = 0x01;
        assert!(matches!(
            RequestFrame::from_bytes(&bytes),
            Err(SlmpError::MalformedAddress { .. })
        ));
    }

    #[test]
    fn test_from_bytes_rejects_bad_frames() {
        let bytes = build_read_word(&d100());
        assert!(matches!(
            RequestFrame::from_bytes(&bytes[..10]),
            Err(SlmpError::TruncatedRequest { .. })
        ));

        let mut extended = bytes.clone();
        extended.push(0x00);
        assert!(matches!(
            RequestFrame::from_bytes(&extended),
            Err(SlmpError::FrameLengthMismatch {
                declared: 12,
                actual: 13
            })
        ));

        let mut unknown = bytes;
        unknown[18] = 0x01;
        assert!(matches!(
            RequestFrame::from_bytes(&unknown),
            Err(SlmpError::UnknownDeviceCode { .. })
        ));
    }
}
