//! Device addressing for SLMP requests.
//!
//! A device reference such as `"D100"` names a register class by its
//! mnemonic (`D`, data register) followed by the offset inside that class
//! (`100`). This module turns such text into a [`DeviceAddress`] and encodes it
//! into the 4 bytes a 3E request carries for it.
//!
//! # Device Classes
//!
//! | Mnemonic | Device | Code | Kind | Id radix |
//! |----------|--------|:----:|:----:|:--------:|
//! | X | Input | 0x9C | bit | hex |
//! | Y | Output | 0x9D | bit | hex |
//! | M | Internal relay | 0x90 | bit | dec |
//! | L | Latch relay | 0x92 | bit | dec |
//! | B | Link relay | 0xA0 | bit | hex |
//! | SM | Special relay | 0x91 | bit | dec |
//! | D | Data register | 0xA8 | word | dec |
//! | W | Link register | 0xB4 | word | hex |
//! | R | File register | 0xAF | word | dec |
//! | SD | Special register | 0xA9 | word | dec |
//!
//! # Example
//!
//! ```
//! use slmp::{DeviceAddress, DeviceCode};
//!
//! let address: DeviceAddress = "D100".parse().unwrap();
//! assert_eq!(address.code, DeviceCode::DataRegister);
//! assert_eq!(address.id, 100);
//!
//! let (code, id) = address.encode();
//! assert_eq!(code, 0xA8);
//! assert_eq!(id, [0x64, 0x00, 0x00]);
//!
//! // Inputs and outputs are numbered in hexadecimal
//! let input: DeviceAddress = "X1F".parse().unwrap();
//! assert_eq!(input.id, 0x1F);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SlmpError};

/// Width of the device id field on the wire.
pub const DEVICE_ID_SIZE: usize = 3;

/// Device classes addressable through a 3E frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceCode {
    /// X - input relay.
    Input,
    /// Y - output relay.
    Output,
    /// M - internal relay.
    InternalRelay,
    /// L - latch relay.
    LatchRelay,
    /// B - link relay.
    LinkRelay,
    /// SM - special relay.
    SpecialRelay,
    /// D - data register.
    DataRegister,
    /// W - link register.
    LinkRegister,
    /// R - file register.
    FileRegister,
    /// SD - special register.
    SpecialRegister,
}

impl DeviceCode {
    /// All recognized device classes.
    pub const ALL: [DeviceCode; 10] = [
        DeviceCode::Input,
        DeviceCode::Output,
        DeviceCode::InternalRelay,
        DeviceCode::LatchRelay,
        DeviceCode::LinkRelay,
        DeviceCode::SpecialRelay,
        DeviceCode::DataRegister,
        DeviceCode::LinkRegister,
        DeviceCode::FileRegister,
        DeviceCode::SpecialRegister,
    ];

    /// Returns the binary device code sent on the wire.
    pub fn wire_code(self) -> u8 {
        match self {
            DeviceCode::Input => 0x9C,
            DeviceCode::Output => 0x9D,
            DeviceCode::InternalRelay => 0x90,
            DeviceCode::LatchRelay => 0x92,
            DeviceCode::LinkRelay => 0xA0,
            DeviceCode::SpecialRelay => 0x91,
            DeviceCode::DataRegister => 0xA8,
            DeviceCode::LinkRegister => 0xB4,
            DeviceCode::FileRegister => 0xAF,
            DeviceCode::SpecialRegister => 0xA9,
        }
    }

    /// Looks up a device class by its wire code.
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::DeviceCode;
    ///
    /// assert_eq!(DeviceCode::from_wire_code(0xA8), Some(DeviceCode::DataRegister));
    /// assert_eq!(DeviceCode::from_wire_code(0x00), None);
    /// ```
    pub fn from_wire_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.wire_code() == code)
    }

    /// Returns the textual mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            DeviceCode::Input => "X",
            DeviceCode::Output => "Y",
            DeviceCode::InternalRelay => "M",
            DeviceCode::LatchRelay => "L",
            DeviceCode::LinkRelay => "B",
            DeviceCode::SpecialRelay => "SM",
            DeviceCode::DataRegister => "D",
            DeviceCode::LinkRegister => "W",
            DeviceCode::FileRegister => "R",
            DeviceCode::SpecialRegister => "SD",
        }
    }

    /// Looks up a device class by its upper-case mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.mnemonic() == mnemonic)
    }

    /// Returns the radix device ids of this class are written in.
    pub fn radix(self) -> u32 {
        match self {
            DeviceCode::Input
            | DeviceCode::Output
            | DeviceCode::LinkRelay
            | DeviceCode::LinkRegister => 16,
            _ => 10,
        }
    }

    /// Returns whether this class holds single bits rather than 16-bit words.
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::DeviceCode;
    ///
    /// assert!(DeviceCode::InternalRelay.is_bit_device());
    /// assert!(!DeviceCode::DataRegister.is_bit_device());
    /// ```
    pub fn is_bit_device(self) -> bool {
        matches!(
            self,
            DeviceCode::Input
                | DeviceCode::Output
                | DeviceCode::InternalRelay
                | DeviceCode::LatchRelay
                | DeviceCode::LinkRelay
                | DeviceCode::SpecialRelay
        )
    }
}

impl fmt::Display for DeviceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A parsed device reference: device class plus offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceAddress {
    /// Device class.
    pub code: DeviceCode,
    /// Offset within the device class.
    pub id: u16,
}

impl DeviceAddress {
    /// Creates a device address from its parts.
    pub fn new(code: DeviceCode, id: u16) -> Self {
        Self { code, id }
    }

    /// Parses a textual device reference such as `"D100"`, `"X1F"` or `"m10"`.
    ///
    /// # Errors
    ///
    /// - `SlmpError::UnknownDeviceCode` if the mnemonic is not recognized
    /// - `SlmpError::MalformedAddress` if the id is missing, is not a number
    ///   in the device's radix, or does not fit in 16 bits
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::{DeviceAddress, DeviceCode, SlmpError};
    ///
    /// let address = DeviceAddress::parse("M10").unwrap();
    /// assert_eq!(address, DeviceAddress::new(DeviceCode::InternalRelay, 10));
    ///
    /// assert!(matches!(
    ///     DeviceAddress::parse("Q10"),
    ///     Err(SlmpError::UnknownDeviceCode { .. })
    /// ));
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let normalized = text.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(SlmpError::malformed_address(text, "empty device reference"));
        }

        let split = normalized
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(normalized.len());
        let (prefix, digits) = normalized.split_at(split);
        if prefix.is_empty() {
            return Err(SlmpError::malformed_address(text, "missing device code"));
        }

        if let Some(code) = DeviceCode::from_mnemonic(prefix) {
            return parse_id(text, code, digits);
        }

        // Hex-numbered devices may have ids starting with A-F, e.g. "XA0".
        let hex_split = DeviceCode::ALL.into_iter().find(|c| {
            c.radix() == 16
                && prefix.len() > c.mnemonic().len()
                && prefix.starts_with(c.mnemonic())
                && prefix[c.mnemonic().len()..]
                    .chars()
                    .all(|ch| ch.is_ascii_hexdigit())
        });
        match hex_split {
            Some(code) => parse_id(text, code, &normalized[code.mnemonic().len()..]),
            None => Err(SlmpError::unknown_device_code(prefix)),
        }
    }

    /// Encodes the address into its wire form: the device code byte and the
    /// 3-byte device id (little-endian id followed by a reserved zero byte).
    pub fn encode(&self) -> (u8, [u8; DEVICE_ID_SIZE]) {
        let id = self.id.to_le_bytes();
        (self.code.wire_code(), [id[0], id[1], 0x00])
    }

    /// Decodes an address from its wire form.
    ///
    /// # Errors
    ///
    /// Returns `SlmpError::UnknownDeviceCode` if the code byte is not
    /// recognized, or `SlmpError::MalformedAddress` if the reserved id byte is
    /// not zero (it would be lost on re-encoding).
    pub fn decode(code: u8, id: [u8; DEVICE_ID_SIZE]) -> Result<Self> {
        let device_code = DeviceCode::from_wire_code(code)
            .ok_or_else(|| SlmpError::unknown_device_code(format!("0x{code:02X}")))?;
        if id[2] != 0 {
            return Err(SlmpError::malformed_address(
                format!("{:02X} {:02X} {:02X} {code:02X}", id[0], id[1], id[2]),
                "reserved device id byte is not zero",
            ));
        }
        Ok(Self::new(device_code, u16::from_le_bytes([id[0], id[1]])))
    }
}

fn parse_id(text: &str, code: DeviceCode, digits: &str) -> Result<DeviceAddress> {
    if digits.is_empty() {
        return Err(SlmpError::malformed_address(text, "missing device id"));
    }
    let radix = code.radix();
    if !digits.chars().all(|c| c.is_digit(radix)) {
        let kind = if radix == 16 { "hexadecimal" } else { "decimal" };
        return Err(SlmpError::malformed_address(
            text,
            format!("device id '{digits}' is not a valid {kind} number"),
        ));
    }
    let id = u16::from_str_radix(digits, radix).map_err(|_| {
        SlmpError::malformed_address(text, format!("device id '{digits}' exceeds 16 bits"))
    })?;
    Ok(DeviceAddress::new(code, id))
}

impl FromStr for DeviceAddress {
    type Err = SlmpError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.radix() == 16 {
            write!(f, "{}{:X}", self.code, self.id)
        } else {
            write!(f, "{}{}", self.code, self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(DeviceCode::Input.wire_code(), 0x9C);
        assert_eq!(DeviceCode::Output.wire_code(), 0x9D);
        assert_eq!(DeviceCode::InternalRelay.wire_code(), 0x90);
        assert_eq!(DeviceCode::DataRegister.wire_code(), 0xA8);
    }

    #[test]
    fn test_wire_codes_are_distinct() {
        for (i, a) in DeviceCode::ALL.iter().enumerate() {
            for b in &DeviceCode::ALL[i + 1..] {
                assert_ne!(a.wire_code(), b.wire_code());
                assert_ne!(a.mnemonic(), b.mnemonic());
            }
        }
    }

    #[test]
    fn test_parse_data_register() {
        let address = DeviceAddress::parse("D100").unwrap();
        assert_eq!(address.code, DeviceCode::DataRegister);
        assert_eq!(address.id, 100);
        assert_eq!(address.encode(), (0xA8, [0x64, 0x00, 0x00]));
    }

    #[test]
    fn test_parse_internal_relay_lowercase() {
        let address: DeviceAddress = " m10 ".parse().unwrap();
        assert_eq!(address, DeviceAddress::new(DeviceCode::InternalRelay, 10));
    }

    #[test]
    fn test_parse_hex_devices() {
        assert_eq!(
            DeviceAddress::parse("X1F").unwrap(),
            DeviceAddress::new(DeviceCode::Input, 0x1F)
        );
        assert_eq!(
            DeviceAddress::parse("Y10").unwrap(),
            DeviceAddress::new(DeviceCode::Output, 0x10)
        );
        assert_eq!(
            DeviceAddress::parse("XA0").unwrap(),
            DeviceAddress::new(DeviceCode::Input, 0xA0)
        );
        assert_eq!(
            DeviceAddress::parse("WFFFF").unwrap(),
            DeviceAddress::new(DeviceCode::LinkRegister, 0xFFFF)
        );
    }

    #[test]
    fn test_parse_two_letter_mnemonics() {
        assert_eq!(
            DeviceAddress::parse("SM400").unwrap(),
            DeviceAddress::new(DeviceCode::SpecialRelay, 400)
        );
        assert_eq!(
            DeviceAddress::parse("SD0").unwrap(),
            DeviceAddress::new(DeviceCode::SpecialRegister, 0)
        );
    }

    #[test]
    fn test_parse_unknown_code() {
        match DeviceAddress::parse("Q10") {
            Err(SlmpError::UnknownDeviceCode { code }) => assert_eq!(code, "Q"),
            other => panic!("Expected UnknownDeviceCode, got {:?}", other),
        }
        assert!(matches!(
            DeviceAddress::parse("DX100"),
            Err(SlmpError::UnknownDeviceCode { .. })
        ));
        assert!(matches!(
            DeviceAddress::parse("XZ1"),
            Err(SlmpError::UnknownDeviceCode { .. })
        ));
    }

    #[test]
    fn test_parse_malformed() {
        for text in ["", "   ", "100", "D", "D-1", "D1.5", "D1A", "M0x10"] {
            assert!(
                matches!(
                    DeviceAddress::parse(text),
                    Err(SlmpError::MalformedAddress { .. })
                ),
                "{text:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_parse_id_out_of_range() {
        assert!(DeviceAddress::parse("D65535").is_ok());
        assert!(matches!(
            DeviceAddress::parse("D65536"),
            Err(SlmpError::MalformedAddress { .. })
        ));
        assert!(matches!(
            DeviceAddress::parse("X10000"),
            Err(SlmpError::MalformedAddress { .. })
        ));
    }

    #[test]
    fn test_encode_high_id() {
        let address = DeviceAddress::new(DeviceCode::DataRegister, 0x1234);
        assert_eq!(address.encode(), (0xA8, [0x34, 0x12, 0x00]));
    }

    #[test]
    fn test_text_roundtrip_preserves_encoding() {
        for code in DeviceCode::ALL {
            for id in [0u16, 1, 9, 10, 0xA0, 255, 256, 4095, 0x7FFF, u16::MAX] {
                let address = DeviceAddress::new(code, id);
                let parsed = DeviceAddress::parse(&address.to_string()).unwrap();
                assert_eq!(parsed, address);
                assert_eq!(parsed.encode(), address.encode());
            }
        }
    }

    #[test]
    fn test_decode() {
        let address = DeviceAddress::decode(0x9D, [0x1F, 0x00, 0x00]).unwrap();
        assert_eq!(address, DeviceAddress::new(DeviceCode::Output, 0x1F));
        assert!(DeviceAddress::decode(0x01, [0, 0, 0]).is_err());
    }

    #[test]
    fn test_decode_rejects_reserved_byte() {
        let err = DeviceAddress::decode(0xA8, [0x64, 0x00, 0x01]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed device address '64 00 01 A8': reserved device id byte is not zero"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(DeviceAddress::new(DeviceCode::Input, 31).to_string(), "X1F");
        assert_eq!(
            DeviceAddress::new(DeviceCode::DataRegister, 100).to_string(),
            "D100"
        );
        assert_eq!(DeviceCode::SpecialRelay.to_string(), "SM");
    }

    #[test]
    fn test_is_bit_device() {
        assert!(DeviceCode::Input.is_bit_device());
        assert!(DeviceCode::Output.is_bit_device());
        assert!(DeviceCode::InternalRelay.is_bit_device());
        assert!(!DeviceCode::DataRegister.is_bit_device());
        assert!(!DeviceCode::FileRegister.is_bit_device());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let address = DeviceAddress::new(DeviceCode::DataRegister, 100);
        let json = serde_json::to_string(&address).unwrap();
        let back: DeviceAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
