//! Human-readable rendering of request and response frames.
//!
//! Used for diagnostics only: the client renders frames through this module
//! when `trace` logging is enabled, and nothing in the protocol path depends on
//! the output. Rendering raw buffers never fails; bytes that cannot be decoded
//! are shown as a hex dump.
//!
//! # Example
//!
//! ```
//! use slmp::trace::RequestTrace;
//! use slmp::{DeviceAddress, RequestFrame};
//!
//! let frame = RequestFrame::read_word("D100".parse::<DeviceAddress>().unwrap());
//! let text = RequestTrace(&frame).to_string();
//! assert!(text.contains("device id  : 64 00 00 -> 100"));
//! assert!(text.contains("device code: A8 -> D"));
//! ```

use std::fmt;

use crate::error::end_code_description;
use crate::frame::{RequestFrame, CMD_BATCH_READ, CMD_BATCH_WRITE, SUBCMD_BIT, SUBCMD_WORD};
use crate::header::CommonHeader;
use crate::response::ResponseFrame;

/// Formats bytes as space separated upper-case hex pairs.
///
/// # Example
///
/// ```
/// use slmp::trace::hex_dump;
///
/// assert_eq!(hex_dump(&[0x50, 0x00, 0xFF]), "50 00 FF");
/// assert_eq!(hex_dump(&[]), "");
/// ```
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn operation_name(command: u16, sub_command: u16) -> &'static str {
    match (command, sub_command) {
        (CMD_BATCH_READ, SUBCMD_BIT) => "read bit",
        (CMD_BATCH_READ, SUBCMD_WORD) => "read word",
        (CMD_BATCH_WRITE, SUBCMD_BIT) => "write bit",
        (CMD_BATCH_WRITE, SUBCMD_WORD) => "write word",
        _ => "unknown",
    }
}

fn write_header(f: &mut fmt::Formatter<'_>, header: &CommonHeader) -> fmt::Result {
    writeln!(f, "  sub header : {}", hex_dump(&header.sub_header.to_le_bytes()))?;
    writeln!(f, "  network    : {:02X}", header.network)?;
    writeln!(f, "  station    : {:02X}", header.station)?;
    writeln!(f, "  unit io    : {}", hex_dump(&header.unit_io.to_le_bytes()))?;
    writeln!(f, "  multi drop : {:02X}", header.multi_drop)
}

fn write_u16(f: &mut fmt::Formatter<'_>, label: &str, value: u16) -> fmt::Result {
    writeln!(f, "  {label}: {} -> {value}", hex_dump(&value.to_le_bytes()))
}

/// Display adapter rendering every field of a request frame.
#[derive(Debug, Clone, Copy)]
pub struct RequestTrace<'a>(pub &'a RequestFrame);

impl fmt::Display for RequestTrace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0;
        let (device_code, device_id) = frame.device.encode();

        writeln!(
            f,
            "Request ({}):",
            operation_name(frame.command, frame.sub_command)
        )?;
        writeln!(f, "  all        : {}", hex_dump(&frame.to_bytes()))?;
        write_header(f, &frame.header)?;
        write_u16(f, "data length", frame.data_length())?;
        write_u16(f, "timer      ", frame.timer)?;
        writeln!(
            f,
            "  command    : {} -> 0x{:04X}",
            hex_dump(&frame.command.to_le_bytes()),
            frame.command
        )?;
        writeln!(
            f,
            "  sub command: {} -> 0x{:04X}",
            hex_dump(&frame.sub_command.to_le_bytes()),
            frame.sub_command
        )?;
        writeln!(
            f,
            "  device id  : {} -> {}",
            hex_dump(&device_id),
            frame.device.id
        )?;
        writeln!(
            f,
            "  device code: {:02X} -> {}",
            device_code, frame.device.code
        )?;
        write_u16(f, "point count", frame.point_count)?;
        if let Some(data) = frame.write_data() {
            writeln!(f, "  write data : {}", hex_dump(data))?;
        }
        Ok(())
    }
}

/// Display adapter rendering every field of a response frame.
#[derive(Debug, Clone, Copy)]
pub struct ResponseTrace<'a>(pub &'a ResponseFrame);

impl fmt::Display for ResponseTrace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0;

        writeln!(f, "Response:")?;
        write_header(f, &frame.header)?;
        write_u16(f, "data length", frame.data_length)?;
        write!(
            f,
            "  end code   : {} -> 0x{:04X}",
            hex_dump(&frame.end_code.to_le_bytes()),
            frame.end_code
        )?;
        match end_code_description(frame.end_code) {
            Some(text) => writeln!(f, " ({text})")?,
            None => writeln!(f)?,
        }
        writeln!(f, "  payload    : {}", hex_dump(&frame.payload))
    }
}

/// Renders a serialized request. Never fails.
pub fn format_request_bytes(bytes: &[u8]) -> String {
    match RequestFrame::from_bytes(bytes) {
        Ok(frame) => RequestTrace(&frame).to_string(),
        Err(err) => format!("<undecodable request: {err}> {}", hex_dump(bytes)),
    }
}

/// Renders a received response. Never fails.
pub fn format_response_bytes(bytes: &[u8]) -> String {
    match ResponseFrame::from_bytes(bytes) {
        Ok(frame) => ResponseTrace(&frame).to_string(),
        Err(err) => format!("<undecodable response: {err}> {}", hex_dump(bytes)),
    }
}
