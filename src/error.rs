//! Error types for the SLMP protocol.

use std::io;
use thiserror::Error;

/// Result type alias for SLMP operations.
pub type Result<T> = std::result::Result<T, SlmpError>;

/// Errors that can occur while building, exchanging or decoding SLMP frames.
#[derive(Debug, Error)]
pub enum SlmpError {
    /// The device mnemonic is not one of the recognized device classes.
    #[error("Unknown device code '{code}'")]
    UnknownDeviceCode {
        /// The mnemonic that was not recognized.
        code: String,
    },

    /// The device reference could not be parsed.
    #[error("Malformed device address '{address}': {reason}")]
    MalformedAddress {
        /// The text that was rejected.
        address: String,
        /// Description of the problem.
        reason: String,
    },

    /// The response is shorter than the fixed response prefix.
    #[error("Truncated response: expected at least {expected} bytes, got {actual}")]
    TruncatedResponse {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes received.
        actual: usize,
    },

    /// A serialized request is shorter than the fixed request layout.
    #[error("Truncated request: expected at least {expected} bytes, got {actual}")]
    TruncatedRequest {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes available.
        actual: usize,
    },

    /// The declared data length does not match the bytes that follow it.
    #[error("Frame length mismatch: data length field declares {declared} bytes, frame carries {actual}")]
    FrameLengthMismatch {
        /// Value of the data length field.
        declared: usize,
        /// Number of bytes actually following the data length field.
        actual: usize,
    },

    /// The payload width does not fit the requested value kind.
    #[error("Unexpected payload shape: expected {expected} byte(s), got {actual}")]
    UnexpectedPayloadShape {
        /// Payload width required by the value kind.
        expected: usize,
        /// Payload width received.
        actual: usize,
    },

    /// The controller answered with a non-zero end code.
    #[error("Controller fault: end code 0x{code:04X}")]
    ControllerFault {
        /// Raw end code reported by the controller.
        code: u16,
    },

    /// The requested data type cannot be served by a single-point exchange.
    #[error("Unsupported data type '{name}'")]
    UnsupportedDataType {
        /// Name of the data type.
        name: String,
    },

    /// The response declares more bytes than the client accepts.
    #[error("Response too large: declares {declared} bytes, at most {max} accepted")]
    ResponseTooLarge {
        /// Total frame size implied by the data length field.
        declared: usize,
        /// Largest frame accepted.
        max: usize,
    },

    /// An earlier exchange failed after its request was sent, so unread
    /// response bytes may still be on the stream.
    #[error("Stream desynchronized by an earlier failed exchange; reconnect or reset the client")]
    Desynchronized,

    /// Communication timeout.
    #[error("Communication timeout")]
    Timeout,

    /// The peer closed the stream before a complete frame arrived.
    #[error("Connection closed by peer")]
    ConnectionClosed,

    /// I/O error during communication.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SlmpError {
    /// Creates a new `UnknownDeviceCode` error.
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::SlmpError;
    ///
    /// let err = SlmpError::unknown_device_code("Q");
    /// assert_eq!(err.to_string(), "Unknown device code 'Q'");
    /// ```
    pub fn unknown_device_code(code: impl Into<String>) -> Self {
        Self::UnknownDeviceCode { code: code.into() }
    }

    /// Creates a new `MalformedAddress` error.
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::SlmpError;
    ///
    /// let err = SlmpError::malformed_address("D", "missing device id");
    /// ```
    pub fn malformed_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `TruncatedResponse` error.
    pub fn truncated_response(expected: usize, actual: usize) -> Self {
        Self::TruncatedResponse { expected, actual }
    }

    /// Creates a new `TruncatedRequest` error.
    pub fn truncated_request(expected: usize, actual: usize) -> Self {
        Self::TruncatedRequest { expected, actual }
    }

    /// Creates a new `FrameLengthMismatch` error.
    pub fn frame_length_mismatch(declared: usize, actual: usize) -> Self {
        Self::FrameLengthMismatch { declared, actual }
    }

    /// Creates a new `ResponseTooLarge` error.
    pub fn response_too_large(declared: usize, max: usize) -> Self {
        Self::ResponseTooLarge { declared, max }
    }

    /// Creates a new `UnexpectedPayloadShape` error.
    pub fn unexpected_payload_shape(expected: usize, actual: usize) -> Self {
        Self::UnexpectedPayloadShape { expected, actual }
    }

    /// Creates a new `ControllerFault` error.
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::SlmpError;
    ///
    /// let err = SlmpError::controller_fault(0xC059);
    /// assert_eq!(err.to_string(), "Controller fault: end code 0xC059");
    /// ```
    pub fn controller_fault(code: u16) -> Self {
        Self::ControllerFault { code }
    }

    /// Creates a new `UnsupportedDataType` error.
    pub fn unsupported_data_type(name: impl Into<String>) -> Self {
        Self::UnsupportedDataType { name: name.into() }
    }

    /// Returns the controller end code if this is a `ControllerFault`.
    pub fn end_code(&self) -> Option<u16> {
        match self {
            Self::ControllerFault { code } => Some(*code),
            _ => None,
        }
    }
}

/// Returns a short description for common SLMP end codes.
///
/// The table covers the codes an Ethernet-connected CPU reports for malformed
/// or out-of-range requests. Unknown codes return `None`; consult the
/// controller manual for module-specific codes.
///
/// # Example
///
/// ```
/// use slmp::end_code_description;
///
/// assert_eq!(end_code_description(0x0000), Some("Normal completion"));
/// assert!(end_code_description(0xC059).is_some());
/// assert_eq!(end_code_description(0x1234), None);
/// ```
pub fn end_code_description(code: u16) -> Option<&'static str> {
    let text = match code {
        0x0000 => "Normal completion",
        0xC050 => "ASCII data could not be converted to binary",
        0xC051..=0xC054 => "Number of read/write points outside the allowable range",
        0xC056 => "Read/write request exceeds the maximum address",
        0xC058 => "Request data length does not match the number of data points",
        0xC059 => "Command or subcommand is specified incorrectly",
        0xC05B => "CPU module cannot read/write the specified device",
        0xC05C => "Request contents are incorrect",
        0xC05F => "Request cannot be executed on the target CPU module",
        0xC060 => "Request contents are incorrect for the bit device",
        0xC061 => "Request data length does not match the request contents",
        0xC06F => "Communication data code setting does not match",
        _ => return None,
    };
    Some(text)
}
