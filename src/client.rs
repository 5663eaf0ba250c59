//! High-level SLMP client for reading and writing PLC devices.
//!
//! This module provides the [`Client`] struct, the primary interface for
//! exchanging single-point reads and writes with a controller.
//!
//! # Overview
//!
//! The client handles:
//! - Parsing device references (`"D100"`, `"X1F"`, `"M10"`)
//! - Request construction and serialization
//! - Reading exactly one response frame from the stream
//! - Response validation, end code checking and value extraction
//!
//! # Example
//!
//! ```no_run
//! use slmp::{Client, ClientConfig, DataType};
//! use std::net::Ipv4Addr;
//!
//! let config = ClientConfig::new(Ipv4Addr::new(192, 168, 0, 2));
//! let mut client = Client::connect(config)?;
//!
//! let level = client.read_word("D100")?;
//! client.write_word("D101", level + 1)?;
//!
//! let running = client.read_bit("M10")?;
//! client.write_bit("Y20", !running)?;
//!
//! let temperature = client.read("D200", DataType::Int16)?;
//! println!("D200 = {}", temperature);
//! # Ok::<(), slmp::SlmpError>(())
//! ```
//!
//! # Concurrency
//!
//! The protocol carries no request identifiers, so one connection must finish
//! a request/response pair before starting the next. Every operation takes
//! `&mut self`; use one client per connection to talk to several controllers
//! in parallel.
//!
//! For the same reason a response that arrives late or malformed cannot be
//! told apart from the answer to the next request. Once an exchange fails
//! after its request was sent, the client refuses further requests with
//! [`SlmpError::Desynchronized`] until [`Client::reconnect`] (TCP) or
//! [`Client::reset`] is called.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use log::{debug, log_enabled, trace, warn, Level};

use crate::device::DeviceAddress;
use crate::error::{Result, SlmpError};
use crate::frame::RequestFrame;
use crate::response::{frame_len, ResponseFrame, MIN_RESPONSE_SIZE};
use crate::trace::{hex_dump, RequestTrace, ResponseTrace};
use crate::transport::{
    TcpTransport, Transport, DEFAULT_SLMP_PORT, DEFAULT_TIMEOUT, MAX_FRAME_SIZE,
};
use crate::value::{extract, extract_bit, extract_word, DataType, RegisterValue};

/// Configuration for connecting a client over TCP.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientConfig {
    /// PLC socket address.
    pub plc_addr: SocketAddr,
    /// Connect, read and write timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration for the PLC at `plc_ip` on the default port.
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::ClientConfig;
    /// use std::net::Ipv4Addr;
    ///
    /// let config = ClientConfig::new(Ipv4Addr::new(192, 168, 0, 2));
    /// assert_eq!(config.plc_addr.port(), 1025);
    /// ```
    pub fn new(plc_ip: Ipv4Addr) -> Self {
        Self {
            plc_addr: SocketAddr::from((plc_ip, DEFAULT_SLMP_PORT)),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom PLC port (default is 1025).
    pub fn with_port(mut self, port: u16) -> Self {
        self.plc_addr.set_port(port);
        self
    }

    /// Sets a custom timeout (default is 2 seconds).
    ///
    /// # Example
    ///
    /// ```
    /// use slmp::ClientConfig;
    /// use std::net::Ipv4Addr;
    /// use std::time::Duration;
    ///
    /// let config = ClientConfig::new(Ipv4Addr::new(192, 168, 0, 2))
    ///     .with_port(5000)
    ///     .with_timeout(Duration::from_secs(5));
    /// ```
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// SLMP client over a connected transport.
///
/// Each operation produces exactly 1 request and 1 response. No automatic
/// retries, caching, or reconnection.
#[derive(Debug)]
pub struct Client<T = TcpTransport> {
    transport: T,
    desynchronized: bool,
}

impl Client<TcpTransport> {
    /// Connects to the PLC described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP connection cannot be established.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        debug!("connecting to {}", config.plc_addr);
        let transport = TcpTransport::connect(config.plc_addr, config.timeout)?;
        Ok(Self::new(transport))
    }

    /// Opens a fresh connection to the same PLC, discarding any stale bytes
    /// left by a failed exchange, and clears the desynchronized state.
    ///
    /// # Errors
    ///
    /// Returns an error if the new connection cannot be established; the
    /// client then stays desynchronized if it was.
    pub fn reconnect(&mut self) -> Result<()> {
        debug!("reconnecting to {}", self.transport.remote_addr());
        self.transport.reconnect()?;
        self.desynchronized = false;
        Ok(())
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client over an already connected transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            desynchronized: false,
        }
    }

    /// Returns `true` if a failed exchange may have left unread bytes on the
    /// transport. Requests are refused while this is set.
    pub fn is_desynchronized(&self) -> bool {
        self.desynchronized
    }

    /// Clears the desynchronized state.
    ///
    /// Only call this once stale bytes have been drained from the transport
    /// (e.g. through [`Client::transport_mut`]); otherwise the next request
    /// may be answered with an earlier response.
    pub fn reset(&mut self) {
        self.desynchronized = false;
    }

    /// Returns a reference to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the client and returns the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Reads a single bit, e.g. `client.read_bit("M10")`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The device reference is invalid (nothing is sent)
    /// - Communication fails
    /// - The response is malformed or not a 1-byte payload
    /// - The controller reports a fault
    pub fn read_bit(&mut self, device: &str) -> Result<bool> {
        let address = DeviceAddress::parse(device)?;
        self.read_bit_at(&address)
    }

    /// Reads a single bit from a parsed address.
    pub fn read_bit_at(&mut self, address: &DeviceAddress) -> Result<bool> {
        debug!("read bit {address}");
        let response = self.exchange(&RequestFrame::read_bit(*address))?;
        extract_bit(&response)
    }

    /// Reads a single unsigned word, e.g. `client.read_word("D100")`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The device reference is invalid (nothing is sent)
    /// - Communication fails
    /// - The response is malformed or not a 2-byte payload
    /// - The controller reports a fault
    pub fn read_word(&mut self, device: &str) -> Result<u16> {
        let address = DeviceAddress::parse(device)?;
        self.read_word_at(&address)
    }

    /// Reads a single unsigned word from a parsed address.
    pub fn read_word_at(&mut self, address: &DeviceAddress) -> Result<u16> {
        debug!("read word {address}");
        let response = self.exchange(&RequestFrame::read_word(*address))?;
        extract_word(&response)
    }

    /// Reads a single word and reinterprets it as two's complement.
    pub fn read_i16(&mut self, device: &str) -> Result<i16> {
        Ok(self.read_word(device)? as i16)
    }

    /// Writes a single bit.
    ///
    /// # Errors
    ///
    /// Returns an error if the device reference is invalid, communication
    /// fails, the response is malformed, or the controller reports a fault.
    pub fn write_bit(&mut self, device: &str, value: bool) -> Result<()> {
        let address = DeviceAddress::parse(device)?;
        self.write_bit_at(&address, value)
    }

    /// Writes a single bit to a parsed address.
    pub fn write_bit_at(&mut self, address: &DeviceAddress, value: bool) -> Result<()> {
        debug!("write bit {address} = {value}");
        let response = self.exchange(&RequestFrame::write_bit(*address, value))?;
        response.check_end_code()
    }

    /// Writes a single word.
    ///
    /// # Errors
    ///
    /// Returns an error if the device reference is invalid, communication
    /// fails, the response is malformed, or the controller reports a fault.
    pub fn write_word(&mut self, device: &str, value: u16) -> Result<()> {
        let address = DeviceAddress::parse(device)?;
        self.write_word_at(&address, value)
    }

    /// Writes a single word to a parsed address.
    pub fn write_word_at(&mut self, address: &DeviceAddress, value: u16) -> Result<()> {
        debug!("write word {address} = 0x{value:04X}");
        let response = self.exchange(&RequestFrame::write_word(*address, value))?;
        response.check_end_code()
    }

    /// Reads a device according to its declared data type.
    ///
    /// `Bool` reads in bit units; `Int16` and `UInt16` read one word and tag it
    /// with the matching signedness.
    pub fn read(&mut self, device: &str, data_type: DataType) -> Result<RegisterValue> {
        let address = DeviceAddress::parse(device)?;
        debug!("read {data_type} {address}");
        let request = match data_type {
            DataType::Bool => RequestFrame::read_bit(address),
            DataType::Int16 | DataType::UInt16 => RequestFrame::read_word(address),
        };
        let response = self.exchange(&request)?;
        extract(&response, data_type)
    }

    /// Writes a typed value; bits are written in bit units, words in word units.
    pub fn write(&mut self, device: &str, value: RegisterValue) -> Result<()> {
        let address = DeviceAddress::parse(device)?;
        match value {
            RegisterValue::Bit(bit) => self.write_bit_at(&address, bit),
            RegisterValue::Word { raw, .. } => self.write_word_at(&address, raw),
        }
    }

    /// Sends one request and reads back one response frame.
    ///
    /// Any failure from the send onwards leaves the stream position unknown
    /// and marks the client desynchronized.
    fn exchange(&mut self, request: &RequestFrame) -> Result<ResponseFrame> {
        if self.desynchronized {
            return Err(SlmpError::Desynchronized);
        }
        if log_enabled!(Level::Trace) {
            trace!("{}", RequestTrace(request));
        }

        let response = self.send_and_receive(request).inspect_err(|err| {
            warn!("{}: exchange failed ({err}), client desynchronized", request.device);
            self.desynchronized = true;
        })?;
        if log_enabled!(Level::Trace) {
            trace!("{}", ResponseTrace(&response));
        }
        if !response.is_success() {
            warn!(
                "{} reported end code 0x{:04X}",
                request.device, response.end_code
            );
        }
        Ok(response)
    }

    fn send_and_receive(&mut self, request: &RequestFrame) -> Result<ResponseFrame> {
        self.transport.send(&request.to_bytes())?;

        let raw = self.receive_frame()?;
        ResponseFrame::from_bytes(&raw).inspect_err(|err| {
            warn!("discarding malformed response ({err}): {}", hex_dump(&raw));
        })
    }

    /// Buffers bytes until the declared frame length is reached or the peer
    /// stops sending. Never reads past the end of one frame.
    fn receive_frame(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(MIN_RESPONSE_SIZE);
        loop {
            let target = frame_len(&buffer).unwrap_or(MIN_RESPONSE_SIZE);
            if target > MAX_FRAME_SIZE {
                return Err(SlmpError::response_too_large(target, MAX_FRAME_SIZE));
            }
            let wanted = target.saturating_sub(buffer.len());
            if wanted == 0 {
                break;
            }

            let chunk = self.transport.receive(wanted)?;
            if chunk.is_empty() {
                if buffer.is_empty() {
                    return Err(SlmpError::ConnectionClosed);
                }
                break;
            }
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer)
    }
}
