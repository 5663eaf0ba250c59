//! Byte-stream transport for SLMP communication.
//!
//! The protocol layer only needs to push request bytes out and pull response
//! bytes in. [`Transport`] captures exactly that, so the client can run over
//! any connected stream (or a scripted stand-in in tests). [`TcpTransport`] is
//! the adapter for a plain TCP connection to the PLC's SLMP port.
//!
//! # Constants
//!
//! - [`DEFAULT_SLMP_PORT`] - Default SLMP TCP port (1025)
//! - [`DEFAULT_TIMEOUT`] - Default timeout (2 seconds)
//! - [`MAX_FRAME_SIZE`] - Largest response accepted (1024 bytes)
//!
//! # Example
//!
//! ```no_run
//! use slmp::{TcpTransport, Transport};
//! use std::time::Duration;
//!
//! let mut transport = TcpTransport::connect(
//!     "192.168.0.2:1025".parse().unwrap(),
//!     Duration::from_secs(2),
//! ).unwrap();
//!
//! transport.send(&[0x50, 0x00, /* ... rest of the frame */]).unwrap();
//! let bytes = transport.receive(1024).unwrap();
//! ```

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use crate::error::{Result, SlmpError};

/// Default SLMP TCP port.
pub const DEFAULT_SLMP_PORT: u16 = 1025;

/// Default timeout for socket operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Maximum response size accepted from the controller.
pub const MAX_FRAME_SIZE: usize = 1024;

/// A connected byte stream to the controller.
///
/// Implementations neither frame nor interpret the bytes.
pub trait Transport {
    /// Sends all of `data`.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receives up to `max_bytes` bytes.
    ///
    /// Blocks until at least one byte is available. An empty vector means the
    /// peer closed the stream.
    fn receive(&mut self, max_bytes: usize) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data)
    }

    fn receive(&mut self, max_bytes: usize) -> Result<Vec<u8>> {
        (**self).receive(max_bytes)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data)
    }

    fn receive(&mut self, max_bytes: usize) -> Result<Vec<u8>> {
        (**self).receive(max_bytes)
    }
}

fn map_io_error(err: io::Error) -> SlmpError {
    match err.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => SlmpError::Timeout,
        _ => SlmpError::Io(err),
    }
}

/// TCP transport for SLMP communication.
///
/// Handles synchronous TCP communication with configurable timeout.
pub struct TcpTransport {
    stream: TcpStream,
    remote_addr: SocketAddr,
    timeout: Duration,
}

impl TcpTransport {
    /// Connects to the PLC at `plc_addr`.
    ///
    /// `timeout` bounds the connection attempt and every subsequent read and
    /// write.
    ///
    /// # Errors
    ///
    /// Returns `SlmpError::Timeout` if the connection attempt times out, or an
    /// I/O error if the socket cannot be created or configured.
    pub fn connect(plc_addr: SocketAddr, timeout: Duration) -> Result<Self> {
        let stream = TcpStream::connect_timeout(&plc_addr, timeout).map_err(map_io_error)?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;

        Ok(Self {
            stream,
            remote_addr: plc_addr,
            timeout,
        })
    }

    /// Wraps an already connected stream.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the peer address cannot be read.
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let remote_addr = stream.peer_addr()?;
        let timeout = stream.read_timeout()?.unwrap_or(DEFAULT_TIMEOUT);
        Ok(Self {
            stream,
            remote_addr,
            timeout,
        })
    }

    /// Replaces the connection with a fresh one to the same address.
    ///
    /// Any bytes still pending on the old connection are discarded with it.
    ///
    /// # Errors
    ///
    /// Same as [`TcpTransport::connect`]. The old connection is kept on error.
    pub fn reconnect(&mut self) -> Result<()> {
        *self = Self::connect(self.remote_addr, self.timeout)?;
        Ok(())
    }

    /// Returns the remote PLC address.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Returns the timeout applied to connect, read and write.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns a reference to the underlying stream.
    pub fn stream(&self) -> &TcpStream {
        &self.stream
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.stream.write_all(data).map_err(map_io_error)
    }

    fn receive(&mut self, max_bytes: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; max_bytes];
        let size = self.stream.read(&mut buffer).map_err(map_io_error)?;
        buffer.truncate(size);
        Ok(buffer)
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("remote_addr", &self.remote_addr)
            .field("timeout", &self.timeout)
            .field("local_addr", &self.stream.local_addr().ok())
            .finish()
    }
}
