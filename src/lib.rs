//! # SLMP 3E Frame Library
//!
//! A Rust library for reading and writing PLC device registers with the binary
//! SLMP 3E frame (the MELSEC communication protocol format used over Ethernet).
//!
//! This is a **protocol-only** library—no polling, schedulers, or
//! application-level features. Each call produces exactly 1 request and
//! 1 response. No automatic retries, caching, or reconnection.
//!
//! ## Features
//!
//! - **Text addressing** — `"D100"`, `"X1F"`, `"M10"` parsed into typed addresses
//! - **Pure frame codec** — building and parsing frames performs no I/O
//! - **Validated responses** — length and end code are checked before any value is extracted
//! - **Transport agnostic** — any connected byte stream implementing [`Transport`]
//! - **No panics** — all errors returned as `Result<T, SlmpError>`
//!
//! ## Quick Start
//!
//! ```no_run
//! use slmp::{Client, ClientConfig};
//! use std::net::Ipv4Addr;
//!
//! fn main() -> slmp::Result<()> {
//!     // Connect to the PLC's SLMP port (default 1025)
//!     let config = ClientConfig::new(Ipv4Addr::new(192, 168, 0, 2));
//!     let mut client = Client::connect(config)?;
//!
//!     // Read data register D100
//!     let value = client.read_word("D100")?;
//!     println!("D100 = {}", value);
//!
//!     // Write a data register
//!     client.write_word("D200", 0x1234)?;
//!
//!     // Read and write bit devices
//!     let input = client.read_bit("X1F")?;
//!     client.write_bit("M10", input)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Device Classes
//!
//! | Mnemonic | Device | Kind |
//! |----------|--------|------|
//! | `X` | Input (hex numbered) | bit |
//! | `Y` | Output (hex numbered) | bit |
//! | `M` | Internal relay | bit |
//! | `L` | Latch relay | bit |
//! | `B` | Link relay (hex numbered) | bit |
//! | `SM` | Special relay | bit |
//! | `D` | Data register | word |
//! | `W` | Link register (hex numbered) | word |
//! | `R` | File register | word |
//! | `SD` | Special register | word |
//!
//! ## Frame Codec
//!
//! The codec can be used without a client, e.g. to drive your own transport:
//!
//! ```
//! use slmp::{build_read_word, extract_word, DeviceAddress, ResponseFrame};
//!
//! let address: DeviceAddress = "D100".parse()?;
//! let request = build_read_word(&address);
//! assert_eq!(request.len(), 21);
//!
//! // ... send `request`, receive `raw` ...
//! let raw = [0xD0, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00, 0x04, 0x00, 0x00, 0x00, 0x2A, 0x00];
//! let response = ResponseFrame::from_bytes(&raw)?;
//! assert_eq!(extract_word(&response)?, 42);
//! # Ok::<(), slmp::SlmpError>(())
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use slmp::{end_code_description, Client, ClientConfig, SlmpError};
//! use std::net::Ipv4Addr;
//!
//! let mut client = Client::connect(ClientConfig::new(Ipv4Addr::new(192, 168, 0, 2)))?;
//!
//! match client.read_word("D100") {
//!     Ok(value) => println!("D100 = {}", value),
//!     Err(SlmpError::Timeout) => {
//!         // The late reply may still arrive; start over on a fresh connection
//!         client.reconnect()?;
//!     }
//!     Err(SlmpError::ControllerFault { code }) => {
//!         let text = end_code_description(code).unwrap_or("see controller manual");
//!         println!("PLC fault 0x{:04X}: {}", code, text);
//!     }
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok::<(), SlmpError>(())
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: each
//! operation at `debug`, controller faults and malformed responses at `warn`,
//! and a field-by-field rendering of every frame at `trace` (see [`trace`]).

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod client;
mod device;
mod error;
mod frame;
mod header;
mod response;
mod transport;
mod value;
pub mod trace;

// Public re-exports
pub use client::{Client, ClientConfig};
pub use device::{DeviceAddress, DeviceCode, DEVICE_ID_SIZE};
pub use error::{end_code_description, Result, SlmpError};
pub use frame::{
    build_read_bit, build_read_word, build_write_bit, build_write_word, AccessUnit, RequestFrame,
    CMD_BATCH_READ, CMD_BATCH_WRITE, REQUEST_FIXED_LEN, SINGLE_POINT, SUBCMD_BIT, SUBCMD_WORD,
    TIMER_WAIT_FOREVER,
};
pub use header::{CommonHeader, HEADER_SIZE};
pub use response::{frame_len, ResponseFrame, END_CODE_SUCCESS, MIN_RESPONSE_SIZE};
pub use transport::{TcpTransport, Transport, DEFAULT_SLMP_PORT, DEFAULT_TIMEOUT, MAX_FRAME_SIZE};
pub use value::{extract, extract_bit, extract_word, DataType, RegisterValue, Signedness};
