//! Example: Reading devices from a PLC
//!
//! Run with: cargo run --example simple_read
//!
//! This example demonstrates:
//! - Reading words and bits by device reference
//! - Reading through parsed addresses
//! - Typed reads (BOOL, INT16, UINT16)
//! - Rendering frames for diagnostics

use slmp::trace::{format_response_bytes, RequestTrace};
use slmp::{Client, ClientConfig, DataType, DeviceAddress, DeviceCode, RequestFrame};
use std::net::Ipv4Addr;
use std::time::Duration;

fn main() -> slmp::Result<()> {
    // =========================================================================
    // Connect to PLC
    // =========================================================================

    let config = ClientConfig::new(Ipv4Addr::new(192, 168, 0, 2))
        .with_port(1025)
        .with_timeout(Duration::from_secs(2));
    let mut client = Client::connect(config)?;

    // =========================================================================
    // Reading Words (16-bit values)
    // =========================================================================

    println!("=== Reading Words ===\n");

    let value = client.read_word("D100")?;
    println!("D100 = {} (0x{:04X})", value, value);

    // Link registers are hex numbered: W1F is register 31
    let link = client.read_word("W1F")?;
    println!("W1F  = 0x{:04X}", link);

    // Same value reinterpreted as two's complement
    let signed = client.read_i16("D100")?;
    println!("D100 as i16 = {}", signed);

    // =========================================================================
    // Reading Bits
    // =========================================================================

    println!("\n=== Reading Bits ===\n");

    let input = client.read_bit("X1F")?;
    println!("X1F = {}", input);

    let relay = client.read_bit("M10")?;
    println!("M10 = {}", relay);

    // Parse once, read many times
    let address = DeviceAddress::new(DeviceCode::SpecialRelay, 400);
    for _ in 0..3 {
        println!("{} = {}", address, client.read_bit_at(&address)?);
    }

    // =========================================================================
    // Typed Reads
    // =========================================================================

    println!("\n=== Typed Reads ===\n");

    for (device, type_name) in [("D200", "INT16"), ("D201", "UINT16"), ("Y0", "BOOL")] {
        let data_type: DataType = type_name.parse()?;
        let value = client.read(device, data_type)?;
        println!("{} ({}) = {}", device, data_type, value);
    }

    // =========================================================================
    // Frame Diagnostics
    // =========================================================================

    println!("\n=== Frame Diagnostics ===\n");

    let request = RequestFrame::read_word("D100".parse()?);
    println!("{}", RequestTrace(&request));

    let reply = [0xD0, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00, 0x04, 0x00, 0x00, 0x00, 0x2A, 0x00];
    println!("{}", format_response_bytes(&reply));

    println!("Read example completed!");
    Ok(())
}
