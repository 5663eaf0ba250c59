//! Example: Writing devices on a PLC
//!
//! Run with: cargo run --example simple_write
//!
//! This example demonstrates:
//! - Writing words and bits by device reference
//! - Typed writes with `RegisterValue`
//! - Handling controller faults and recovering from a failed exchange

use slmp::{end_code_description, Client, ClientConfig, RegisterValue, SlmpError};
use std::net::Ipv4Addr;

fn main() -> slmp::Result<()> {
    // =========================================================================
    // Connect to PLC
    // =========================================================================

    let config = ClientConfig::new(Ipv4Addr::new(192, 168, 0, 2));
    let mut client = Client::connect(config)?;

    // =========================================================================
    // Writing Words
    // =========================================================================

    println!("=== Writing Words ===\n");

    client.write_word("D200", 0x1234)?;
    println!("D200 <- 0x1234, read back 0x{:04X}", client.read_word("D200")?);

    // Increment a counter register
    let count = client.read_word("D300")?;
    client.write_word("D300", count.wrapping_add(1))?;
    println!("D300: {} -> {}", count, count.wrapping_add(1));

    // =========================================================================
    // Writing Bits
    // =========================================================================

    println!("\n=== Writing Bits ===\n");

    client.write_bit("M10", true)?;
    println!("M10 <- ON, read back {}", client.read_bit("M10")?);

    client.write_bit("Y20", false)?;
    println!("Y20 <- OFF");

    // =========================================================================
    // Typed Writes
    // =========================================================================

    println!("\n=== Typed Writes ===\n");

    // Negative values are written as their two's complement bit pattern
    client.write("D400", RegisterValue::signed(-5))?;
    println!("D400 <- -5, read back {}", client.read_i16("D400")?);

    client.write("M20", RegisterValue::Bit(true))?;
    println!("M20 <- ON");

    // =========================================================================
    // Error Handling
    // =========================================================================

    println!("\n=== Error Handling ===\n");

    match client.write_word("D99999", 1) {
        Err(SlmpError::MalformedAddress { address, reason }) => {
            println!("Rejected '{}' before sending: {}", address, reason);
        }
        other => println!("Unexpected: {:?}", other),
    }

    match client.write_word("R32767", 1) {
        Ok(()) => println!("R32767 written"),
        Err(SlmpError::ControllerFault { code }) => {
            let text = end_code_description(code).unwrap_or("see controller manual");
            println!("PLC fault 0x{:04X}: {}", code, text);
        }
        Err(e) => println!("Error: {}", e),
    }

    // A timeout leaves the late reply on the stream; reconnect before retrying
    if let Err(SlmpError::Timeout) = client.write_bit("M30", true) {
        println!("Timeout, reconnecting");
        client.reconnect()?;
        client.write_bit("M30", true)?;
    }

    println!("\nWrite example completed!");
    Ok(())
}
