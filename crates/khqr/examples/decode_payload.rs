//! Inspect a KHQR payload.
//!
//! Usage: `cargo run --example decode_payload -- <payload>`

use khqr::util::format_millis_rfc3339;
use khqr::{decode_lenient, verify_detailed};

const SAMPLE: &str = "00020101021229180014somchai_t@trmb520459995303116540410005802KH\
                      5909Somchai T6007BANGKOK99170013170000000000063041EE4";

fn main() {
    let payload = std::env::args().nth(1).unwrap_or_else(|| SAMPLE.to_string());

    println!("Payload: {}", payload);
    println!("Length: {} bytes", payload.len());

    match verify_detailed(&payload) {
        Ok(()) => println!("Valid: yes"),
        Err(err) => println!("Valid: no ({})", err),
    }

    let decoded = match decode_lenient(&payload) {
        Ok(decoded) => decoded,
        Err(err) => {
            eprintln!("Failed to decode: {}", err);
            std::process::exit(1);
        }
    };

    println!("\n=== Fields ===");
    let json = serde_json::to_string_pretty(&decoded).expect("Failed to serialize");
    println!("{}", json);

    println!("\n=== Timestamps ===");
    match decoded.created_at_millis() {
        Some(ms) => println!("Created: {}", format_millis_rfc3339(ms)),
        None => println!("Created: -"),
    }
    if let Some(ms) = decoded.expires_at_millis() {
        println!("Expires: {}", format_millis_rfc3339(ms));
    }
}
