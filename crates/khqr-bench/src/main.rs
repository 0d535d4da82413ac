//! Throughput benchmark for KHQR generate / decode / verify.
//!
//! Builds a batch of synthetic payee descriptions and times each pipeline
//! over the whole batch.

use std::time::{Duration, Instant};

use khqr::{
    decode_lenient, decode_strict, generate_with_options, verify, Currency, EncodeOptions,
    KhqrBuilder, KhqrInfo,
};
use rust_decimal::Decimal;

const DEFAULT_COUNT: usize = 100_000;

fn make_infos(count: usize) -> Vec<KhqrInfo> {
    (0..count)
        .map(|i| {
            let account = format!("user{}@bank{}", i, i % 17);
            let name = format!("Merchant {}", i % 10_000);
            let builder = if i % 3 == 0 {
                KhqrBuilder::merchant(account, format!("M-{}", i), "ABA Bank", name, "Phnom Penh")
            } else {
                KhqrBuilder::individual(account, name, "Siem Reap")
            };
            let builder = if i % 2 == 0 {
                builder.amount(Decimal::from((i % 50_000) as i64 * 100))
            } else {
                builder
                    .currency(Currency::Usd)
                    .amount(Decimal::new((i % 100_000) as i64, 2))
            };
            if i % 5 == 0 {
                builder.bill_number(format!("INV-{}", i)).store_label("Main Store").build()
            } else {
                builder.build()
            }
        })
        .collect()
}

fn report(label: &str, count: usize, bytes: usize, elapsed: Duration) {
    println!("{}: {} payloads in {:?}", label, count, elapsed);
    println!(
        "  Throughput: {:.0} payloads/s, {:.2} MB/s",
        count as f64 / elapsed.as_secs_f64(),
        (bytes as f64 / 1_000_000.0) / elapsed.as_secs_f64()
    );
}

fn main() {
    let count = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_COUNT);

    println!("Building {} payee descriptions", count);
    let infos = make_infos(count);

    let options = EncodeOptions {
        timestamp_millis: Some(1_700_000_000_000),
        ..Default::default()
    };

    // Benchmark encoding
    let encode_start = Instant::now();
    let payloads: Vec<String> = infos
        .iter()
        .map(|info| {
            generate_with_options(info, &options)
                .expect("Failed to generate")
                .qr
        })
        .collect();
    let encode_time = encode_start.elapsed();
    let total_bytes: usize = payloads.iter().map(String::len).sum();

    println!("\n=== Generate ===");
    report("generate", count, total_bytes, encode_time);

    // Benchmark lenient decoding
    let lenient_start = Instant::now();
    for payload in &payloads {
        decode_lenient(payload).expect("Failed to decode");
    }
    let lenient_time = lenient_start.elapsed();

    println!("\n=== Decode (lenient) ===");
    report("decode_lenient", count, total_bytes, lenient_time);

    // Benchmark strict decoding
    let strict_start = Instant::now();
    for payload in &payloads {
        decode_strict(payload).expect("Failed to decode");
    }
    let strict_time = strict_start.elapsed();

    println!("\n=== Decode (strict) ===");
    report("decode_strict", count, total_bytes, strict_time);

    // Benchmark verification
    let verify_start = Instant::now();
    let valid = payloads.iter().filter(|p| verify(p)).count();
    let verify_time = verify_start.elapsed();

    println!("\n=== Verify ===");
    report("verify", count, total_bytes, verify_time);
    assert_eq!(valid, count, "generated payload failed verification");

    println!("\n=== Summary ===");
    println!("Payloads: {}", count);
    println!(
        "Average size: {:.1} bytes",
        total_bytes as f64 / count.max(1) as f64
    );
}
