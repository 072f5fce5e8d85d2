//! Encodes a small record in both formats and prints the bytes.
//!
//! Usage: `cargo run --example dump_streams [value ...]`
//! Each argument is parsed as an i64 and written as a long; without
//! arguments a built-in sample is used.

use numpack::{ReadStream, SparseReader, SparseWriter, StandardReader, StandardWriter, WriteStream};

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() {
    let values: Vec<i64> = {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.is_empty() {
            vec![0, 0, 0, 1, -1, 0, 65, 0, 0, i64::MIN, 0, 1 << 40]
        } else {
            args.iter()
                .map(|a| a.parse().expect("arguments must be integers"))
                .collect()
        }
    };

    let mut standard = StandardWriter::new();
    let mut sparse = SparseWriter::new();
    for &v in &values {
        standard.write_long(v);
        sparse.write_long(v);
    }

    println!("values:   {:?}", values);
    println!(
        "standard: {} bytes, {:.2} bytes/value",
        standard.len(),
        standard.len() as f64 / values.len() as f64
    );
    println!("  {}", hex(standard.as_bytes()));
    println!(
        "sparse:   {} bytes, {:.2} bytes/value",
        sparse.len(),
        sparse.len() as f64 / values.len() as f64
    );
    println!("  {}", hex(sparse.as_bytes()));

    let mut standard_reader = StandardReader::new(standard.as_bytes());
    let mut sparse_reader = SparseReader::new(sparse.as_bytes());
    for &v in &values {
        assert_eq!(standard_reader.read_long().expect("standard decode"), v);
        assert_eq!(sparse_reader.read_long().expect("sparse decode"), v);
    }
    println!("\nround trip OK");
}
