//! Benchmark comparing the standard and sparse numpack formats.
//!
//! Reads sample sets from a JSON file (`[{"name": ..., "values": [...]}]`)
//! or, without an argument, generates synthetic sets with varying zero
//! density. Every set is measured as longs; sets whose values all fit in
//! 32 bits are measured as signed ints too.

use std::fs;
use std::time::{Duration, Instant};

use numpack::{ReadStream, SparseReader, SparseWriter, StandardReader, StandardWriter, WriteStream};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Deserialize;

// =============================================================================
// SAMPLE DATA
// =============================================================================

#[derive(Debug, Deserialize)]
struct SampleSet {
    name: String,
    values: Vec<i64>,
}

impl SampleSet {
    /// Returns true if every value survives a round trip through `i32`.
    fn fits_i32(&self) -> bool {
        self.values.iter().all(|&v| i32::try_from(v).is_ok())
    }
}

const SYNTHETIC_COUNT: usize = 1_000_000;
const SYNTHETIC_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

fn synthetic_sets(count: usize, seed: u64) -> Vec<SampleSet> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let mut set = |name: &str, zero_ratio: f64, max_magnitude: i64| {
        let values = (0..count)
            .map(|_| {
                if rng.gen_bool(zero_ratio) {
                    0
                } else {
                    let magnitude = rng.gen_range(0..max_magnitude);
                    if rng.gen_bool(0.5) { magnitude } else { -magnitude }
                }
            })
            .collect();
        SampleSet {
            name: name.to_string(),
            values,
        }
    };

    vec![
        set("sparse-90", 0.9, 64),
        set("sparse-50", 0.5, 1 << 12),
        set("dense-small", 0.0, 64),
        set("dense-wide", 0.0, 1 << 40),
    ]
}

// =============================================================================
// MEASUREMENT
// =============================================================================

/// Which typed call a measurement drives the streams with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Width {
    SignedInt,
    Long,
}

struct Measurement {
    bytes: usize,
    encode: Duration,
    decode: Duration,
}

fn write_all<W: WriteStream>(writer: &mut W, values: &[i64], width: Width) {
    for &v in values {
        match width {
            Width::SignedInt => writer.write_signed_int(v as i32),
            Width::Long => writer.write_long(v),
        }
    }
}

fn check_all<R: ReadStream>(reader: &mut R, values: &[i64], width: Width, format: &str) {
    for &v in values {
        let decoded = match width {
            Width::SignedInt => reader.read_signed_int().map(i64::from),
            Width::Long => reader.read_long(),
        }
        .unwrap_or_else(|e| panic!("Failed to decode {} stream: {}", format, e));
        assert_eq!(decoded, v, "{} round trip mismatch ({:?})", format, width);
    }
}

fn measure_standard(values: &[i64], width: Width) -> Measurement {
    let encode_start = Instant::now();
    let mut writer = StandardWriter::new();
    write_all(&mut writer, values, width);
    let encoded = writer.into_bytes();
    let encode = encode_start.elapsed();

    let decode_start = Instant::now();
    check_all(&mut StandardReader::new(&encoded), values, width, "standard");
    let decode = decode_start.elapsed();

    Measurement {
        bytes: encoded.len(),
        encode,
        decode,
    }
}

fn measure_sparse(values: &[i64], width: Width) -> Measurement {
    let encode_start = Instant::now();
    let mut writer = SparseWriter::new();
    write_all(&mut writer, values, width);
    let encoded = writer.into_bytes();
    let encode = encode_start.elapsed();

    let decode_start = Instant::now();
    check_all(&mut SparseReader::new(&encoded), values, width, "sparse");
    let decode = decode_start.elapsed();

    Measurement {
        bytes: encoded.len(),
        encode,
        decode,
    }
}

fn report(label: &str, count: usize, m: &Measurement) {
    println!(
        "  {:<16} {:>10} bytes  {:>5.2} bytes/value  encode {:?} ({:.2} MB/s)  decode {:?}",
        label,
        m.bytes,
        m.bytes as f64 / count.max(1) as f64,
        m.encode,
        (m.bytes as f64 / 1_000_000.0) / m.encode.as_secs_f64(),
        m.decode,
    );
}

fn main() {
    let sets = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading samples from: {}", path);
            let json_data = fs::read_to_string(&path).expect("Failed to read sample file");
            let parse_start = Instant::now();
            let sets: Vec<SampleSet> =
                serde_json::from_str(&json_data).expect("Failed to parse JSON");
            println!("Loaded {} sample sets in {:?}", sets.len(), parse_start.elapsed());
            sets
        }
        None => {
            println!("No sample file given, generating synthetic sets");
            synthetic_sets(SYNTHETIC_COUNT, SYNTHETIC_SEED)
        }
    };

    for set in &sets {
        let count = set.values.len();
        let zeros = set.values.iter().filter(|&&v| v == 0).count();
        println!(
            "\n{}: {} values, {:.1}% zero",
            set.name,
            count,
            100.0 * zeros as f64 / count.max(1) as f64
        );

        if set.fits_i32() {
            let standard = measure_standard(&set.values, Width::SignedInt);
            let sparse = measure_sparse(&set.values, Width::SignedInt);
            report("standard (int)", count, &standard);
            report("sparse (int)", count, &sparse);
        } else {
            println!("  signed int: skipped, values exceed 32 bits");
        }

        let standard = measure_standard(&set.values, Width::Long);
        let sparse = measure_sparse(&set.values, Width::Long);
        report("standard (long)", count, &standard);
        report("sparse (long)", count, &sparse);
        println!(
            "  sparse/standard long size: {:.3}",
            sparse.bytes as f64 / standard.bytes.max(1) as f64
        );
    }
}
