//! An application for decoding a raw volume and summarizing its contents.
//!
//! Usage: `rawdump <file or prefix> <nx> <ny> <nz> [type] [big|little] [header size]`
//!
//! A path to an existing file is read as a single 3D file. Otherwise the
//! argument is used as a prefix for one file per slice (`<prefix>.<z>`).

extern crate rawvol;

use rawvol::{Endianness, Extent, HeaderSize, RawVolumeReader, ScalarType, VolumeDescriptor};
use std::env;
use std::path::Path;

fn main() {
    let mut args = env::args().skip(1);
    let source = args.next().expect("Path to raw file or prefix is required");
    let mut dim = [1usize; 3];
    for d in dim.iter_mut() {
        *d = args
            .next()
            .expect("Volume dimensions are required")
            .parse()
            .expect("Invalid volume dimension");
    }
    let scalar_type = args
        .next()
        .map(|t| ScalarType::from_name(&t).expect("Unknown scalar type"))
        .unwrap_or_default();
    let byte_order = match args.next().as_deref() {
        Some("big") => Endianness::Big,
        Some("little") | None => Endianness::Little,
        Some(other) => panic!("Unknown byte order {}", other),
    };
    let header_size = args
        .next()
        .map(|h| HeaderSize::Manual(h.parse().expect("Invalid header size")))
        .unwrap_or_default();

    let descriptor = VolumeDescriptor::new()
        .with_scalar_type(scalar_type)
        .with_extent(Extent::with_dim(dim).expect("Invalid volume dimensions"))
        .with_data_byte_order(byte_order)
        .with_header_size(header_size);
    let descriptor = if Path::new(&source).is_file() {
        descriptor.with_file_dimensionality(3).with_file_name(&source)
    } else {
        descriptor.with_file_prefix(source)
    };
    print!("{}", descriptor);

    let mut reader = RawVolumeReader::new().with_progress(|p| eprint!("\r{:5.1}%", p * 100.));
    let (volume, status) = reader
        .read_volume(&descriptor)
        .expect("Failed to read raw volume");
    eprintln!();

    let values = volume.to_f64_vec();
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    println!("Rows read: {}", status.rows_read());
    println!("Value range: [{}, {}]", min, max);
}
