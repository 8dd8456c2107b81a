//! An application for writing a synthetic raw volume, one file per slice.
//!
//! Usage: `gen_raw <prefix> [nx] [ny] [nz]`
//!
//! Samples are big endian 16-bit unsigned integers holding `z * 1000 + y *
//! 100 + x`, rows stored from the top. The result can be read back with
//! `rawdump <prefix> <nx> <ny> <nz> uint16 big 0`.

use std::env;
use std::fs;

fn main() {
    let mut args = env::args().skip(1);
    let prefix = args.next().expect("File prefix is required");
    let mut dim = [64usize, 64, 10];
    for d in dim.iter_mut() {
        if let Some(arg) = args.next() {
            *d = arg.parse().expect("Invalid volume dimension");
        }
    }
    let [nx, ny, nz] = dim;

    for z in 0..nz {
        let mut data = Vec::with_capacity(nx * ny * 2);
        for y in (0..ny).rev() {
            for x in 0..nx {
                let value = (z * 1000 + y * 100 + x) as u16;
                data.extend_from_slice(&value.to_be_bytes());
            }
        }
        let path = format!("{}.{}", prefix, z);
        fs::write(&path, data).expect("Failed to write slice file");
    }
    println!("Wrote {} slices of {}x{} samples", nz, nx, ny);
}
