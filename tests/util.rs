use std::fs;
use std::path::{Path, PathBuf};

/// Sample value of the synthetic test volumes at `(x, y, z)`.
#[allow(dead_code)]
pub fn sample_value(x: usize, y: usize, z: usize) -> u16 {
    (z * 1000 + y * 100 + x) as u16
}

/// Encode the rows of slice `z` of an `nx` by `ny` synthetic volume, as
/// they would be laid out in a file.
///
/// With `lower_left`, the first row in the file is `y = 0`; otherwise it is
/// `y = ny - 1`. With `big_endian`, each value is stored big endian.
#[allow(dead_code)]
pub fn encode_slice(nx: usize, ny: usize, z: usize, lower_left: bool, big_endian: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(nx * ny * 2);
    for file_row in 0..ny {
        let y = if lower_left { file_row } else { ny - 1 - file_row };
        for x in 0..nx {
            let v = sample_value(x, y, z);
            if big_endian {
                out.extend_from_slice(&v.to_be_bytes());
            } else {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
    }
    out
}

/// Write a file with `header` leading bytes followed by `data`.
#[allow(dead_code)]
pub fn write_raw_file<P: AsRef<Path>>(path: P, header: usize, data: &[u8]) -> PathBuf {
    let mut bytes = vec![0xEEu8; header];
    bytes.extend_from_slice(data);
    fs::write(path.as_ref(), bytes).unwrap();
    path.as_ref().to_path_buf()
}

/// Whether the host stores integers big endian.
#[allow(dead_code)]
pub fn host_is_big_endian() -> bool {
    cfg!(target_endian = "big")
}
