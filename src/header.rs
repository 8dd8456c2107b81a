//! This module resolves the size of the header preceding the voxel data of
//! a raw volume file.
//!
//! Raw files carry no description of their own layout, but many of them
//! start with a header written by whichever tool produced them. When the
//! header size is not known in advance, it is estimated from the file size:
//! everything before the expected amount of voxel data is assumed to be
//! header. This only works if the header is a single block at the start of
//! the file and nothing follows the voxel data.

use crate::error::{RawVolumeError, Result};
use crate::volume::layout::LayoutIncrements;
use std::convert::TryFrom;
use std::fmt;
use std::fs;
use std::path::Path;

/// Header size of a raw volume file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HeaderSize {
    /// Derive the header size from the size of each file.
    Auto,
    /// A fixed number of bytes to skip at the start of each file.
    Manual(u64),
}

impl Default for HeaderSize {
    fn default() -> Self {
        HeaderSize::Auto
    }
}

impl fmt::Display for HeaderSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HeaderSize::Auto => f.write_str("auto"),
            HeaderSize::Manual(size) => write!(f, "{}", size),
        }
    }
}

/// Header size assumed when it cannot be derived from the file.
pub const DEFAULT_HEADER_SIZE: i64 = 0;

/// Determine the number of header bytes in the file at `path`.
///
/// A manual header size is returned as is, without touching the file
/// system. Otherwise the size of one file's worth of voxel data (a slice for
/// 2D files, the whole volume for files of 3 or more dimensions) is
/// subtracted from the file size. The outcome is negative if the file is
/// shorter than expected; such files fail later, when reading.
///
/// # Errors
///
/// - `RawVolumeError::FileAccess` if the file size cannot be obtained.
pub fn resolve_header_size<P>(
    path: P,
    increments: &LayoutIncrements,
    file_dimensionality: u8,
    header_size: HeaderSize,
) -> Result<i64>
where
    P: AsRef<Path>,
{
    if let HeaderSize::Manual(size) = header_size {
        return Ok(i64::try_from(size).unwrap_or(i64::MAX));
    }
    let path = path.as_ref();
    let metadata =
        fs::metadata(path).map_err(|e| RawVolumeError::FileAccess(path.to_path_buf(), e))?;
    let payload = increments.file_payload(file_dimensionality);
    let file_size = i64::try_from(metadata.len()).unwrap_or(i64::MAX);
    Ok(file_size.saturating_sub(i64::try_from(payload).unwrap_or(i64::MAX)))
}

#[cfg(test)]
mod tests {
    use super::{resolve_header_size, HeaderSize};
    use crate::error::RawVolumeError;
    use crate::typedef::ScalarType;
    use crate::volume::layout::LayoutIncrements;
    use crate::volume::shape::Extent;

    #[test]
    fn manual_header_skips_file_system() {
        let extent = Extent::new([0, 3, 0, 3, 0, 0]).unwrap();
        let inc = LayoutIncrements::compute(ScalarType::Uint8, 1, &extent);
        let size = resolve_header_size("does/not/exist.raw", &inc, 2, HeaderSize::Manual(128))
            .unwrap();
        assert_eq!(size, 128);
    }

    #[test]
    fn auto_header_on_missing_file() {
        let extent = Extent::new([0, 3, 0, 3, 0, 0]).unwrap();
        let inc = LayoutIncrements::compute(ScalarType::Uint8, 1, &extent);
        match resolve_header_size("does/not/exist.raw", &inc, 2, HeaderSize::Auto) {
            Err(RawVolumeError::FileAccess(path, _)) => {
                assert_eq!(path.to_str(), Some("does/not/exist.raw"))
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn header_size_display() {
        assert_eq!(HeaderSize::default(), HeaderSize::Auto);
        assert_eq!(HeaderSize::Auto.to_string(), "auto");
        assert_eq!(HeaderSize::Manual(512).to_string(), "512");
    }
}
