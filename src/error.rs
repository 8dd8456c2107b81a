//! Types for error handling go here.
use std::io::Error as IOError;
use std::path::PathBuf;
use crate::typedef::ScalarType;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    #[non_exhaustive]
    pub enum RawVolumeError {
        /// None of the file naming modes (single file, file pattern or
        /// list of file names) was configured.
        NoFileName {
            display("Either a file name, a list of file names or a file pattern must be specified")
        }
        /// The given numeric type code does not map to a supported
        /// scalar type.
        UnsupportedScalarType(code: i32) {
            display("Unsupported scalar type code {}", code)
        }
        /// An extent with a minimum greater than its maximum.
        InvalidExtent(extent: [i32; 6]) {
            display("Invalid extent {:?}: each axis minimum must not exceed its maximum", extent)
        }
        /// The number of scalar components per sample must be positive.
        InvalidComponentCount(count: usize) {
            display("Invalid number of scalar components: {}", count)
        }
        /// Files are either 2D (one file per slice) or 3D and above.
        InvalidFileDimensionality(dim: u8) {
            display("Invalid file dimensionality {} (must be at least 2)", dim)
        }
        /// The data described by an extent does not fit in a file, as its
        /// size in bytes overflows the range of file offsets.
        VolumeTooLarge(extent: [i32; 6]) {
            display("Volume extent {:?} is too large to be addressed in a file", extent)
        }
        /// The file name template could not be parsed.
        InvalidFilePattern(pattern: String, reason: &'static str) {
            display("Invalid file pattern {:?}: {}", pattern, reason)
        }
        /// A slice index fell outside of the configured list of file names.
        FileIndexOutOfBounds(index: i32, len: usize) {
            display("File index {} is out of bounds for a list of {} file names", index, len)
        }
        /// The destination volume does not agree with the descriptor.
        IncompatibleDestination(reason: String) {
            display("Incompatible destination volume: {}", reason)
        }
        /// Attempted to access an in-memory volume outside its boundaries.
        OutOfBounds(coords: [i32; 4]) {
            display("Out of bounds access to volume: {:?}", coords)
        }
        /// Attempted to read volume data with the wrong element type.
        ScalarTypeMismatch(expected: ScalarType, got: ScalarType) {
            display("Scalar type mismatch (volume holds {}, requested {})", expected, got)
        }
        /// A data file could not be inspected or opened.
        FileAccess(path: PathBuf, err: IOError) {
            source(err)
            display("Could not open file {}: {}", path.display(), err)
        }
        /// Positioning the file cursor at the start of a row failed.
        Seek(row: i32, offset: i64, err: IOError) {
            source(err)
            display("Seek failed at row {} (offset {}): {}", row, offset, err)
        }
        /// Reading a row of samples failed or came up short.
        Read(row: i32, requested: usize, err: IOError) {
            source(err)
            display("Read failed at row {} ({} bytes requested): {}", row, requested, err)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
    }
}

impl RawVolumeError {
    /// Whether this error stems from an inconsistent reader configuration,
    /// as opposed to a failure while accessing the data files.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            RawVolumeError::NoFileName
                | RawVolumeError::UnsupportedScalarType(_)
                | RawVolumeError::InvalidExtent(_)
                | RawVolumeError::InvalidComponentCount(_)
                | RawVolumeError::InvalidFileDimensionality(_)
                | RawVolumeError::VolumeTooLarge(_)
                | RawVolumeError::InvalidFilePattern(..)
                | RawVolumeError::FileIndexOutOfBounds(..)
                | RawVolumeError::IncompatibleDestination(_)
        )
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, RawVolumeError>;
