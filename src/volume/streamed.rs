//! Streamed decoding of raw volumes.
//!
//! The reader fills a destination volume one row at a time: for every row
//! it computes the row's absolute byte offset in the file holding it, seeks
//! there and reads the row directly into the destination buffer, swapping
//! the bytes of each element if the data was written with a foreign byte
//! order. Only one file is open at any time. With 2D files, the file of
//! each slice is opened when that slice is reached and closed before the
//! next one is opened; with 3D files the single data file is opened once.
//!
//! Reading can be followed through a progress callback and stopped early
//! with a [`CancellationToken`], which is checked before every row. A
//! stopped read is not an error: it yields [`StreamStatus::Aborted`] and
//! leaves the remaining rows of the destination untouched.
//!
//! # Example
//!
//! ```no_run
//! use rawvol::{Extent, InMemVolume, RawVolumeReader, ScalarType, VolumeDescriptor};
//!
//! let descriptor = VolumeDescriptor::new()
//!     .with_scalar_type(ScalarType::Uint16)
//!     .with_extent(Extent::new([0, 255, 0, 255, 0, 9])?)
//!     .with_file_prefix("scan/slice");
//! let mut volume = InMemVolume::new(*descriptor.extent(), ScalarType::Uint16, 1);
//!
//! let mut reader = RawVolumeReader::new()
//!     .with_progress(|p| println!("{:.0}%", p * 100.));
//! let status = reader.stream(&descriptor, &mut volume)?;
//! assert!(status.is_complete());
//! # Ok::<(), rawvol::RawVolumeError>(())
//! ```
//!
//! [`CancellationToken`]: ./struct.CancellationToken.html
//! [`StreamStatus::Aborted`]: ./enum.StreamStatus.html#variant.Aborted

use super::inmem::InMemVolume;
use super::layout::LayoutIncrements;
use super::shape::Extent;
use super::VolumeSink;
use crate::descriptor::VolumeDescriptor;
use crate::error::{RawVolumeError, Result};
use crate::header::{resolve_header_size, DEFAULT_HEADER_SIZE};
use crate::naming::resolve_file_name;
use crate::util::swap_row_bytes;
use std::convert::TryFrom;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Number of progress updates issued over a complete read.
const PROGRESS_STEPS: usize = 50;

/// A shareable flag for stopping a read in progress.
///
/// Clones share the same flag, so one clone can be handed to the reader
/// while another is kept to cancel it, from a progress callback or from a
/// different thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token which is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the read to stop before its next row.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear a previous cancellation request.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Outcome of a successful read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamStatus {
    /// Every row of the destination was read.
    Complete {
        /// Number of rows read.
        rows_read: usize,
    },
    /// Reading was cancelled. The first `rows_read` rows of the
    /// destination were written, in slice order; the remaining ones were
    /// left untouched.
    Aborted {
        /// Number of rows read before stopping.
        rows_read: usize,
    },
}

impl StreamStatus {
    /// Whether every row was read.
    pub fn is_complete(&self) -> bool {
        matches!(self, StreamStatus::Complete { .. })
    }

    /// Number of rows read.
    pub fn rows_read(&self) -> usize {
        match *self {
            StreamStatus::Complete { rows_read } | StreamStatus::Aborted { rows_read } => rows_read,
        }
    }
}

/// Decoder of raw volumes into destination volumes.
///
/// See the [module-level documentation] for more details.
///
/// [module-level documentation]: ./index.html
pub struct RawVolumeReader<'a> {
    progress: Option<Box<dyn FnMut(f64) + 'a>>,
    cancellation: CancellationToken,
}

impl<'a> fmt::Debug for RawVolumeReader<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RawVolumeReader")
            .field("progress", &self.progress.as_ref().map(|_| "FnMut(f64)"))
            .field("cancellation", &self.cancellation)
            .finish()
    }
}

impl<'a> Default for RawVolumeReader<'a> {
    fn default() -> Self {
        RawVolumeReader {
            progress: None,
            cancellation: CancellationToken::new(),
        }
    }
}

/// A data file opened for reading, along with its header size.
struct OpenFile {
    path: PathBuf,
    file: File,
    header_size: i64,
}

impl OpenFile {
    fn open(
        path: PathBuf,
        descriptor: &VolumeDescriptor,
        increments: &LayoutIncrements,
    ) -> Result<Self> {
        debug!("Opening file {}", path.display());
        let file = File::open(&path).map_err(|e| RawVolumeError::FileAccess(path.clone(), e))?;
        let header_size = resolve_header_size(
            &path,
            increments,
            descriptor.file_dimensionality(),
            descriptor.header_size(),
        )
        .unwrap_or_else(|e| {
            warn!(
                "Could not determine the header size of {}, assuming {}: {}",
                path.display(),
                DEFAULT_HEADER_SIZE,
                e
            );
            DEFAULT_HEADER_SIZE
        });
        debug!("Header size of {}: {}", path.display(), header_size);
        Ok(OpenFile {
            path,
            file,
            header_size,
        })
    }

    fn read_row(&mut self, row: i32, offset: i64, buffer: &mut [u8]) -> Result<()> {
        trace!("Reading row {} of {} at offset {}", row, self.path.display(), offset);
        if offset < 0 {
            return Err(RawVolumeError::Seek(
                row,
                offset,
                io::Error::new(io::ErrorKind::InvalidInput, "negative file offset"),
            ));
        }
        let _ = self
            .file
            .seek(SeekFrom::Start(offset as u64))
            .map_err(|e| RawVolumeError::Seek(row, offset, e))?;
        self.file
            .read_exact(buffer)
            .map_err(|e| RawVolumeError::Read(row, buffer.len(), e))
    }
}

/// Positions of the destination rows within its buffer.
struct SinkLayout {
    row_bytes: usize,
    row_stride: usize,
    slice_stride: usize,
}

impl<'a> RawVolumeReader<'a> {
    /// Create a reader without progress reporting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report progress to the given callback, with a fraction between 0
    /// and 1. The callback is invoked on the reading thread, about fifty
    /// times over a complete read, and should return promptly.
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: FnMut(f64) + 'a,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Stop reading when the given token is cancelled.
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Retrieve the cancellation token checked by this reader.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    fn report(&mut self, fraction: f64) {
        if let Some(progress) = self.progress.as_mut() {
            progress(fraction);
        }
    }

    /// Allocate an in-memory volume over the descriptor's whole extent and
    /// read the data into it.
    pub fn read_volume(
        &mut self,
        descriptor: &VolumeDescriptor,
    ) -> Result<(InMemVolume, StreamStatus)> {
        descriptor.validate()?;
        let mut volume = InMemVolume::new(
            descriptor.whole_extent(),
            descriptor.scalar_type(),
            descriptor.components(),
        );
        let status = self.stream(descriptor, &mut volume)?;
        Ok((volume, status))
    }

    /// Read the region covered by `sink` from the files described by
    /// `descriptor`.
    ///
    /// The whole configuration is checked before any file is touched: on a
    /// configuration error, nothing is written to the destination. Once
    /// reading has started, an I/O failure aborts the read and leaves the
    /// rows read so far in the destination.
    ///
    /// # Errors
    ///
    /// - `RawVolumeError::NoFileName` if no file naming scheme is set, and
    ///   the other configuration errors of
    ///   [`VolumeDescriptor::validate`].
    /// - `RawVolumeError::IncompatibleDestination` if the destination's
    ///   element type or component count differ from the descriptor's, if
    ///   it covers samples outside the descriptor's whole extent, or if its
    ///   buffer is too small for its extent and increments.
    /// - `RawVolumeError::FileIndexOutOfBounds` if a list of file names
    ///   has no entry for one of the slices.
    /// - `RawVolumeError::FileAccess` if a data file cannot be opened.
    /// - `RawVolumeError::Seek` and `RawVolumeError::Read` if a row cannot be
    ///   read in full.
    ///
    /// [`VolumeDescriptor::validate`]: ../../descriptor/struct.VolumeDescriptor.html#method.validate
    pub fn stream<S>(&mut self, descriptor: &VolumeDescriptor, sink: &mut S) -> Result<StreamStatus>
    where
        S: VolumeSink + ?Sized,
    {
        descriptor.validate()?;
        let naming = descriptor.file_naming();
        let whole = descriptor.whole_extent();
        let out = sink.extent();
        let layout = check_sink(descriptor, &whole, sink)?;
        let increments = descriptor.increments();
        let file_dimensionality = descriptor.file_dimensionality();
        let element_size = descriptor.scalar_type().size_of();

        debug!("Reading extent {:?}", out.raw());

        let target = out.row_count() / PROGRESS_STEPS + 1;
        let mut count = 0;

        let mut volume_file = if file_dimensionality >= 3 {
            Some(OpenFile::open(resolve_file_name(naming, 0)?, descriptor, &increments)?)
        } else {
            None
        };

        let data = sink.raw_data_mut();
        let mut slice_start = 0;
        for z in out.range(2) {
            if self.cancellation.is_cancelled() {
                return Ok(StreamStatus::Aborted { rows_read: count });
            }
            let mut slice_file;
            let file = match volume_file.as_mut() {
                Some(file) => file,
                None => {
                    let path = resolve_file_name(naming, z)?;
                    slice_file = OpenFile::open(path, descriptor, &increments)?;
                    &mut slice_file
                }
            };

            let mut row_start = slice_start;
            for y in out.range(1) {
                if self.cancellation.is_cancelled() {
                    return Ok(StreamStatus::Aborted { rows_read: count });
                }
                if count % target == 0 {
                    self.report(count as f64 / (PROGRESS_STEPS * target) as f64);
                }
                count += 1;

                let offset = row_offset(
                    descriptor,
                    &whole,
                    &increments,
                    out.min(0),
                    y,
                    z,
                    file.header_size,
                )
                .ok_or_else(|| {
                    RawVolumeError::Seek(
                        y,
                        i64::MAX,
                        io::Error::new(io::ErrorKind::InvalidInput, "file offset out of range"),
                    )
                })?;
                let row = &mut data[row_start..row_start + layout.row_bytes];
                file.read_row(y, offset, row)?;
                if descriptor.swap_bytes() {
                    swap_row_bytes(row, element_size);
                }
                row_start += layout.row_stride;
            }
            slice_start += layout.slice_stride;
        }

        self.report(1.);
        Ok(StreamStatus::Complete { rows_read: count })
    }
}

/// Absolute byte offset of the row `y` of slice `z`, starting at column `x`,
/// or `None` if it does not fit in an `i64`.
fn row_offset(
    descriptor: &VolumeDescriptor,
    whole: &Extent,
    increments: &LayoutIncrements,
    x: i32,
    y: i32,
    z: i32,
    header_size: i64,
) -> Option<i64> {
    let stride = |from: i32, to: i32, increment: u64| {
        (i64::from(to) - i64::from(from)).checked_mul(i64::try_from(increment).ok()?)
    };
    let column = stride(whole.min(0), x, increments.sample())?;
    let row = if descriptor.lower_left() {
        stride(whole.min(1), y, increments.row())?
    } else {
        stride(y, whole.max(1), increments.row())?
    };
    let slice = if descriptor.file_dimensionality() >= 3 {
        stride(whole.min(2), z, increments.slice())?
    } else {
        0
    };
    column.checked_add(row)?.checked_add(slice)?.checked_add(header_size)
}

fn check_sink<S>(descriptor: &VolumeDescriptor, whole: &Extent, sink: &mut S) -> Result<SinkLayout>
where
    S: VolumeSink + ?Sized,
{
    let incompatible = |reason: String| Err(RawVolumeError::IncompatibleDestination(reason));
    if sink.scalar_type() != descriptor.scalar_type() {
        return incompatible(format!(
            "scalar type {} does not match the data type {}",
            sink.scalar_type(),
            descriptor.scalar_type()
        ));
    }
    if sink.components() != descriptor.components() {
        return incompatible(format!(
            "{} components per sample, but the data has {}",
            sink.components(),
            descriptor.components()
        ));
    }
    let out = sink.extent();
    if !whole.contains(&out) {
        return incompatible(format!(
            "extent {:?} is not within the data extent {:?}",
            out.raw(),
            whole.raw()
        ));
    }

    let element_size = descriptor.scalar_type().size_of();
    let [sample_increment, row_increment, slice_increment] = sink.increments();
    if sample_increment != sink.components() {
        return incompatible(format!(
            "sample increment of {} elements, but rows are read as contiguous runs of {}",
            sample_increment,
            sink.components()
        ));
    }
    let [nx, ny, nz] = out.dim();
    let layout = SinkLayout {
        row_bytes: nx * sink.components() * element_size,
        row_stride: row_increment * element_size,
        slice_stride: slice_increment * element_size,
    };
    let required = (nz - 1)
        .checked_mul(layout.slice_stride)
        .and_then(|s| (ny - 1).checked_mul(layout.row_stride).and_then(|r| s.checked_add(r)))
        .and_then(|n| n.checked_add(layout.row_bytes));
    let available = sink.raw_data_mut().len();
    match required {
        Some(required) if required <= available => Ok(layout),
        _ => incompatible(format!(
            "buffer of {} bytes is too small for the requested extent",
            available
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{row_offset, CancellationToken, RawVolumeReader, StreamStatus};
    use crate::descriptor::VolumeDescriptor;
    use crate::error::RawVolumeError;
    use crate::typedef::ScalarType;
    use crate::volume::inmem::InMemVolume;
    use crate::volume::shape::Extent;
    use crate::volume::VolumeSink;

    #[test]
    fn test_row_offsets() {
        let whole = Extent::new([0, 3, 0, 2, 0, 1]).unwrap();
        let d = VolumeDescriptor::new()
            .with_scalar_type(ScalarType::Uint16)
            .with_extent(whole)
            .with_file_name("v.raw");
        let inc = d.increments();
        assert_eq!(inc.as_array(), &[2, 8, 24, 48]);

        // top-left origin: the first row in the file is the last y
        assert_eq!(row_offset(&d, &whole, &inc, 0, 2, 0, 0), Some(0));
        assert_eq!(row_offset(&d, &whole, &inc, 0, 0, 0, 0), Some(16));
        assert_eq!(row_offset(&d, &whole, &inc, 0, 0, 1, 10), Some(26));

        let d = d.with_lower_left(true).with_file_dimensionality(3);
        assert_eq!(row_offset(&d, &whole, &inc, 0, 0, 0, 0), Some(0));
        assert_eq!(row_offset(&d, &whole, &inc, 0, 2, 1, 0), Some(16 + 24));
        assert_eq!(row_offset(&d, &whole, &inc, 1, 1, 1, 4), Some(2 + 8 + 24 + 4));
    }

    #[test]
    fn test_row_offsets_shifted_extent() {
        let whole = Extent::new([10, 13, 5, 7, 3, 4]).unwrap();
        let d = VolumeDescriptor::new()
            .with_scalar_type(ScalarType::Uint8)
            .with_extent(whole)
            .with_file_name("v.raw")
            .with_file_dimensionality(3);
        let inc = d.increments();
        assert_eq!(row_offset(&d, &whole, &inc, 10, 7, 3, 0), Some(0));
        assert_eq!(row_offset(&d, &whole, &inc, 10, 5, 3, 0), Some(8));
        assert_eq!(row_offset(&d, &whole, &inc, 11, 5, 4, 0), Some(1 + 8 + 12));
    }

    #[test]
    fn test_row_offsets_out_of_range() {
        let whole = Extent::new([i32::MIN, i32::MAX, 0, 1, 0, 0]).unwrap();
        let d = VolumeDescriptor::new()
            .with_scalar_type(ScalarType::Uint8)
            .with_extent(whole)
            .with_file_name("v.raw")
            .with_lower_left(true);
        let inc = d.increments();
        assert_eq!(row_offset(&d, &whole, &inc, i32::MIN, 0, 0, 0), Some(0));
        assert_eq!(row_offset(&d, &whole, &inc, i32::MAX, 1, 0, 0), Some((1 << 33) - 1));
        assert_eq!(row_offset(&d, &whole, &inc, i32::MIN, 1, 0, i64::MAX), None);
    }

    #[test]
    fn test_huge_volume_is_rejected() {
        let whole = Extent::new([i32::MIN, i32::MAX, i32::MIN, i32::MAX, 0, 0]).unwrap();
        let d = VolumeDescriptor::new()
            .with_scalar_type(ScalarType::Float64)
            .with_extent(whole)
            .with_file_name("does-not-exist.raw");
        let mut vol = InMemVolume::new(Extent::default(), ScalarType::Float64, 1);
        let err = RawVolumeReader::new().stream(&d, &mut vol).unwrap_err();
        assert!(matches!(err, RawVolumeError::VolumeTooLarge(_)));
        assert!(err.is_configuration_error());
    }

    /// A destination holding every other element of each row.
    struct StridedSink(Vec<u8>);

    impl VolumeSink for StridedSink {
        fn extent(&self) -> Extent {
            Extent::new([0, 3, 0, 0, 0, 0]).unwrap()
        }

        fn scalar_type(&self) -> ScalarType {
            ScalarType::Uint8
        }

        fn components(&self) -> usize {
            1
        }

        fn increments(&self) -> [usize; 3] {
            [2, 8, 8]
        }

        fn raw_data_mut(&mut self) -> &mut [u8] {
            &mut self.0
        }
    }

    #[test]
    fn test_non_contiguous_samples_rejected() {
        let d = VolumeDescriptor::new()
            .with_scalar_type(ScalarType::Uint8)
            .with_extent(Extent::new([0, 3, 0, 0, 0, 0]).unwrap())
            .with_file_name("does-not-exist.raw");
        let mut sink = StridedSink(vec![0; 8]);
        assert!(matches!(
            RawVolumeReader::new().stream(&d, &mut sink),
            Err(RawVolumeError::IncompatibleDestination(_))
        ));
        assert!(sink.0.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_no_file_name() {
        let d = VolumeDescriptor::new().with_scalar_type(ScalarType::Uint8);
        let mut vol = InMemVolume::new(*d.extent(), ScalarType::Uint8, 1);
        let err = RawVolumeReader::new().stream(&d, &mut vol).unwrap_err();
        assert!(matches!(err, RawVolumeError::NoFileName));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_incompatible_destinations() {
        let whole = Extent::new([0, 3, 0, 3, 0, 0]).unwrap();
        let d = VolumeDescriptor::new()
            .with_scalar_type(ScalarType::Uint8)
            .with_extent(whole)
            .with_file_name("does-not-matter.raw");
        let mut reader = RawVolumeReader::new();

        let mut vol = InMemVolume::new(whole, ScalarType::Int8, 1);
        assert!(matches!(
            reader.stream(&d, &mut vol),
            Err(RawVolumeError::IncompatibleDestination(_))
        ));

        let mut vol = InMemVolume::new(whole, ScalarType::Uint8, 2);
        assert!(matches!(
            reader.stream(&d, &mut vol),
            Err(RawVolumeError::IncompatibleDestination(_))
        ));

        let outside = Extent::new([0, 4, 0, 3, 0, 0]).unwrap();
        let mut vol = InMemVolume::new(outside, ScalarType::Uint8, 1);
        assert!(matches!(
            reader.stream(&d, &mut vol),
            Err(RawVolumeError::IncompatibleDestination(_))
        ));
    }

    #[test]
    fn test_cancelled_before_start() {
        let whole = Extent::new([0, 3, 0, 3, 0, 0]).unwrap();
        let d = VolumeDescriptor::new()
            .with_scalar_type(ScalarType::Uint8)
            .with_extent(whole)
            .with_file_name("does-not-exist.raw");
        let token = CancellationToken::new();
        token.cancel();
        let mut reader = RawVolumeReader::new().with_cancellation(token.clone());
        let mut vol = InMemVolume::new(whole, ScalarType::Uint8, 1);
        let status = reader.stream(&d, &mut vol).unwrap();
        assert_eq!(status, StreamStatus::Aborted { rows_read: 0 });
        assert!(!status.is_complete());
        assert!(vol.raw_data().iter().all(|b| *b == 0));

        token.reset();
        assert!(!reader.cancellation().is_cancelled());
    }
}
