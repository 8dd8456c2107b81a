//! Reader for raw volumetric image data.
//!
//! Raw volumes are stored without any self-describing metadata: the samples
//! of a 3D grid are written to one file per slice, or to a single file for
//! the whole volume, optionally preceded by a header of opaque bytes. A
//! [`VolumeDescriptor`] tells this crate how to interpret those bytes (the
//! element type, the number of components per sample, the extent of the
//! grid, the byte order and row orientation, the header size and the names
//! of the files), and a [`RawVolumeReader`] decodes the data into a
//! destination volume, row by row.
//!
//! # Example
//!
//! ```no_run
//! use rawvol::{Extent, HeaderSize, RawVolumeReader, ScalarType, VolumeDescriptor};
//!
//! let descriptor = VolumeDescriptor::new()
//!     .with_scalar_type(ScalarType::Uint16)
//!     .with_extent(Extent::new([0, 511, 0, 511, 0, 99])?)
//!     .with_file_prefix("ct/slice")
//!     .with_header_size(HeaderSize::Manual(0))
//!     .with_swap_bytes(true);
//!
//! let (volume, status) = RawVolumeReader::new().read_volume(&descriptor)?;
//! assert!(status.is_complete());
//! let value: u16 = volume.get(256, 256, 50, 0)?;
//! # Ok::<(), rawvol::RawVolumeError>(())
//! ```
//!
//! With the `ndarray_volumes` feature (on by default), in-memory volumes can
//! be turned into `ndarray` arrays through [`IntoNdArray`]. The
//! `nalgebra_affine` feature adds the [`affine`] module, which maps sample
//! indices to physical coordinates.
//!
//! [`VolumeDescriptor`]: ./descriptor/struct.VolumeDescriptor.html
//! [`RawVolumeReader`]: ./volume/streamed/struct.RawVolumeReader.html
//! [`IntoNdArray`]: ./volume/ndarray/trait.IntoNdArray.html
//! [`affine`]: ./affine/index.html
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate quick_error;

#[cfg(feature = "nalgebra_affine")]
pub mod affine;
pub mod descriptor;
pub mod error;
pub mod header;
pub mod naming;
pub mod typedef;
mod util;
pub mod volume;

pub use byteordered::Endianness;
pub use descriptor::VolumeDescriptor;
pub use error::{RawVolumeError, Result};
pub use header::HeaderSize;
pub use naming::{FileNaming, FilePattern, DEFAULT_FILE_PATTERN};
pub use typedef::ScalarType;
pub use volume::element::DataElement;
pub use volume::layout::LayoutIncrements;
#[cfg(feature = "ndarray_volumes")]
pub use volume::ndarray::IntoNdArray;
pub use volume::shape::Extent;
pub use volume::{CancellationToken, InMemVolume, RawVolumeReader, StreamStatus, VolumeSink};
