//! This module defines the destination volume API, as well as the
//! machinery for decoding raw volumes into them.
//! An integration with `ndarray` allows for more elegant and
//! efficient approaches, and should be preferred when possible.
//! In order to do so, you must add the `ndarray_volumes` feature
//! to this crate.

pub mod element;
pub mod inmem;
pub mod layout;
pub mod shape;
pub mod streamed;
pub use self::inmem::InMemVolume;
pub use self::streamed::{CancellationToken, RawVolumeReader, StreamStatus};

#[cfg(feature = "ndarray_volumes")]
pub mod ndarray;

use self::shape::Extent;
use crate::typedef::ScalarType;

/// A destination for decoded samples.
///
/// Implementors expose a contiguous byte buffer which the reader fills row
/// by row, in the element type given by [`scalar_type`]. The position of
/// each row is determined from the destination's own extent and
/// increments, so destinations may pad their rows or slices.
///
/// [`scalar_type`]: #tymethod.scalar_type
pub trait VolumeSink {
    /// The region of the volume this destination holds.
    fn extent(&self) -> Extent;

    /// The element type of the buffer.
    fn scalar_type(&self) -> ScalarType;

    /// Number of elements per sample point.
    fn components(&self) -> usize;

    /// Distance, in elements, between consecutive samples, rows and slices.
    fn increments(&self) -> [usize; 3];

    /// The writable sample buffer.
    fn raw_data_mut(&mut self) -> &mut [u8];
}

impl<'a, S> VolumeSink for &'a mut S
where
    S: VolumeSink + ?Sized,
{
    fn extent(&self) -> Extent {
        (**self).extent()
    }

    fn scalar_type(&self) -> ScalarType {
        (**self).scalar_type()
    }

    fn components(&self) -> usize {
        (**self).components()
    }

    fn increments(&self) -> [usize; 3] {
        (**self).increments()
    }

    fn raw_data_mut(&mut self) -> &mut [u8] {
        (**self).raw_data_mut()
    }
}
