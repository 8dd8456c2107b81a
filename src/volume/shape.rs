//! Extent constructs.
//!
//! Raw volumes are addressed with inclusive index ranges along three axes,
//! written as six integers `[xmin, xmax, ymin, ymax, zmin, zmax]`. The
//! minimum of an axis does not need to be zero, which makes it possible to
//! describe a sub-region of a larger volume with the same indices as the
//! whole. The type [`Extent`] keeps these ranges consistent.
//!
//! [`Extent`]: ./struct.Extent.html
use crate::error::{RawVolumeError, Result};
use std::ops::RangeInclusive;

/// A validated 3D extent, where every axis minimum is less than or equal
/// to its maximum.
#[derive(Debug, Copy, Clone, Default, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Extent([i32; 6]);

impl Extent {
    /// Validate and create a new extent from its raw representation.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawvol::Extent;
    /// let extent = Extent::new([0, 63, 0, 31, 1, 10])?;
    /// assert_eq!(extent.dim(), [64, 32, 10]);
    /// assert!(Extent::new([0, 63, 5, 4, 0, 0]).is_err());
    /// # Ok::<(), rawvol::RawVolumeError>(())
    /// ```
    pub fn new(raw: [i32; 6]) -> Result<Self> {
        if raw.chunks_exact(2).any(|r| r[0] > r[1]) {
            return Err(RawVolumeError::InvalidExtent(raw));
        }
        Ok(Extent(raw))
    }

    /// Create an extent starting at index 0 with the given number of
    /// samples along each axis.
    pub fn with_dim(dim: [usize; 3]) -> Result<Self> {
        let mut raw = [0; 6];
        for (axis, d) in dim.iter().enumerate() {
            raw[axis * 2 + 1] = ((*d).min(i32::MAX as usize) as i32).saturating_sub(1);
        }
        if dim.iter().any(|d| *d == 0 || *d > i32::MAX as usize) {
            return Err(RawVolumeError::InvalidExtent(raw));
        }
        Ok(Extent(raw))
    }

    /// Retrieve a reference to the raw field.
    pub fn raw(&self) -> &[i32; 6] {
        &self.0
    }

    /// First index along the given axis (0 = x, 1 = y, 2 = z).
    pub fn min(&self, axis: usize) -> i32 {
        self.0[axis * 2]
    }

    /// Last index (inclusive) along the given axis.
    pub fn max(&self, axis: usize) -> i32 {
        self.0[axis * 2 + 1]
    }

    /// Number of samples along the given axis.
    pub fn len(&self, axis: usize) -> usize {
        (i64::from(self.max(axis)) - i64::from(self.min(axis)) + 1) as usize
    }

    /// The inclusive index range along the given axis.
    pub fn range(&self, axis: usize) -> RangeInclusive<i32> {
        self.min(axis)..=self.max(axis)
    }

    /// Number of samples along each axis.
    pub fn dim(&self) -> [usize; 3] {
        [self.len(0), self.len(1), self.len(2)]
    }

    /// Total number of sample points covered by the extent.
    pub fn sample_count(&self) -> usize {
        self.dim().iter().product()
    }

    /// Number of rows (x lines) covered by the extent.
    pub fn row_count(&self) -> usize {
        self.len(1) * self.len(2)
    }

    /// Check whether `other` lies entirely within this extent.
    pub fn contains(&self, other: &Extent) -> bool {
        (0..3).all(|axis| other.min(axis) >= self.min(axis) && other.max(axis) <= self.max(axis))
    }

    /// Obtain a copy of this extent with a different z range.
    pub fn with_z_range(&self, zmin: i32, zmax: i32) -> Result<Self> {
        let mut raw = self.0;
        raw[4] = zmin;
        raw[5] = zmax;
        Extent::new(raw)
    }
}

impl AsRef<[i32]> for Extent {
    fn as_ref(&self) -> &[i32] {
        &self.0
    }
}
