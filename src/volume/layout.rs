//! Byte layout of raw volume files.
//!
//! Samples are stored with the x axis varying fastest, followed by y and z.
//! Every sample holds `components` interleaved elements of the same scalar
//! type. The strides derived here are the distances, in bytes, between
//! consecutive samples, rows, slices and whole volumes of a file.
use super::shape::Extent;
use crate::typedef::ScalarType;

/// Byte strides of a file laid out over a given extent.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub struct LayoutIncrements([u64; 4]);

impl LayoutIncrements {
    /// Derive the byte strides for the given element type, number of
    /// components per sample and extent.
    ///
    /// Strides which do not fit in a `u64` saturate at `u64::MAX`. Use
    /// [`checked_compute`](#method.checked_compute) to detect this.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawvol::{Extent, LayoutIncrements, ScalarType};
    /// let extent = Extent::new([0, 3, 0, 3, 0, 2])?;
    /// let inc = LayoutIncrements::compute(ScalarType::Uint16, 1, &extent);
    /// assert_eq!(inc.as_array(), &[2, 8, 32, 96]);
    /// # Ok::<(), rawvol::RawVolumeError>(())
    /// ```
    pub fn compute(scalar_type: ScalarType, components: usize, extent: &Extent) -> Self {
        let mut running = (scalar_type.size_of() as u64).saturating_mul(components as u64);
        let mut increments = [0; 4];
        for (axis, increment) in increments.iter_mut().take(3).enumerate() {
            *increment = running;
            running = running.saturating_mul(extent.len(axis) as u64);
        }
        increments[3] = running;
        LayoutIncrements(increments)
    }

    /// Derive the byte strides like [`compute`](#method.compute), or `None`
    /// if the size of the whole volume cannot be expressed as a file
    /// offset (a non-negative `i64`).
    pub fn checked_compute(
        scalar_type: ScalarType,
        components: usize,
        extent: &Extent,
    ) -> Option<Self> {
        let mut running = (scalar_type.size_of() as u64).checked_mul(components as u64)?;
        let mut increments = [0; 4];
        for (axis, increment) in increments.iter_mut().take(3).enumerate() {
            *increment = running;
            running = running.checked_mul(extent.len(axis) as u64)?;
        }
        if running > i64::MAX as u64 {
            return None;
        }
        increments[3] = running;
        Some(LayoutIncrements(increments))
    }

    /// Bytes per sample point (all components).
    pub fn sample(&self) -> u64 {
        self.0[0]
    }

    /// Bytes per row.
    pub fn row(&self) -> u64 {
        self.0[1]
    }

    /// Bytes per slice.
    pub fn slice(&self) -> u64 {
        self.0[2]
    }

    /// Bytes per volume.
    pub fn volume(&self) -> u64 {
        self.0[3]
    }

    /// Retrieve the four strides as an array.
    pub fn as_array(&self) -> &[u64; 4] {
        &self.0
    }

    /// The number of payload bytes in a single file of the given
    /// dimensionality: one slice for 2D files, the whole volume for files
    /// of 3 or more dimensions.
    pub fn file_payload(&self, file_dimensionality: u8) -> u64 {
        self.0[usize::from(file_dimensionality.min(3))]
    }
}

#[cfg(test)]
mod tests {
    use super::LayoutIncrements;
    use crate::typedef::ScalarType;
    use crate::volume::shape::Extent;

    #[test]
    fn test_increments_uint8() {
        let extent = Extent::new([0, 9, 0, 4, 0, 1]).unwrap();
        let inc = LayoutIncrements::compute(ScalarType::Uint8, 1, &extent);
        assert_eq!(inc.sample(), 1);
        assert_eq!(inc.row(), 10);
        assert_eq!(inc.slice(), 50);
        assert_eq!(inc.volume(), 100);
        assert_eq!(inc.file_payload(2), 50);
        assert_eq!(inc.file_payload(3), 100);
        assert_eq!(inc.file_payload(4), 100);
    }

    #[test]
    fn test_increments_components() {
        let extent = Extent::new([10, 13, -2, 1, 5, 5]).unwrap();
        let inc = LayoutIncrements::compute(ScalarType::Float32, 3, &extent);
        assert_eq!(inc.as_array(), &[12, 48, 192, 192]);
    }

    #[test]
    fn test_huge_extent_saturates() {
        let extent = Extent::new([i32::MIN, i32::MAX, i32::MIN, i32::MAX, i32::MIN, i32::MAX])
            .unwrap();
        let inc = LayoutIncrements::compute(ScalarType::Float64, 2, &extent);
        assert_eq!(inc.sample(), 16);
        assert_eq!(inc.row(), 1u64 << 36);
        assert_eq!(inc.slice(), u64::MAX);
        assert_eq!(inc.volume(), u64::MAX);
        assert_eq!(LayoutIncrements::checked_compute(ScalarType::Float64, 2, &extent), None);

        // 2^31 x 2^31 bytes fits in u64 but not in a file offset
        let extent = Extent::new([0, i32::MAX, 0, i32::MAX, 0, 1]).unwrap();
        assert_eq!(LayoutIncrements::checked_compute(ScalarType::Uint8, 1, &extent), None);
        let extent = Extent::new([0, i32::MAX, 0, i32::MAX, 0, 0]).unwrap();
        assert_eq!(
            LayoutIncrements::checked_compute(ScalarType::Uint8, 1, &extent),
            Some(LayoutIncrements::compute(ScalarType::Uint8, 1, &extent))
        );
    }

    #[test]
    fn test_volume_increment_matches_sample_count() {
        let extents = [
            [0, 0, 0, 0, 0, 0],
            [0, 255, 0, 255, 0, 0],
            [3, 9, 1, 7, 2, 4],
            [-5, 5, -5, 5, -5, 5],
        ];
        for raw in extents.iter() {
            let extent = Extent::new(*raw).unwrap();
            for t in ScalarType::ALL.iter() {
                for components in 1..5 {
                    let inc = LayoutIncrements::compute(*t, components, &extent);
                    assert_eq!(
                        LayoutIncrements::checked_compute(*t, components, &extent),
                        Some(inc)
                    );
                    let bytes_per_sample = (t.size_of() * components) as u64;
                    assert_eq!(inc.sample(), bytes_per_sample);
                    assert_eq!(
                        inc.volume(),
                        bytes_per_sample * extent.sample_count() as u64,
                        "{:?} {} {:?}",
                        t,
                        components,
                        raw
                    );
                }
            }
        }
    }
}
