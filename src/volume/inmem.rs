//! Module holding an in-memory destination volume.

use super::element::DataElement;
use super::shape::Extent;
use super::VolumeSink;
use crate::error::{RawVolumeError, Result};
use crate::typedef::ScalarType;
use num_traits::AsPrimitive;

/// A data type for a decoded volume contained in memory.
///
/// Samples are stored contiguously in native byte order, with the x axis
/// varying fastest and the components of each sample interleaved. Values
/// can be fetched with [`get`](#method.get), converted to a vector with
/// [`to_vec`](#method.to_vec) or turned into an `ndarray` (with the
/// `ndarray_volumes` feature).
#[derive(Debug, PartialEq, Clone)]
pub struct InMemVolume {
    extent: Extent,
    scalar_type: ScalarType,
    components: usize,
    raw_data: Vec<u8>,
}

impl InMemVolume {
    /// Allocate a zero-filled volume for the given extent.
    pub fn new(extent: Extent, scalar_type: ScalarType, components: usize) -> Self {
        let len = extent.sample_count() * components * scalar_type.size_of();
        InMemVolume {
            extent,
            scalar_type,
            components,
            raw_data: vec![0; len],
        }
    }

    /// Build a volume from existing native-endian sample data.
    ///
    /// # Errors
    ///
    /// - `RawVolumeError::IncompatibleDestination` if the length of
    ///   `raw_data` does not match the extent, type and component count.
    pub fn from_raw_data(
        extent: Extent,
        scalar_type: ScalarType,
        components: usize,
        raw_data: Vec<u8>,
    ) -> Result<Self> {
        let expected = extent.sample_count() * components * scalar_type.size_of();
        if raw_data.len() != expected {
            return Err(RawVolumeError::IncompatibleDestination(format!(
                "expected {} bytes of sample data, got {}",
                expected,
                raw_data.len()
            )));
        }
        Ok(InMemVolume {
            extent,
            scalar_type,
            components,
            raw_data,
        })
    }

    /// Retrieve the number of samples along each axis.
    pub fn dim(&self) -> [usize; 3] {
        self.extent.dim()
    }

    /// Retrieve the element type.
    pub fn data_type(&self) -> ScalarType {
        self.scalar_type
    }

    /// Retrieve a reference to the raw data.
    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    /// Retrieve the raw data, consuming the volume.
    pub fn into_raw_data(self) -> Vec<u8> {
        self.raw_data
    }

    /// Byte offset of a single element, in absolute extent coordinates.
    fn offset_of(&self, x: i32, y: i32, z: i32, component: usize) -> Result<usize> {
        let coords = [x, y, z];
        if component >= self.components
            || (0..3).any(|axis| !self.extent.range(axis).contains(&coords[axis]))
        {
            return Err(RawVolumeError::OutOfBounds([x, y, z, component as i32]));
        }
        let [incx, incy, incz] = self.increments();
        let index = (x - self.extent.min(0)) as usize * incx
            + (y - self.extent.min(1)) as usize * incy
            + (z - self.extent.min(2)) as usize * incz
            + component;
        Ok(index * self.scalar_type.size_of())
    }

    fn check_type<T: DataElement>(&self) -> Result<()> {
        if T::SCALAR_TYPE != self.scalar_type {
            return Err(RawVolumeError::ScalarTypeMismatch(
                self.scalar_type,
                T::SCALAR_TYPE,
            ));
        }
        Ok(())
    }

    /// Fetch a single element, in absolute extent coordinates.
    ///
    /// # Errors
    ///
    /// - `RawVolumeError::ScalarTypeMismatch` if `T` is not the volume's
    ///   element type.
    /// - `RawVolumeError::OutOfBounds` if the coordinates lie outside of the
    ///   volume's extent, or the component index is too large.
    pub fn get<T: DataElement>(&self, x: i32, y: i32, z: i32, component: usize) -> Result<T> {
        self.check_type::<T>()?;
        let offset = self.offset_of(x, y, z, component)?;
        Ok(T::from_ne_slice(
            &self.raw_data[offset..offset + self.scalar_type.size_of()],
        ))
    }

    /// Retrieve the raw bytes of a row, in absolute extent coordinates.
    pub fn row_bytes(&self, y: i32, z: i32) -> Result<&[u8]> {
        let start = self.offset_of(self.extent.min(0), y, z, 0)?;
        let len = self.extent.len(0) * self.components * self.scalar_type.size_of();
        Ok(&self.raw_data[start..start + len])
    }

    /// Copy all elements into a vector, x varying fastest.
    ///
    /// # Errors
    ///
    /// - `RawVolumeError::ScalarTypeMismatch` if `T` is not the volume's
    ///   element type.
    pub fn to_vec<T: DataElement>(&self) -> Result<Vec<T>> {
        self.check_type::<T>()?;
        Ok(T::from_ne_slice_many(&self.raw_data))
    }

    /// Copy all elements into a vector of `f64`, whatever the element type.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        fn convert<T: DataElement>(bytes: &[u8]) -> Vec<f64> {
            T::from_ne_slice_many(bytes)
                .into_iter()
                .map(|v| AsPrimitive::<f64>::as_(v))
                .collect()
        }
        let data = &self.raw_data;
        match self.scalar_type {
            ScalarType::Uint8 => convert::<u8>(data),
            ScalarType::Int8 => convert::<i8>(data),
            ScalarType::Uint16 => convert::<u16>(data),
            ScalarType::Int16 => convert::<i16>(data),
            ScalarType::Uint32 => convert::<u32>(data),
            ScalarType::Int32 => convert::<i32>(data),
            ScalarType::Uint64 => convert::<u64>(data),
            ScalarType::Int64 => convert::<i64>(data),
            ScalarType::Float32 => convert::<f32>(data),
            ScalarType::Float64 => convert::<f64>(data),
        }
    }
}

impl VolumeSink for InMemVolume {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    fn components(&self) -> usize {
        self.components
    }

    fn increments(&self) -> [usize; 3] {
        let [nx, ny, _] = self.extent.dim();
        [self.components, self.components * nx, self.components * nx * ny]
    }

    fn raw_data_mut(&mut self) -> &mut [u8] {
        &mut self.raw_data
    }
}
