//! Interfaces and implementations specific to integration with `ndarray`.
//!
//! This module introduces the trait [`IntoNdArray`], which is implemented for
//! in-memory volumes and enables their mapping into a four-dimensional
//! [`Array`] of the volume's element type.
//!
//! #### Note on memory order
//!
//! Decoded volumes keep the x axis varying fastest, followed by y and z,
//! with the components of each sample interleaved. The resulting array
//! follows the standard (row major) layout over the axes `[z, y, x, c]`, so
//! no data is reordered in the conversion. Index the array as
//! `array[[z, y, x, c]]`, relative to the first sample of the volume's
//! extent.
//!
//! [`IntoNdArray`]: ./trait.IntoNdArray.html
//! [`Array`]: ../../../ndarray/type.Array.html
use super::element::DataElement;
use super::inmem::InMemVolume;
use super::VolumeSink;
use crate::error::{RawVolumeError, Result};
use ndarray::Array4;

/// Trait for volumes which can be converted to an ndarray.
///
/// Please see the [module-level documentation](index.html) for more details.
pub trait IntoNdArray {
    /// Convert the volume into an ndarray with the element type `T`, of
    /// shape `[nz, ny, nx, components]`.
    ///
    /// # Errors
    ///
    /// - `RawVolumeError::ScalarTypeMismatch` if `T` is not the volume's
    ///   element type.
    fn into_ndarray<T>(self) -> Result<Array4<T>>
    where
        T: DataElement;
}

impl IntoNdArray for InMemVolume {
    fn into_ndarray<T>(self) -> Result<Array4<T>>
    where
        T: DataElement,
    {
        (&self).into_ndarray()
    }
}

impl<'a> IntoNdArray for &'a InMemVolume {
    fn into_ndarray<T>(self) -> Result<Array4<T>>
    where
        T: DataElement,
    {
        let [nx, ny, nz] = self.dim();
        let components = self.components();
        let data = self.to_vec::<T>()?;
        Array4::from_shape_vec((nz, ny, nx, components), data)
            .map_err(|e| RawVolumeError::IncompatibleDestination(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::IntoNdArray;
    use crate::typedef::ScalarType;
    use crate::volume::inmem::InMemVolume;
    use crate::volume::shape::Extent;

    #[test]
    fn test_into_ndarray_axes() {
        let extent = Extent::new([0, 2, 0, 1, 0, 1]).unwrap();
        let data: Vec<u8> = (0..24u8).collect();
        let vol = InMemVolume::from_raw_data(extent, ScalarType::Uint8, 2, data).unwrap();

        let array = (&vol).into_ndarray::<u8>().unwrap();
        assert_eq!(array.shape(), &[2, 2, 3, 2]);
        assert_eq!(array[[0, 0, 0, 0]], 0);
        assert_eq!(array[[0, 0, 1, 1]], 3);
        assert_eq!(array[[0, 1, 0, 0]], 6);
        assert_eq!(array[[1, 0, 0, 1]], 13);
        assert_eq!(array[[1, 1, 2, 1]], 23);

        assert!(vol.clone().into_ndarray::<i8>().is_err());
        assert_eq!(vol.into_ndarray::<u8>().unwrap(), array);
    }
}
