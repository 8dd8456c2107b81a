//! This module defines the data element API, which maps the primitive
//! numeric types to their scalar type and enables reading them from the raw
//! bytes of a decoded volume.
use crate::typedef::ScalarType;
use bytemuck::Pod;
use num_traits::AsPrimitive;

/// Trait type for characterizing a raw volume data element, implemented
/// for the primitive numeric types which can be stored in a raw volume.
pub trait DataElement: 'static + Pod + PartialEq + AsPrimitive<f64> {
    /// The scalar type mapped to this type.
    const SCALAR_TYPE: ScalarType;

    /// Read a single element from a native-endian byte sequence of exactly
    /// `size_of::<Self>()` bytes. No alignment is required.
    fn from_ne_slice(bytes: &[u8]) -> Self {
        bytemuck::pod_read_unaligned(bytes)
    }

    /// Read a sequence of native-endian elements. Trailing bytes which do
    /// not make up a whole element are ignored.
    fn from_ne_slice_many(bytes: &[u8]) -> Vec<Self> {
        bytes
            .chunks_exact(std::mem::size_of::<Self>())
            .map(Self::from_ne_slice)
            .collect()
    }
}

macro_rules! impl_data_element {
    ($($t:ty => $st:ident),* $(,)?) => {
        $(
            impl DataElement for $t {
                const SCALAR_TYPE: ScalarType = ScalarType::$st;
            }
        )*
    };
}

impl_data_element! {
    u8 => Uint8,
    i8 => Int8,
    u16 => Uint16,
    i16 => Int16,
    u32 => Uint32,
    i32 => Int32,
    u64 => Uint64,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
}
