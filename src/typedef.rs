//! This module contains the scalar element types which can be stored in a
//! raw volume file. Each type is identified by a numeric code, so that
//! configurations coming from other tools (which usually refer to these
//! types by number) can be converted to and from [`ScalarType`].
//!
//! [`ScalarType`]: ./enum.ScalarType.html

use crate::error::{RawVolumeError, Result};
use num_traits::FromPrimitive;
use std::fmt;

/// Data type for representing the element type of a raw volume.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum ScalarType {
    /// unsigned char.
    Uint8 = 3,
    /// signed short.
    Int16 = 4,
    /// unsigned short.
    Uint16 = 5,
    /// signed int.
    Int32 = 6,
    /// unsigned int.
    Uint32 = 7,
    /// 32 bit float.
    Float32 = 10,
    /// 64 bit float = double.
    Float64 = 11,
    /// signed char.
    Int8 = 15,
    /// signed long long.
    Int64 = 16,
    /// unsigned long long.
    Uint64 = 17,
}

/// Static properties of a scalar type.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct ScalarTypeInfo {
    /// Size of a single element, in bytes.
    pub size: usize,
    /// Whether the type is a floating point type.
    pub is_float: bool,
    /// Whether the type can represent negative values.
    pub is_signed: bool,
}

impl ScalarType {
    /// All supported scalar types, in ascending order of type code.
    pub const ALL: [ScalarType; 10] = [
        ScalarType::Uint8,
        ScalarType::Int16,
        ScalarType::Uint16,
        ScalarType::Int32,
        ScalarType::Uint32,
        ScalarType::Float32,
        ScalarType::Float64,
        ScalarType::Int8,
        ScalarType::Int64,
        ScalarType::Uint64,
    ];

    /// Obtain the scalar type identified by the given numeric code.
    ///
    /// # Errors
    ///
    /// - `RawVolumeError::UnsupportedScalarType` if the code is not known.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawvol::ScalarType;
    /// assert_eq!(ScalarType::from_code(5)?, ScalarType::Uint16);
    /// assert!(ScalarType::from_code(13).is_err());
    /// # Ok::<(), rawvol::RawVolumeError>(())
    /// ```
    pub fn from_code(code: i32) -> Result<Self> {
        ScalarType::from_i32(code).ok_or(RawVolumeError::UnsupportedScalarType(code))
    }

    /// Retrieve the numeric code of this scalar type.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Retrieve the static properties of this scalar type.
    pub fn info(self) -> ScalarTypeInfo {
        use ScalarType::*;
        let (size, is_float, is_signed) = match self {
            Int8 => (1, false, true),
            Uint8 => (1, false, false),
            Int16 => (2, false, true),
            Uint16 => (2, false, false),
            Int32 => (4, false, true),
            Uint32 => (4, false, false),
            Int64 => (8, false, true),
            Uint64 => (8, false, false),
            Float32 => (4, true, true),
            Float64 => (8, true, true),
        };
        ScalarTypeInfo {
            size,
            is_float,
            is_signed,
        }
    }

    /// Retrieve the size of an element of this data type, in bytes.
    pub fn size_of(self) -> usize {
        self.info().size
    }

    /// Check whether this is a floating point type.
    pub fn is_float(self) -> bool {
        self.info().is_float
    }

    /// Check whether this type is signed.
    pub fn is_signed(self) -> bool {
        self.info().is_signed
    }

    /// A short lowercase name for this type, such as `"uint16"`.
    pub fn name(self) -> &'static str {
        use ScalarType::*;
        match self {
            Int8 => "int8",
            Uint8 => "uint8",
            Int16 => "int16",
            Uint16 => "uint16",
            Int32 => "int32",
            Uint32 => "uint32",
            Int64 => "int64",
            Uint64 => "uint64",
            Float32 => "float32",
            Float64 => "float64",
        }
    }

    /// Parse a type from its short name (see [`name`](#method.name)).
    pub fn from_name(name: &str) -> Option<Self> {
        ScalarType::ALL.iter().copied().find(|t| t.name() == name)
    }
}

impl Default for ScalarType {
    fn default() -> Self {
        ScalarType::Int16
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
