//! This module defines the `VolumeDescriptor` struct, which describes how a
//! raw volume is laid out in one or more files.
//!
//! Raw files are not self-describing: the element type, the extent, the
//! byte order and the way slices are spread over files all have to be
//! provided by the caller. A descriptor is built once and then handed to a
//! [`RawVolumeReader`] for every read.
//!
//! # Example
//!
//! ```
//! use rawvol::{Extent, FilePattern, HeaderSize, ScalarType, VolumeDescriptor};
//! use byteordered::Endianness;
//!
//! let descriptor = VolumeDescriptor::new()
//!     .with_scalar_type(ScalarType::Uint16)
//!     .with_extent(Extent::new([0, 255, 0, 255, 1, 93])?)
//!     .with_data_byte_order(Endianness::Big)
//!     .with_header_size(HeaderSize::Manual(0))
//!     .with_file_pattern(FilePattern::new("%s/I.%03d")?.prefix("headsq"));
//! assert_eq!(descriptor.data_byte_order(), Endianness::Big);
//! # Ok::<(), rawvol::RawVolumeError>(())
//! ```
//!
//! [`RawVolumeReader`]: ../volume/streamed/struct.RawVolumeReader.html

use crate::error::{RawVolumeError, Result};
use crate::header::HeaderSize;
use crate::naming::{FileNaming, FilePattern};
use crate::typedef::ScalarType;
use crate::util::endianness_name;
use crate::volume::layout::LayoutIncrements;
use crate::volume::shape::Extent;
use byteordered::Endianness;
use std::fmt;
use std::path::PathBuf;

/// Description of the layout of a raw volume on disk.
///
/// All fields have sensible defaults (see [`new`](#method.new)), except for
/// the file naming scheme, which must always be set before reading.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeDescriptor {
    scalar_type: ScalarType,
    components: usize,
    extent: Extent,
    spacing: [f64; 3],
    origin: [f64; 3],
    direction: [f64; 9],
    swap_bytes: bool,
    lower_left: bool,
    file_dimensionality: u8,
    header_size: HeaderSize,
    naming: Option<FileNaming>,
}

impl Default for VolumeDescriptor {
    fn default() -> Self {
        VolumeDescriptor {
            scalar_type: ScalarType::Int16,
            components: 1,
            extent: Extent::default(),
            spacing: [1.; 3],
            origin: [0.; 3],
            direction: [1., 0., 0., 0., 1., 0., 0., 0., 1.],
            swap_bytes: false,
            lower_left: false,
            file_dimensionality: 2,
            header_size: HeaderSize::Auto,
            naming: None,
        }
    }
}

impl VolumeDescriptor {
    /// Create a descriptor with the default configuration: 16-bit signed
    /// samples with a single component, a 1x1x1 extent, unit spacing,
    /// identity direction, native byte order, rows stored from the top
    /// left, one file per slice and an automatically detected header size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the element type.
    pub fn with_scalar_type(mut self, scalar_type: ScalarType) -> Self {
        self.scalar_type = scalar_type;
        self
    }

    /// Set the number of elements per sample point.
    pub fn with_components(mut self, components: usize) -> Self {
        self.components = components;
        self
    }

    /// Set the extent of the data on disk.
    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = extent;
        self
    }

    /// Set the distance between samples along each axis.
    pub fn with_spacing(mut self, spacing: [f64; 3]) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the physical position of the first sample.
    pub fn with_origin(mut self, origin: [f64; 3]) -> Self {
        self.origin = origin;
        self
    }

    /// Set the direction cosines (a row-major 3x3 matrix).
    pub fn with_direction(mut self, direction: [f64; 9]) -> Self {
        self.direction = direction;
        self
    }

    /// Set whether the bytes of each element must be swapped after reading.
    pub fn with_swap_bytes(mut self, swap_bytes: bool) -> Self {
        self.swap_bytes = swap_bytes;
        self
    }

    /// Set the byte order of the data on disk, which enables byte swapping
    /// if it differs from this system's byte order.
    pub fn with_data_byte_order(mut self, endianness: Endianness) -> Self {
        self.set_data_byte_order(endianness);
        self
    }

    /// Set whether the first row in each file is the bottom row
    /// (`true`) or the top row (`false`) of the image.
    pub fn with_lower_left(mut self, lower_left: bool) -> Self {
        self.lower_left = lower_left;
        self
    }

    /// Set the number of dimensions stored in each file: 2 for one file per
    /// slice, 3 (or more) for the whole volume in a single file.
    pub fn with_file_dimensionality(mut self, file_dimensionality: u8) -> Self {
        self.file_dimensionality = file_dimensionality;
        self
    }

    /// Set the header size.
    pub fn with_header_size(mut self, header_size: HeaderSize) -> Self {
        self.header_size = header_size;
        self
    }

    /// Read every slice from the same file.
    pub fn with_file_name<P: Into<PathBuf>>(self, path: P) -> Self {
        self.with_file_naming(FileNaming::Single(path.into()))
    }

    /// Read slice `i` from the `i`-th file of the list.
    pub fn with_file_names<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.with_file_naming(FileNaming::List(paths.into_iter().map(Into::into).collect()))
    }

    /// Read each slice from a file named after a template.
    pub fn with_file_pattern(self, pattern: FilePattern) -> Self {
        self.with_file_naming(FileNaming::Pattern(pattern))
    }

    /// Read each slice from a file named after the default template
    /// (`"%s.%d"`) with the given prefix.
    pub fn with_file_prefix<S: Into<String>>(self, prefix: S) -> Self {
        self.with_file_pattern(FilePattern::with_default_template(prefix))
    }

    /// Set the file naming scheme, replacing any previous one.
    pub fn with_file_naming(mut self, naming: FileNaming) -> Self {
        self.naming = Some(naming);
        self
    }

    /// Set the byte order of the data on disk.
    pub fn set_data_byte_order(&mut self, endianness: Endianness) {
        self.swap_bytes = endianness != Endianness::native();
    }

    /// Set the file naming scheme, replacing any previous one.
    pub fn set_file_naming(&mut self, naming: FileNaming) {
        self.naming = Some(naming);
    }

    /// Remove the file naming scheme.
    pub fn clear_file_naming(&mut self) {
        self.naming = None;
    }

    /// Set the header size.
    pub fn set_header_size(&mut self, header_size: HeaderSize) {
        self.header_size = header_size;
    }

    /// Set the extent of the data on disk.
    pub fn set_extent(&mut self, extent: Extent) {
        self.extent = extent;
    }

    /// Retrieve the element type.
    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    /// Retrieve the number of elements per sample point.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Retrieve the configured extent.
    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    /// Retrieve the extent of the data that can be read. This is the
    /// configured extent, except when a non-empty list of file names is
    /// used: the z range then spans one slice per file, starting at 0.
    pub fn whole_extent(&self) -> Extent {
        match &self.naming {
            Some(FileNaming::List(paths))
                if !paths.is_empty() && paths.len() <= i32::MAX as usize =>
            {
                self.extent
                    .with_z_range(0, paths.len() as i32 - 1)
                    .unwrap_or(self.extent)
            }
            _ => self.extent,
        }
    }

    /// Retrieve the sample spacing.
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// Retrieve the position of the first sample.
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    /// Retrieve the direction cosines (row-major 3x3 matrix).
    pub fn direction(&self) -> [f64; 9] {
        self.direction
    }

    /// Whether elements are byte swapped after reading.
    pub fn swap_bytes(&self) -> bool {
        self.swap_bytes
    }

    /// Retrieve the byte order of the data on disk.
    pub fn data_byte_order(&self) -> Endianness {
        if self.swap_bytes {
            Endianness::native().to_opposite()
        } else {
            Endianness::native()
        }
    }

    /// Retrieve the byte order of the data on disk, as a string
    /// (`"BigEndian"` or `"LittleEndian"`).
    pub fn data_byte_order_name(&self) -> &'static str {
        endianness_name(self.data_byte_order())
    }

    /// Whether the first row in each file is the bottom row of the image.
    pub fn lower_left(&self) -> bool {
        self.lower_left
    }

    /// Retrieve the number of dimensions stored in each file.
    pub fn file_dimensionality(&self) -> u8 {
        self.file_dimensionality
    }

    /// Retrieve the header size.
    pub fn header_size(&self) -> HeaderSize {
        self.header_size
    }

    /// Retrieve the file naming scheme.
    pub fn file_naming(&self) -> Option<&FileNaming> {
        self.naming.as_ref()
    }

    /// Byte strides of the files over the whole extent.
    pub fn increments(&self) -> LayoutIncrements {
        LayoutIncrements::compute(self.scalar_type, self.components, &self.whole_extent())
    }

    /// Check that the descriptor is complete enough to read from.
    ///
    /// # Errors
    ///
    /// - `RawVolumeError::NoFileName` if no naming scheme is set.
    /// - `RawVolumeError::InvalidComponentCount` if there are no components.
    /// - `RawVolumeError::InvalidFileDimensionality` if the file
    ///   dimensionality is below 2.
    /// - `RawVolumeError::VolumeTooLarge` if the size of the data in bytes
    ///   overflows the range of file offsets.
    pub fn validate(&self) -> Result<()> {
        if self.naming.is_none() {
            return Err(RawVolumeError::NoFileName);
        }
        if self.components == 0 {
            return Err(RawVolumeError::InvalidComponentCount(self.components));
        }
        if self.file_dimensionality < 2 {
            return Err(RawVolumeError::InvalidFileDimensionality(
                self.file_dimensionality,
            ));
        }
        let whole = self.whole_extent();
        if LayoutIncrements::checked_compute(self.scalar_type, self.components, &whole).is_none() {
            return Err(RawVolumeError::VolumeTooLarge(*whole.raw()));
        }
        Ok(())
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter, values: &[T]) -> fmt::Result {
    f.write_str("(")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", v)?;
    }
    f.write_str(")")
}

impl fmt::Display for VolumeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.naming {
            Some(naming) => writeln!(f, "File naming: {}", naming)?,
            None => writeln!(f, "File naming: (none)")?,
        }
        writeln!(f, "Scalar type: {}", self.scalar_type)?;
        writeln!(f, "Number of scalar components: {}", self.components)?;
        writeln!(f, "File dimensionality: {}", self.file_dimensionality)?;
        writeln!(f, "File lower left: {}", if self.lower_left { "On" } else { "Off" })?;
        writeln!(f, "Swap bytes: {}", if self.swap_bytes { "On" } else { "Off" })?;
        writeln!(f, "Data byte order: {}", self.data_byte_order_name())?;
        f.write_str("Increments: ")?;
        write_list(f, self.increments().as_array())?;
        f.write_str("\nExtent: ")?;
        write_list(f, self.whole_extent().raw())?;
        f.write_str("\nSpacing: ")?;
        write_list(f, &self.spacing)?;
        f.write_str("\nDirection: ")?;
        write_list(f, &self.direction)?;
        f.write_str("\nOrigin: ")?;
        write_list(f, &self.origin)?;
        writeln!(f, "\nHeader size: {}", self.header_size)
    }
}
