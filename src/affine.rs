//! Geometry of the sample grid, expressed with `nalgebra` types.
//!
//! Requires the `nalgebra_affine` feature.
use crate::descriptor::VolumeDescriptor;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// A 4x4 affine transformation in homogeneous coordinates.
pub type Affine4 = Matrix4<f64>;

/// Separate a 4x4 affine into its 3x3 linear part and translation.
pub fn get_affine_and_translation(affine: &Affine4) -> (Matrix3<f64>, Vector3<f64>) {
    let translation = Vector3::new(affine[(0, 3)], affine[(1, 3)], affine[(2, 3)]);
    let linear = affine.fixed_view::<3, 3>(0, 0).into_owned();
    (linear, translation)
}

/// Build the affine mapping structured sample indices to physical
/// coordinates.
///
/// Indices are the absolute `(x, y, z)` coordinates of the extent, so the
/// origin is the position of index `(0, 0, 0)`, whether or not the extent
/// covers it. Each column of the linear part is a direction vector scaled
/// by the spacing along that axis.
#[rustfmt::skip]
pub fn index_to_physical(descriptor: &VolumeDescriptor) -> Affine4 {
    let d = descriptor.direction();
    let [sx, sy, sz] = descriptor.spacing();
    let [ox, oy, oz] = descriptor.origin();
    Affine4::new(
        d[0] * sx, d[1] * sy, d[2] * sz, ox,
        d[3] * sx, d[4] * sy, d[5] * sz, oy,
        d[6] * sx, d[7] * sy, d[8] * sz, oz,
        0.0,       0.0,       0.0,       1.0,
    )
}

/// Physical position of the sample at the structured index `(x, y, z)`.
pub fn sample_position(descriptor: &VolumeDescriptor, x: i32, y: i32, z: i32) -> Point3<f64> {
    let index = Point3::new(f64::from(x), f64::from(y), f64::from(z));
    index_to_physical(descriptor).transform_point(&index)
}
