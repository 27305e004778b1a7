//! Bounding-box geometry in voxel space.
//!
//! Boxes are stored as `[min_dim0, min_dim1, min_dim2, max_dim0, max_dim1, max_dim2]`
//! and centers as `[dim0, dim1, dim2]`.

use ndarray::Array3;
use ndarray::ArrayView3;
use ndarray::Axis;
use ndarray::concatenate;
use ndarray::s;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Diameter must be a finite, non-negative value, got {0}")]
    InvalidDiameter(f64),

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Diameter of a box around a center, either isotropic or per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diameter {
    Scalar(f64),
    PerAxis([f64; 3]),
}

impl Diameter {
    fn per_axis(self) -> [f64; 3] {
        match self {
            Diameter::Scalar(d) => [d; 3],
            Diameter::PerAxis(d) => d,
        }
    }
}

impl From<f64> for Diameter {
    fn from(value: f64) -> Self {
        Diameter::Scalar(value)
    }
}

impl From<[f64; 3]> for Diameter {
    fn from(value: [f64; 3]) -> Self {
        Diameter::PerAxis(value)
    }
}

/// Axis-aligned integer box in voxel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BBox {
    pub min: [i32; 3],
    pub max: [i32; 3],
}

impl BBox {
    pub fn new(min: [i32; 3], max: [i32; 3]) -> Self {
        Self { min, max }
    }

    /// Round a real-valued box onto the voxel grid.
    pub fn regularized(raw: [f64; 6]) -> Self {
        Self::from_array(regularize(raw))
    }

    pub fn from_array(values: [i32; 6]) -> Self {
        Self {
            min: [values[0], values[1], values[2]],
            max: [values[3], values[4], values[5]],
        }
    }

    pub fn to_array(&self) -> [i32; 6] {
        [
            self.min[0],
            self.min[1],
            self.min[2],
            self.max[0],
            self.max[1],
            self.max[2],
        ]
    }

    fn to_f64(self) -> [f64; 6] {
        self.to_array().map(f64::from)
    }

    pub fn center(&self) -> [i32; 3] {
        bbox_to_center(self.to_f64())
    }

    pub fn contains(&self, point: [f64; 3]) -> bool {
        point_in_box(point, self)
    }
}

/// Round every component to the nearest integer, ties to even.
pub fn regularize<const N: usize>(x: [f64; N]) -> [i32; N] {
    x.map(|value| value.round_ties_even() as i32)
}

/// Regularized midpoint of a box on each axis.
pub fn bbox_to_center(bbox: [f64; 6]) -> [i32; 3] {
    regularize([
        0.5 * (bbox[0] + bbox[3]),
        0.5 * (bbox[1] + bbox[4]),
        0.5 * (bbox[2] + bbox[5]),
    ])
}

/// Build a box spanning `floor(d/2)` voxels below and `ceil(d/2)` voxels above
/// the regularized center on each axis.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidDiameter`] for negative or non-finite diameters.
pub fn center_to_bbox(
    center: [f64; 3],
    diameter: impl Into<Diameter>,
) -> Result<BBox, GeometryError> {
    let diameter = diameter.into().per_axis();
    if let Some(&bad) = diameter.iter().find(|d| !d.is_finite() || **d < 0.0) {
        return Err(GeometryError::InvalidDiameter(bad));
    }

    let center = regularize(center);
    let left = diameter.map(|d| (d / 2.0).floor() as i32);
    let right = diameter.map(|d| (d / 2.0).ceil() as i32);

    Ok(BBox {
        min: std::array::from_fn(|axis| center[axis] - left[axis]),
        max: std::array::from_fn(|axis| center[axis] + right[axis]),
    })
}

/// Closed-interval containment test on all three axes.
pub fn point_in_box(point: [f64; 3], bbox: &BBox) -> bool {
    (0..3).all(|axis| {
        f64::from(bbox.min[axis]) <= point[axis] && point[axis] <= f64::from(bbox.max[axis])
    })
}

/// Crop `bbox` out of `volume`, filling the part that falls outside the volume
/// with `pad_value`.
///
/// The output extent along each axis is always `max - min` of the regularized
/// box. Only the intersected region plus the requested margins is allocated.
pub fn extract_subvolume<T: Clone>(
    volume: ArrayView3<'_, T>,
    bbox: [f64; 6],
    pad_value: T,
) -> Result<Array3<T>, GeometryError> {
    let bbox = BBox::regularized(bbox);
    let shape = volume.shape();

    let mut valid_min = [0usize; 3];
    let mut valid_max = [0usize; 3];
    let mut padding_min = [0usize; 3];
    let mut padding_max = [0usize; 3];

    for axis in 0..3 {
        let n = shape[axis] as i64;
        let lo = i64::from(bbox.min[axis]);
        let hi = i64::from(bbox.max[axis]).max(lo);

        let inside_lo = lo.clamp(0, n);
        let inside_hi = hi.clamp(0, n).max(inside_lo);
        valid_min[axis] = inside_lo as usize;
        valid_max[axis] = inside_hi as usize;

        // Overhang is counted only over the requested interval, so a box lying
        // completely outside the volume still has extent `hi - lo`.
        padding_min[axis] = (hi.min(0) - lo).max(0) as usize;
        padding_max[axis] = (hi - lo.max(n)).max(0) as usize;
    }

    let mut subvol = volume
        .slice(s![
            valid_min[0]..valid_max[0],
            valid_min[1]..valid_max[1],
            valid_min[2]..valid_max[2]
        ])
        .to_owned();

    for axis in 0..3 {
        if padding_min[axis] == 0 && padding_max[axis] == 0 {
            continue;
        }

        let mut padding_shape = [subvol.dim().0, subvol.dim().1, subvol.dim().2];
        padding_shape[axis] = padding_min[axis];
        let padding_left = Array3::from_elem(padding_shape, pad_value.clone());
        padding_shape[axis] = padding_max[axis];
        let padding_right = Array3::from_elem(padding_shape, pad_value.clone());

        subvol = concatenate(
            Axis(axis),
            &[padding_left.view(), subvol.view(), padding_right.view()],
        )?;
    }

    Ok(subvol)
}
