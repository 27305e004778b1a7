use crate::enums::Plane;
use crate::interpolator::Interpolator;
use crate::window::DisplayRange;

use ndarray::Array2;
use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::ArrayView3;
use ndarray::s;
use rayon::prelude::*;

/// Read-only CT volume indexed as (dim0, dim1, dim2), where dim2 walks the
/// axial slices.
#[derive(Debug, Clone, Default)]
pub struct Volume {
    data: Array3<f32>,
}

impl Volume {
    pub fn new(data: Array3<f32>) -> Self {
        Self { data }
    }

    /// Convert a volume of any scalar type losslessly representable as `f32`
    /// (e.g. `i16` Hounsfield units).
    pub fn from_array<T>(data: &Array3<T>) -> Self
    where
        T: Copy + Into<f32>,
    {
        Self::new(data.mapv(Into::into))
    }

    /// Get the dimensions of the volume (dim0, dim1, dim2)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn shape(&self) -> [usize; 3] {
        let (d0, d1, d2) = self.dim();
        [d0, d1, d2]
    }

    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    /// Number of slices along the plane's depth axis
    pub fn depth(&self, plane: Plane) -> usize {
        self.shape()[plane.depth_axis()]
    }

    pub fn clamp_index(&self, plane: Plane, index: i64) -> usize {
        let max_index = self.depth(plane).saturating_sub(1) as i64;
        index.clamp(0, max_index) as usize
    }

    /// Global intensity range of the volume
    pub fn value_range(&self) -> Option<DisplayRange> {
        let (low, high) = self
            .data
            .par_iter()
            .map(|&v| (v, v))
            .reduce_with(|a, b| (a.0.min(b.0), a.1.max(b.1)))?;
        Some(DisplayRange { low, high })
    }

    /// Native slice at `index`: axial `[:, :, index]`, sagittal `[:, index, :]`.
    pub fn get_slice_from_axis(&self, index: usize, plane: Plane) -> Option<ArrayView2<'_, f32>> {
        if index >= self.depth(plane) {
            return None;
        }
        let slice = match plane {
            Plane::Axial => self.data.slice(s![.., .., index]),
            Plane::Sagittal => self.data.slice(s![.., index, ..]),
        };
        Some(slice)
    }

    /// Displayed raster size (rows, columns) for a plane.
    ///
    /// The sagittal view stretches dim2 so it spans `shape[0]` columns, the
    /// same factor applied to projected box columns.
    pub fn display_dim(&self, plane: Plane) -> (usize, usize) {
        let (d0, d1, _) = self.dim();
        match plane {
            Plane::Axial => (d0, d1),
            Plane::Sagittal => (d0, d0),
        }
    }

    /// Column scale from native slice columns to displayed columns
    pub fn column_scale(&self, plane: Plane) -> f64 {
        let (d0, _, d2) = self.dim();
        match plane {
            Plane::Axial => 1.0,
            Plane::Sagittal => d0 as f64 / d2 as f64,
        }
    }

    /// Write the displayed (unwindowed) slice into `raster`, reallocating only
    /// when the displayed size changes.
    pub fn sample_display_slice(&self, index: usize, plane: Plane, raster: &mut Array2<f32>) -> bool {
        let Some(slice) = self.get_slice_from_axis(index, plane) else {
            return false;
        };
        let display_dim = self.display_dim(plane);
        if raster.dim() != display_dim {
            *raster = Array2::zeros(display_dim);
        }

        if slice.dim() == display_dim {
            raster.assign(&slice);
        } else {
            Interpolator::resample_into(&slice, raster);
        }
        true
    }
}
