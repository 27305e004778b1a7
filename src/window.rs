use crate::enums::WindowMode;

use ndarray::Array2;
use ndarray::ArrayView2;
use rand::Rng;
use rand::SeedableRng;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use tracing::warn;

/// Display intensity range anchored on the first rendered frame of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRange {
    pub low: f32,
    pub high: f32,
}

impl DisplayRange {
    pub fn of(slice: &ArrayView2<'_, f32>) -> Option<Self> {
        let (low, high) = min_max(slice.iter().copied())?;
        Some(Self { low, high })
    }

    pub fn span(&self) -> f32 {
        self.high - self.low
    }

    pub fn is_degenerate(&self) -> bool {
        self.span() <= 0.0
    }

    /// Compute the anchor from the first frame.
    ///
    /// A constant frame would give a zero-width range, so the anchor is taken
    /// from uniform noise over `volume_range` instead.
    pub fn anchor(
        first_frame: &ArrayView2<'_, f32>,
        volume_range: DisplayRange,
        seed: u64,
    ) -> DisplayRange {
        match Self::of(first_frame) {
            Some(range) if !range.is_degenerate() => range,
            _ => {
                warn!(
                    low = volume_range.low,
                    high = volume_range.high,
                    "first frame is constant, anchoring display range on a noise placeholder"
                );
                let noise = noise_placeholder(first_frame.dim(), volume_range, seed);
                Self::of(&noise.view()).unwrap_or(volume_range)
            }
        }
    }

    #[inline]
    pub fn normalize_to_u8(&self, value: f32) -> u8 {
        if self.is_degenerate() {
            return 0;
        }
        ((value - self.low) / self.span() * 255.0).clamp(0.0, 255.0) as u8
    }
}

fn noise_placeholder(dim: (usize, usize), range: DisplayRange, seed: u64) -> Array2<f32> {
    if range.is_degenerate() {
        return Array2::from_elem(dim, range.low);
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let uniform = Uniform::new(range.low, range.high);
    Array2::from_shape_simple_fn(dim, || rng.sample(uniform))
}

pub(crate) fn min_max(values: impl Iterator<Item = f32>) -> Option<(f32, f32)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

impl WindowMode {
    /// Map a raw intensity to display intensity under this window.
    #[inline]
    pub fn apply(self, value: f32, anchor: DisplayRange) -> f32 {
        match self.params() {
            Some(params) => {
                (value - params.floor).clamp(0.0, params.width) / params.width * anchor.span()
                    + anchor.low
            }
            None => value,
        }
    }
}
