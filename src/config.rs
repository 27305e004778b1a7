use crate::enums::Plane;

/// Session settings for a [`Viewer`](crate::viewer::Viewer).
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Initial cursor on both planes, clamped per plane
    pub start_slice: usize,
    pub initial_plane: Plane,
    /// Slices per scroll notch
    pub scroll_step: i64,
    /// Slices per step key press
    pub key_step: i64,
    /// Cosmetic, forwarded to frames
    pub figure_size: (f32, f32),
    /// Shown in frame titles
    pub patient_id: Option<String>,
    /// Seed of the noise placeholder used when the first frame is constant
    pub noise_seed: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            start_slice: 0,
            initial_plane: Plane::Axial,
            scroll_step: 1,
            key_step: 4,
            figure_size: (9.0, 9.0),
            patient_id: None,
            noise_seed: 0,
        }
    }
}

impl ViewerConfig {
    pub fn with_start_slice(mut self, start_slice: usize) -> Self {
        self.start_slice = start_slice;
        self
    }

    pub fn with_initial_plane(mut self, plane: Plane) -> Self {
        self.initial_plane = plane;
        self
    }

    pub fn with_steps(mut self, scroll_step: i64, key_step: i64) -> Self {
        self.scroll_step = scroll_step;
        self.key_step = key_step;
        self
    }

    pub fn with_figure_size(mut self, width: f32, height: f32) -> Self {
        self.figure_size = (width, height);
        self
    }

    pub fn with_patient_id(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }
}
