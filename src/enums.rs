/// Viewing plane. The axial plane slices along dim2, the sagittal plane along dim1.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    #[default]
    Axial,
    Sagittal,
}

impl Plane {
    /// Volume axis orthogonal to the displayed plane
    pub fn depth_axis(self) -> usize {
        match self {
            Plane::Axial => 2,
            Plane::Sagittal => 1,
        }
    }

    pub fn other(self) -> Plane {
        match self {
            Plane::Axial => Plane::Sagittal,
            Plane::Sagittal => Plane::Axial,
        }
    }

    /// Coordinate letter used in frame titles
    pub fn label(self) -> char {
        match self {
            Plane::Axial => 'z',
            Plane::Sagittal => 'y',
        }
    }
}

/// Intensity window applied before display.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowMode {
    /// Soft tissue and bone, HU in [-1150, 350]
    #[default]
    Wide,
    /// Lung detail, HU in [-160, 220]
    Narrow,
    /// No clamping or rescaling
    Raw,
}

/// Clamp floor and width of a window, in raw intensity units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowParams {
    pub floor: f32,
    pub width: f32,
}

impl WindowMode {
    pub fn params(self) -> Option<WindowParams> {
        match self {
            WindowMode::Wide => Some(WindowParams {
                floor: -1150.0,
                width: 1500.0,
            }),
            WindowMode::Narrow => Some(WindowParams {
                floor: -160.0,
                width: 380.0,
            }),
            WindowMode::Raw => None,
        }
    }
}
