//! Box overlays: per-box metadata and projection of 3D boxes onto a viewing plane.

use crate::bbox::BBox;
use crate::bbox::regularize;
use crate::enums::Plane;

use image::Rgb;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverlayError {
    #[error("Attribute list has {attributes} entries but there are {boxes} boxes")]
    AttributeCountMismatch { boxes: usize, attributes: usize },

    #[error("Color list has {colors} entries but there are {boxes} boxes")]
    ColorCountMismatch { boxes: usize, colors: usize },

    #[error("Unknown color: {0}")]
    UnknownColor(String),
}

/// Display color of a box outline and its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxColor(pub Rgb<u8>);

impl BoxColor {
    pub const RED: BoxColor = BoxColor(Rgb([255, 0, 0]));
    pub const GREEN: BoxColor = BoxColor(Rgb([0, 128, 0]));
    pub const YELLOW: BoxColor = BoxColor(Rgb([255, 255, 0]));
    pub const BLUE: BoxColor = BoxColor(Rgb([0, 0, 255]));
}

impl Default for BoxColor {
    fn default() -> Self {
        BoxColor::YELLOW
    }
}

impl FromStr for BoxColor {
    type Err = OverlayError;

    /// Accepts a handful of color names or `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || OverlayError::UnknownColor(s.to_string());
        let color = match s.trim().to_ascii_lowercase().as_str() {
            "red" | "r" => BoxColor::RED,
            "green" | "g" => BoxColor::GREEN,
            "yellow" | "y" => BoxColor::YELLOW,
            "blue" | "b" => BoxColor::BLUE,
            "cyan" | "c" => BoxColor(Rgb([0, 255, 255])),
            "magenta" | "m" => BoxColor(Rgb([255, 0, 255])),
            "white" | "w" => BoxColor(Rgb([255, 255, 255])),
            "orange" => BoxColor(Rgb([255, 165, 0])),
            hex => {
                let digits = hex
                    .strip_prefix('#')
                    .filter(|d| d.len() == 6 && d.is_ascii())
                    .ok_or_else(unknown)?;
                let channel =
                    |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| unknown());
                BoxColor(Rgb([channel(0)?, channel(2)?, channel(4)?]))
            }
        };
        Ok(color)
    }
}

/// Regularized boxes with positionally matched attributes and colors.
#[derive(Debug, Clone, Default)]
pub struct BoxSet {
    boxes: Vec<BBox>,
    attributes: Vec<String>,
    colors: Vec<BoxColor>,
}

impl BoxSet {
    /// Build a box set. `attributes` and `colors` must either be empty or have
    /// one entry per box.
    ///
    /// # Errors
    ///
    /// Returns an error when a non-empty metadata list has a different length
    /// than `boxes`.
    pub fn new(
        boxes: &[[f64; 6]],
        attributes: Vec<String>,
        colors: Vec<BoxColor>,
    ) -> Result<Self, OverlayError> {
        if !attributes.is_empty() && attributes.len() != boxes.len() {
            return Err(OverlayError::AttributeCountMismatch {
                boxes: boxes.len(),
                attributes: attributes.len(),
            });
        }
        if !colors.is_empty() && colors.len() != boxes.len() {
            return Err(OverlayError::ColorCountMismatch {
                boxes: boxes.len(),
                colors: colors.len(),
            });
        }

        Ok(Self {
            boxes: boxes.iter().map(|&raw| BBox::regularized(raw)).collect(),
            attributes,
            colors,
        })
    }

    pub fn from_boxes(boxes: &[[f64; 6]]) -> Self {
        Self {
            boxes: boxes.iter().map(|&raw| BBox::regularized(raw)).collect(),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[BBox] {
        &self.boxes
    }

    pub fn color(&self, index: usize) -> BoxColor {
        self.colors.get(index).copied().unwrap_or_default()
    }

    /// Overlay label, `"<index>:<attribute>"`
    pub fn label(&self, index: usize) -> String {
        match self.attributes.get(index) {
            Some(attribute) => format!("{index}:{attribute}"),
            None => format!("{index}:"),
        }
    }
}

/// A box projected onto a plane: a closed 2D rectangle in displayed pixel
/// coordinates plus the half-open depth interval along the plane's normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedBox {
    pub row_min: i32,
    pub col_min: i32,
    pub row_max: i32,
    pub col_max: i32,
    pub depth_min: i32,
    pub depth_max: i32,
}

impl ProjectedBox {
    /// Project `bbox` onto `plane`. On the sagittal plane the dim2 extent is
    /// scaled by `column_scale` (`shape[0] / shape[2]`) and re-regularized.
    pub fn project(bbox: &BBox, plane: Plane, column_scale: f64) -> Self {
        match plane {
            Plane::Axial => Self {
                row_min: bbox.min[0],
                col_min: bbox.min[1],
                row_max: bbox.max[0],
                col_max: bbox.max[1],
                depth_min: bbox.min[2],
                depth_max: bbox.max[2],
            },
            Plane::Sagittal => {
                let [col_min, col_max] = regularize([
                    f64::from(bbox.min[2]) * column_scale,
                    f64::from(bbox.max[2]) * column_scale,
                ]);
                Self {
                    row_min: bbox.min[0],
                    col_min,
                    row_max: bbox.max[0],
                    col_max,
                    depth_min: bbox.min[1],
                    depth_max: bbox.max[1],
                }
            }
        }
    }

    /// Half-open depth test, `depth_min <= index < depth_max`
    pub fn intersects_slice(&self, index: usize) -> bool {
        let index = index as i64;
        i64::from(self.depth_min) <= index && index < i64::from(self.depth_max)
    }

    /// Slice the cursor jumps to when this box is selected
    pub fn depth_midpoint(&self) -> i64 {
        (i64::from(self.depth_min) + i64::from(self.depth_max)) / 2
    }
}

/// A box drawn on the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    pub index: usize,
    pub rect: ProjectedBox,
    pub label: String,
    pub color: BoxColor,
}

impl OverlayBox {
    /// Top-left corner and size of the outline, one pixel outside the box on
    /// the low side so the outline encloses the boundary voxels.
    pub fn outline(&self) -> (i32, i32, u32, u32) {
        let rect = &self.rect;
        let width = (rect.col_max - rect.col_min + 1).max(1) as u32;
        let height = (rect.row_max - rect.row_min + 1).max(1) as u32;
        (rect.col_min - 1, rect.row_min - 1, width, height)
    }

    /// Where the label is placed (column, row)
    pub fn label_anchor(&self) -> (i32, i32) {
        (self.rect.col_max + 5, self.rect.row_max + 5)
    }
}
