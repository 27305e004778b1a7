use crate::enums::Plane;
use crate::enums::WindowMode;
use crate::overlay::OverlayBox;
use crate::window::DisplayRange;

use ab_glyph::FontRef;
use ab_glyph::PxScale;
use image::ImageResult;
use image::Rgb;
use image::RgbImage;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::drawing::draw_text_mut;
use imageproc::rect::Rect;
use ndarray::Array2;
use ndarray::ArrayView2;
use std::path::Path;
use tracing::warn;

const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");
const LABEL_SIZE: f32 = 12.0;
const TITLE_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Everything a presenter needs to draw the current view.
///
/// A viewer owns exactly one frame and updates it in place on every render.
#[derive(Debug, Clone)]
pub struct Frame {
    pub plane: Plane,
    pub slice_index: usize,
    pub window: WindowMode,
    pub title: String,
    /// Windowed display intensities, (rows, columns)
    pub raster: Array2<f32>,
    /// Range mapped to black..white
    pub display_range: DisplayRange,
    pub overlays: Vec<OverlayBox>,
    /// Cosmetic figure size in inches, passed through untouched
    pub figure_size: (f32, f32),
}

impl Frame {
    pub fn dim(&self) -> (usize, usize) {
        self.raster.dim()
    }

    /// Rasterize to RGB with box outlines and labels drawn in their colors
    /// and the title in the top-left corner.
    pub fn to_image(&self) -> RgbImage {
        let mut image = raster_to_rgb(&self.raster.view(), self.display_range);
        for overlay in &self.overlays {
            let (x, y, width, height) = overlay.outline();
            draw_hollow_rect_mut(
                &mut image,
                Rect::at(x, y).of_size(width, height),
                overlay.color.0,
            );
        }

        let font = match FontRef::try_from_slice(FONT_DATA) {
            Ok(font) => font,
            Err(err) => {
                warn!(%err, "failed to load label font, drawing outlines only");
                return image;
            }
        };
        let scale = PxScale::from(LABEL_SIZE);
        for overlay in &self.overlays {
            let (x, y) = overlay.label_anchor();
            draw_text_mut(&mut image, overlay.color.0, x, y, scale, &font, &overlay.label);
        }
        if !self.title.is_empty() {
            draw_text_mut(&mut image, TITLE_COLOR, 2, 2, scale, &font, &self.title);
        }
        image
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.to_image().save(path)
    }
}

pub(crate) fn raster_to_rgb(raster: &ArrayView2<'_, f32>, range: DisplayRange) -> RgbImage {
    let (height, width) = raster.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let value = range.normalize_to_u8(raster[[y as usize, x as usize]]);
        Rgb([value, value, value])
    })
}
