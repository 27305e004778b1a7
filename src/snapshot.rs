//! Batch output: frames, single slices and slice montages written to image files.

use crate::event::ViewerEvent;
use crate::frame::Frame;
use crate::frame::raster_to_rgb;
use crate::overlay::BoxColor;
use crate::viewer::EventHandler;
use crate::viewer::RenderCommand;
use crate::window::DisplayRange;

use image::GenericImage;
use image::Rgb;
use image::RgbImage;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use ndarray::ArrayView2;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use tracing::info;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Nothing to render")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Display back-end receiving rendered frames.
pub trait FramePresenter {
    type Error;

    fn present(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

/// Writes every presented frame to `<dir>/<prefix>_<nnnn>.png`.
#[derive(Debug)]
pub struct FileSequencePresenter {
    dir: PathBuf,
    prefix: String,
    written: Vec<PathBuf>,
}

impl FileSequencePresenter {
    pub fn new(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Result<Self, SnapshotError> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            prefix: prefix.into(),
            written: Vec::new(),
        })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FramePresenter for FileSequencePresenter {
    type Error = SnapshotError;

    fn present(&mut self, frame: &Frame) -> Result<(), SnapshotError> {
        let path = self
            .dir
            .join(format!("{}_{:04}.png", self.prefix, self.written.len()));
        frame.save(&path)?;
        debug!(path = %path.display(), title = %frame.title, "frame written");
        self.written.push(path);
        Ok(())
    }
}

/// Present the current frame, then feed `events` one at a time, presenting
/// every redraw. Returns the number of frames presented.
pub fn replay<H, P>(
    handler: &mut H,
    events: impl IntoIterator<Item = ViewerEvent>,
    presenter: &mut P,
) -> Result<usize, P::Error>
where
    H: EventHandler,
    P: FramePresenter,
{
    presenter.present(handler.current_frame())?;
    let mut presented = 1;
    for event in events {
        if let RenderCommand::Redraw(frame) = handler.handle_event(event) {
            presenter.present(frame)?;
            presented += 1;
        }
    }
    Ok(presented)
}

/// Save one 2D slice with 2D boxes `[row_min, col_min, row_max, col_max]`
/// outlined in red. Intensities are scaled to the slice's own range.
pub fn save_slice(
    slice: ArrayView2<'_, f32>,
    boxes: &[[i32; 4]],
    path: impl AsRef<Path>,
) -> Result<(), SnapshotError> {
    let range = DisplayRange::of(&slice).ok_or(SnapshotError::Empty)?;
    let mut image = raster_to_rgb(&slice, range);
    for &[row_min, col_min, row_max, col_max] in boxes {
        let width = (col_max - col_min + 1).max(1) as u32;
        let height = (row_max - row_min + 1).max(1) as u32;
        draw_hollow_rect_mut(
            &mut image,
            Rect::at(col_min - 1, row_min - 1).of_size(width, height),
            BoxColor::RED.0,
        );
    }
    image.save(path)?;
    Ok(())
}

/// Tile `slices` row-major into a grid with `ncols` columns and save it.
/// Each tile is scaled to its own intensity range; empty cells stay black.
pub fn save_montage(
    slices: &[ArrayView2<'_, f32>],
    ncols: usize,
    path: impl AsRef<Path>,
) -> Result<(), SnapshotError> {
    let image = montage(slices, ncols)?;
    image.save(path.as_ref())?;
    info!(
        path = %path.as_ref().display(),
        tiles = slices.len(),
        "montage written"
    );
    Ok(())
}

pub fn montage(slices: &[ArrayView2<'_, f32>], ncols: usize) -> Result<RgbImage, SnapshotError> {
    if slices.is_empty() || ncols == 0 {
        return Err(SnapshotError::Empty);
    }
    let tile_height = slices.iter().map(|s| s.nrows()).max().unwrap_or(0) as u32;
    let tile_width = slices.iter().map(|s| s.ncols()).max().unwrap_or(0) as u32;
    if tile_height == 0 || tile_width == 0 {
        return Err(SnapshotError::Empty);
    }

    let nrows = slices.len().div_ceil(ncols) as u32;
    let mut canvas = RgbImage::from_pixel(tile_width * ncols as u32, tile_height * nrows, Rgb([0, 0, 0]));

    for (i, slice) in slices.iter().enumerate() {
        let Some(range) = DisplayRange::of(slice) else {
            continue;
        };
        let tile = raster_to_rgb(slice, range);
        let x = (i % ncols) as u32 * tile_width;
        let y = (i / ncols) as u32 * tile_height;
        canvas.copy_from(&tile, x, y)?;
    }
    Ok(canvas)
}
