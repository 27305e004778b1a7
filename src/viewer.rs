//! Event-driven axial/sagittal slice viewer.

use crate::config::ViewerConfig;
use crate::enums::Plane;
use crate::enums::WindowMode;
use crate::event::Key;
use crate::event::ViewerEvent;
use crate::frame::Frame;
use crate::overlay::BoxColor;
use crate::overlay::BoxSet;
use crate::overlay::OverlayBox;
use crate::overlay::OverlayError;
use crate::overlay::ProjectedBox;
use crate::volume::Volume;
use crate::window::DisplayRange;

use ndarray::Array2;
use thiserror::Error;
use tracing::debug;
use tracing::info;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Volume is empty")]
    EmptyVolume,

    #[error("Invalid box metadata: {0}")]
    Overlay(#[from] OverlayError),
}

/// Mutable view state, owned by a single viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub plane: Plane,
    pub axial_slice: usize,
    pub sagittal_slice: usize,
    pub window: WindowMode,
    pub overlay_visible: bool,
    pub selected_box: Option<usize>,
}

impl ViewState {
    pub fn cursor(&self, plane: Plane) -> usize {
        match plane {
            Plane::Axial => self.axial_slice,
            Plane::Sagittal => self.sagittal_slice,
        }
    }

    fn set_cursor(&mut self, plane: Plane, index: usize) {
        match plane {
            Plane::Axial => self.axial_slice = index,
            Plane::Sagittal => self.sagittal_slice = index,
        }
    }
}

/// What the presenter has to do after an event.
#[derive(Debug, Clone, Copy)]
pub enum RenderCommand<'a> {
    /// The frame was re-rendered in place
    Redraw(&'a Frame),
    /// Nothing visible changed
    Unchanged,
}

impl RenderCommand<'_> {
    pub fn is_redraw(&self) -> bool {
        matches!(self, RenderCommand::Redraw(_))
    }
}

pub trait EventHandler {
    /// Handle one event to completion, render included.
    fn handle_event(&mut self, event: ViewerEvent) -> RenderCommand<'_>;

    fn current_frame(&self) -> &Frame;
}

/// Interactive viewer over a borrowed volume.
pub struct Viewer<'a> {
    volume: &'a Volume,
    boxes: BoxSet,
    axial_boxes: Vec<ProjectedBox>,
    sagittal_boxes: Vec<ProjectedBox>,
    config: ViewerConfig,
    state: ViewState,
    anchor: DisplayRange,
    frame: Frame,
}

impl<'a> Viewer<'a> {
    /// Start a session and render the first frame, which anchors the display
    /// range for the rest of the session.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::EmptyVolume`] if any volume extent is zero.
    pub fn new(volume: &'a Volume, boxes: BoxSet, config: ViewerConfig) -> Result<Self, ViewerError> {
        let volume_range = volume.value_range().ok_or(ViewerError::EmptyVolume)?;

        let plane = config.initial_plane;
        let start = i64::try_from(config.start_slice).unwrap_or(i64::MAX);
        let state = ViewState {
            plane,
            axial_slice: volume.clamp_index(Plane::Axial, start),
            sagittal_slice: volume.clamp_index(Plane::Sagittal, start),
            window: WindowMode::default(),
            overlay_visible: true,
            selected_box: None,
        };

        let first_slice = volume
            .get_slice_from_axis(state.cursor(plane), plane)
            .ok_or(ViewerError::EmptyVolume)?;
        let anchor = DisplayRange::anchor(&first_slice, volume_range, config.noise_seed);

        let project = |plane: Plane| -> Vec<ProjectedBox> {
            let scale = volume.column_scale(plane);
            boxes
                .boxes()
                .iter()
                .map(|bbox| ProjectedBox::project(bbox, plane, scale))
                .collect()
        };
        let axial_boxes = project(Plane::Axial);
        let sagittal_boxes = project(Plane::Sagittal);

        info!(
            shape = ?volume.shape(),
            boxes = boxes.len(),
            ?plane,
            low = anchor.low,
            high = anchor.high,
            "viewer session started"
        );

        let frame = Frame {
            plane,
            slice_index: state.cursor(plane),
            window: state.window,
            title: String::new(),
            raster: Array2::zeros(volume.display_dim(plane)),
            display_range: anchor,
            overlays: Vec::new(),
            figure_size: config.figure_size,
        };

        let mut viewer = Self {
            volume,
            boxes,
            axial_boxes,
            sagittal_boxes,
            config,
            state,
            anchor,
            frame,
        };
        viewer.render();
        Ok(viewer)
    }

    /// Validate parallel metadata lists and start a session.
    pub fn with_metadata(
        volume: &'a Volume,
        boxes: &[[f64; 6]],
        attributes: Vec<String>,
        colors: Vec<BoxColor>,
        config: ViewerConfig,
    ) -> Result<Self, ViewerError> {
        let boxes = BoxSet::new(boxes, attributes, colors)?;
        Self::new(volume, boxes, config)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn anchor(&self) -> DisplayRange {
        self.anchor
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn boxes(&self) -> &BoxSet {
        &self.boxes
    }

    /// Projections of every box onto `plane`, in box order
    pub fn projected_boxes(&self, plane: Plane) -> &[ProjectedBox] {
        match plane {
            Plane::Axial => &self.axial_boxes,
            Plane::Sagittal => &self.sagittal_boxes,
        }
    }

    fn render(&mut self) {
        let plane = self.state.plane;
        let index = self.state.cursor(plane);
        let window = self.state.window;
        let anchor = self.anchor;

        if !self
            .volume
            .sample_display_slice(index, plane, &mut self.frame.raster)
        {
            return;
        }
        if window.params().is_some() {
            self.frame
                .raster
                .par_mapv_inplace(|value| window.apply(value, anchor));
        }

        self.frame.overlays.clear();
        if self.state.overlay_visible {
            let projected = match plane {
                Plane::Axial => &self.axial_boxes,
                Plane::Sagittal => &self.sagittal_boxes,
            };
            let boxes = &self.boxes;
            self.frame.overlays.extend(
                projected
                    .iter()
                    .enumerate()
                    .filter(|(_, rect)| rect.intersects_slice(index))
                    .map(|(i, rect)| OverlayBox {
                        index: i,
                        rect: *rect,
                        label: boxes.label(i),
                        color: boxes.color(i),
                    }),
            );
        }

        self.frame.plane = plane;
        self.frame.slice_index = index;
        self.frame.window = window;
        self.frame.display_range = anchor;
        self.frame.title = format!(
            "patientID={}, {}={}",
            self.config.patient_id.as_deref().unwrap_or("unknown"),
            plane.label(),
            index
        );

        debug!(
            ?plane,
            index,
            ?window,
            visible_boxes = self.frame.overlays.len(),
            "rendered frame"
        );
    }

    fn move_cursor(&mut self, offset: i64) {
        let plane = self.state.plane;
        let target = (self.state.cursor(plane) as i64).saturating_add(offset);
        let index = self.volume.clamp_index(plane, target);
        self.state.set_cursor(plane, index);
        self.render();
    }

    fn jump_to_box(&mut self, box_index: usize) {
        let plane = self.state.plane;
        let Some(rect) = self.projected_boxes(plane).get(box_index) else {
            return;
        };
        let index = self.volume.clamp_index(plane, rect.depth_midpoint());
        self.state.selected_box = Some(box_index);
        self.state.set_cursor(plane, index);
        self.render();
    }

    /// The first press only selects box 0; later presses advance and jump.
    fn next_box(&mut self) -> bool {
        if self.boxes.is_empty() {
            return false;
        }
        match self.state.selected_box {
            None => {
                self.state.selected_box = Some(0);
                false
            }
            Some(current) => {
                self.jump_to_box((current + 1).min(self.boxes.len() - 1));
                true
            }
        }
    }

    fn previous_box(&mut self) -> bool {
        match self.state.selected_box {
            None => false,
            Some(current) => {
                self.jump_to_box(current.saturating_sub(1));
                true
            }
        }
    }

    /// Move the inactive plane's cursor to the clicked column.
    fn pick(&mut self, col: f64) {
        let plane = self.state.plane;
        let target = plane.other();
        let index = match plane {
            // Axial columns are dim1, which is the sagittal slice index.
            Plane::Axial => col as i64,
            // Sagittal columns are dim2 stretched by shape[0] / shape[2].
            Plane::Sagittal => (col / self.volume.column_scale(plane)) as i64,
        };
        let index = self.volume.clamp_index(target, index);
        self.state.set_cursor(target, index);
    }

    fn switch_plane(&mut self, plane: Plane) {
        self.state.plane = plane;
        self.render();
    }
}

impl EventHandler for Viewer<'_> {
    fn handle_event(&mut self, event: ViewerEvent) -> RenderCommand<'_> {
        debug!(?event, "handling event");
        let redraw = match event {
            ViewerEvent::Scroll(delta) => {
                self.move_cursor(i64::from(delta).saturating_mul(self.config.scroll_step));
                true
            }
            ViewerEvent::Key(Key::StepForward) => {
                self.move_cursor(self.config.key_step);
                true
            }
            ViewerEvent::Key(Key::StepBackward) => {
                self.move_cursor(self.config.key_step.saturating_neg());
                true
            }
            ViewerEvent::Key(Key::NextBox) => self.next_box(),
            ViewerEvent::Key(Key::PreviousBox) => self.previous_box(),
            ViewerEvent::Key(Key::ToggleOverlay) => {
                self.state.overlay_visible = !self.state.overlay_visible;
                self.render();
                true
            }
            ViewerEvent::Key(Key::SetWindow(mode)) => {
                self.state.window = mode;
                self.render();
                true
            }
            ViewerEvent::Key(Key::SwitchToAxial) => {
                self.switch_plane(Plane::Axial);
                true
            }
            ViewerEvent::Key(Key::SwitchToSagittal) => {
                self.switch_plane(Plane::Sagittal);
                true
            }
            ViewerEvent::PointerClick { col, row } => {
                self.pick(col);
                debug!(col, row, state = ?self.state, "cross-plane pick");
                false
            }
        };

        if redraw {
            RenderCommand::Redraw(&self.frame)
        } else {
            RenderCommand::Unchanged
        }
    }

    fn current_frame(&self) -> &Frame {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    /// 40 x 30 x 20 volume holding `10 * dim2 - 1000 + dim0 + dim1`.
    fn layered_volume() -> Volume {
        Volume::new(Array3::from_shape_fn((40, 30, 20), |(i, j, k)| {
            (k * 10) as f32 - 1000.0 + (i + j) as f32
        }))
    }

    fn boxes() -> BoxSet {
        BoxSet::new(
            &[
                [5.0, 5.0, 10.0, 10.0, 10.0, 15.0],
                [20.0, 12.0, 2.0, 30.0, 20.0, 6.0],
                [0.0, 0.0, 16.0, 3.0, 3.0, 19.0],
            ],
            vec!["a".into(), "b".into(), "c".into()],
            vec![BoxColor::RED, BoxColor::GREEN, BoxColor::YELLOW],
        )
        .unwrap()
    }

    fn key(key: Key) -> ViewerEvent {
        ViewerEvent::Key(key)
    }

    #[test]
    fn test_initial_state() {
        let volume = layered_volume();
        let viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(12)).unwrap();
        let state = viewer.state();
        assert_eq!(state.plane, Plane::Axial);
        assert_eq!(state.window, WindowMode::Wide);
        assert_eq!(state.axial_slice, 12);
        assert_eq!(state.sagittal_slice, 12);
        assert!(state.overlay_visible);
        assert_eq!(state.selected_box, None);
        assert_eq!(viewer.frame().dim(), (40, 30));
        assert_eq!(viewer.frame().title, "patientID=unknown, z=12");
    }

    #[test]
    fn test_start_slice_is_clamped_per_plane() {
        let volume = layered_volume();
        let viewer = Viewer::new(&volume, BoxSet::default(), ViewerConfig::default().with_start_slice(25)).unwrap();
        assert_eq!(viewer.state().axial_slice, 19);
        assert_eq!(viewer.state().sagittal_slice, 25);
    }

    #[test]
    fn test_start_on_sagittal_plane() {
        let volume = layered_volume();
        let config = ViewerConfig::default()
            .with_initial_plane(Plane::Sagittal)
            .with_start_slice(5);
        let viewer = Viewer::new(&volume, boxes(), config).unwrap();

        assert_eq!(viewer.state().plane, Plane::Sagittal);
        assert_eq!(viewer.state().sagittal_slice, 5);
        assert_eq!(viewer.state().axial_slice, 5);
        assert_eq!(viewer.frame().plane, Plane::Sagittal);
        assert_eq!(viewer.frame().dim(), (40, 40));
        assert_eq!(viewer.frame().title, "patientID=unknown, y=5");
        // vol[:, 5, :] spans -1000 + 5 at (0, 0) to 190 - 1000 + 39 + 5 at (39, 19).
        assert_eq!(viewer.anchor(), DisplayRange { low: -995.0, high: -766.0 });
    }

    #[test]
    fn test_constant_first_sagittal_slice_anchors_on_noise() {
        let mut data = Array3::from_elem((16, 12, 8), -1000.0f32);
        data[[3, 7, 2]] = 400.0;
        let volume = Volume::new(data);
        let config = ViewerConfig::default()
            .with_initial_plane(Plane::Sagittal)
            .with_start_slice(5)
            .with_noise_seed(42);

        let viewer = Viewer::new(&volume, BoxSet::default(), config.clone()).unwrap();
        let anchor = viewer.anchor();
        assert!(!anchor.is_degenerate());
        assert!(anchor.low >= -1000.0 && anchor.high <= 400.0);

        // The frame still shows the real, constant slice.
        let shown = WindowMode::Wide.apply(-1000.0, anchor);
        assert!(viewer.frame().raster.iter().all(|&v| (v - shown).abs() < 1e-3));

        let again = Viewer::new(&volume, BoxSet::default(), config).unwrap();
        assert_eq!(again.anchor(), anchor);
    }

    #[test]
    fn test_huge_start_slice_clamps_to_last() {
        let volume = layered_volume();
        let config = ViewerConfig::default().with_start_slice(usize::MAX);
        let viewer = Viewer::new(&volume, BoxSet::default(), config).unwrap();
        assert_eq!(viewer.state().axial_slice, 19);
        assert_eq!(viewer.state().sagittal_slice, 29);
    }

    #[test]
    fn test_huge_steps_saturate() {
        let volume = layered_volume();
        let config = ViewerConfig::default()
            .with_start_slice(10)
            .with_steps(i64::MAX / 2, i64::MAX);
        let mut viewer = Viewer::new(&volume, BoxSet::default(), config).unwrap();

        viewer.handle_event(ViewerEvent::Scroll(3));
        assert_eq!(viewer.state().axial_slice, 19);
        viewer.handle_event(ViewerEvent::Scroll(-3));
        assert_eq!(viewer.state().axial_slice, 0);
        viewer.handle_event(key(Key::StepForward));
        assert_eq!(viewer.state().axial_slice, 19);
        viewer.handle_event(key(Key::StepBackward));
        assert_eq!(viewer.state().axial_slice, 0);
    }

    #[test]
    fn test_empty_volume_is_rejected() {
        let volume = Volume::new(Array3::zeros((4, 0, 3)));
        assert!(matches!(
            Viewer::new(&volume, BoxSet::default(), ViewerConfig::default()),
            Err(ViewerError::EmptyVolume)
        ));
    }

    #[test]
    fn test_metadata_length_mismatch_fails_fast() {
        let volume = layered_volume();
        let result = Viewer::with_metadata(
            &volume,
            &[[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]],
            vec![],
            vec![BoxColor::RED, BoxColor::GREEN],
            ViewerConfig::default(),
        );
        assert!(matches!(
            result,
            Err(ViewerError::Overlay(OverlayError::ColorCountMismatch { boxes: 1, colors: 2 }))
        ));
    }

    #[test]
    fn test_scroll_clamps_without_wrapping() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(18)).unwrap();
        assert!(viewer.handle_event(ViewerEvent::Scroll(5)).is_redraw());
        assert_eq!(viewer.state().axial_slice, 19);
        viewer.handle_event(ViewerEvent::Scroll(1));
        assert_eq!(viewer.state().axial_slice, 19);
        viewer.handle_event(ViewerEvent::Scroll(-100));
        assert_eq!(viewer.state().axial_slice, 0);
    }

    #[test]
    fn test_scroll_step_scales_delta() {
        let volume = layered_volume();
        let config = ViewerConfig::default().with_start_slice(2).with_steps(3, 4);
        let mut viewer = Viewer::new(&volume, boxes(), config).unwrap();
        viewer.handle_event(ViewerEvent::Scroll(2));
        assert_eq!(viewer.state().axial_slice, 8);
    }

    #[test]
    fn test_step_keys_use_coarse_step() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(5)).unwrap();
        viewer.handle_event(key(Key::StepForward));
        assert_eq!(viewer.state().axial_slice, 9);
        viewer.handle_event(key(Key::StepBackward));
        viewer.handle_event(key(Key::StepBackward));
        assert_eq!(viewer.state().axial_slice, 1);
        viewer.handle_event(key(Key::StepBackward));
        assert_eq!(viewer.state().axial_slice, 0);
    }

    #[test]
    fn test_overlay_uses_half_open_depth() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(9)).unwrap();
        let visible = |viewer: &Viewer<'_>| -> Vec<usize> {
            viewer.frame().overlays.iter().map(|o| o.index).collect()
        };

        assert!(!visible(&viewer).contains(&0));
        for _ in 10..15 {
            viewer.handle_event(ViewerEvent::Scroll(1));
            assert!(visible(&viewer).contains(&0), "cursor {}", viewer.state().axial_slice);
        }
        viewer.handle_event(ViewerEvent::Scroll(1));
        assert_eq!(viewer.state().axial_slice, 15);
        assert!(!visible(&viewer).contains(&0));
    }

    #[test]
    fn test_overlay_labels_and_colors() {
        let volume = layered_volume();
        let viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(3)).unwrap();
        let overlays = &viewer.frame().overlays;
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].index, 1);
        assert_eq!(overlays[0].label, "1:b");
        assert_eq!(overlays[0].color, BoxColor::GREEN);
    }

    #[test]
    fn test_toggle_overlay_keeps_cursor() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(12)).unwrap();
        assert_eq!(viewer.frame().overlays.len(), 1);

        viewer.handle_event(key(Key::ToggleOverlay));
        assert!(!viewer.state().overlay_visible);
        assert!(viewer.frame().overlays.is_empty());
        assert_eq!(viewer.state().axial_slice, 12);

        viewer.handle_event(key(Key::ToggleOverlay));
        assert_eq!(viewer.frame().overlays.len(), 1);
    }

    #[test]
    fn test_empty_box_list_draws_nothing() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, BoxSet::default(), ViewerConfig::default()).unwrap();
        assert!(viewer.frame().overlays.is_empty());
        assert!(!viewer.handle_event(key(Key::NextBox)).is_redraw());
        assert!(!viewer.handle_event(key(Key::PreviousBox)).is_redraw());
        assert_eq!(viewer.state().selected_box, None);
    }

    #[test]
    fn test_first_next_box_press_only_arms() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(0)).unwrap();

        assert!(!viewer.handle_event(key(Key::NextBox)).is_redraw());
        assert_eq!(viewer.state().selected_box, Some(0));
        assert_eq!(viewer.state().axial_slice, 0);

        assert!(viewer.handle_event(key(Key::NextBox)).is_redraw());
        assert_eq!(viewer.state().selected_box, Some(1));
        assert_eq!(viewer.state().axial_slice, 4);
    }

    #[test]
    fn test_box_navigation_clamps_at_both_ends() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default()).unwrap();
        for _ in 0..6 {
            viewer.handle_event(key(Key::NextBox));
        }
        assert_eq!(viewer.state().selected_box, Some(2));
        assert_eq!(viewer.state().axial_slice, 17);

        for _ in 0..6 {
            viewer.handle_event(key(Key::PreviousBox));
        }
        assert_eq!(viewer.state().selected_box, Some(0));
        assert_eq!(viewer.state().axial_slice, 12);
    }

    #[test]
    fn test_previous_box_without_selection_is_noop() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(7)).unwrap();
        assert!(!viewer.handle_event(key(Key::PreviousBox)).is_redraw());
        assert_eq!(viewer.state().selected_box, None);
        assert_eq!(viewer.state().axial_slice, 7);
    }

    #[test]
    fn test_box_jump_on_sagittal_uses_dim1_depth() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default()).unwrap();
        viewer.handle_event(key(Key::SwitchToSagittal));
        viewer.handle_event(key(Key::NextBox));
        viewer.handle_event(key(Key::NextBox));
        assert_eq!(viewer.state().sagittal_slice, 16);
        assert_eq!(viewer.state().axial_slice, 0);
    }

    #[test]
    fn test_switching_planes_keeps_both_cursors() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(4)).unwrap();
        viewer.handle_event(ViewerEvent::Scroll(3));
        viewer.handle_event(key(Key::SwitchToSagittal));
        assert_eq!(viewer.frame().plane, Plane::Sagittal);
        assert_eq!(viewer.frame().dim(), (40, 40));
        assert_eq!(viewer.frame().title, "patientID=unknown, y=4");

        viewer.handle_event(ViewerEvent::Scroll(10));
        assert_eq!(viewer.state().sagittal_slice, 14);
        assert_eq!(viewer.state().axial_slice, 7);

        viewer.handle_event(key(Key::SwitchToAxial));
        assert_eq!(viewer.frame().slice_index, 7);
        assert_eq!(viewer.frame().dim(), (40, 30));
    }

    #[test]
    fn test_sagittal_scroll_clamps_to_dim1() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default()).unwrap();
        viewer.handle_event(key(Key::SwitchToSagittal));
        viewer.handle_event(ViewerEvent::Scroll(1000));
        assert_eq!(viewer.state().sagittal_slice, 29);
    }

    #[test]
    fn test_sagittal_overlay_projection() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(6)).unwrap();
        viewer.handle_event(key(Key::SwitchToSagittal));
        let overlays = &viewer.frame().overlays;
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].index, 0);
        // dim2 extent [10, 15) stretched by 40 / 20
        assert_eq!((overlays[0].rect.col_min, overlays[0].rect.col_max), (20, 30));
        assert_eq!((overlays[0].rect.row_min, overlays[0].rect.row_max), (5, 10));
    }

    #[test]
    fn test_pointer_click_moves_inactive_cursor() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(3)).unwrap();

        let command = viewer.handle_event(ViewerEvent::PointerClick { col: 17.6, row: 2.0 });
        assert!(!command.is_redraw());
        assert_eq!(viewer.state().sagittal_slice, 17);
        assert_eq!(viewer.state().axial_slice, 3);

        viewer.handle_event(key(Key::SwitchToSagittal));
        viewer.handle_event(ViewerEvent::PointerClick { col: 30.0, row: 8.0 });
        assert_eq!(viewer.state().axial_slice, 15);

        viewer.handle_event(ViewerEvent::PointerClick { col: 500.0, row: 8.0 });
        assert_eq!(viewer.state().axial_slice, 19);
    }

    #[test]
    fn test_window_mode_changes_mapping_not_cursor() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(10)).unwrap();
        let wide = viewer.frame().raster.clone();

        viewer.handle_event(key(Key::SetWindow(WindowMode::Raw)));
        assert_eq!(viewer.state().axial_slice, 10);
        assert_eq!(viewer.frame().window, WindowMode::Raw);
        assert_eq!(viewer.frame().raster[[0, 0]], -900.0);
        assert_ne!(viewer.frame().raster, wide);

        viewer.handle_event(key(Key::SetWindow(WindowMode::Narrow)));
        // -900 is below the narrow floor, so it maps to the anchor minimum.
        assert_eq!(viewer.frame().raster[[0, 0]], viewer.anchor().low);
    }

    #[test]
    fn test_anchor_is_fixed_by_first_frame() {
        let volume = layered_volume();
        let mut viewer = Viewer::new(&volume, boxes(), ViewerConfig::default().with_start_slice(0)).unwrap();
        let anchor = viewer.anchor();
        assert_eq!(anchor, DisplayRange { low: -1000.0, high: -932.0 });

        viewer.handle_event(key(Key::StepForward));
        viewer.handle_event(key(Key::SetWindow(WindowMode::Narrow)));
        assert_eq!(viewer.anchor(), anchor);
        assert_eq!(viewer.frame().display_range, anchor);
    }

    #[test]
    fn test_constant_first_slice_does_not_crash() {
        let mut data = Array3::from_elem((16, 16, 4), -1000.0f32);
        data[[3, 3, 2]] = 400.0;
        let volume = Volume::new(data);
        let mut viewer = Viewer::new(&volume, BoxSet::default(), ViewerConfig::default()).unwrap();
        assert!(!viewer.anchor().is_degenerate());
        assert!(viewer.frame().raster.iter().all(|v| v.is_finite()));

        viewer.handle_event(ViewerEvent::Scroll(2));
        assert!(viewer.frame().raster.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_constant_volume_renders() {
        let volume = Volume::new(Array3::from_elem((8, 8, 8), 5.0f32));
        let viewer = Viewer::new(&volume, BoxSet::default(), ViewerConfig::default()).unwrap();
        assert!(viewer.anchor().is_degenerate());
        let image = viewer.frame().to_image();
        assert_eq!(image.dimensions(), (8, 8));
    }

    #[test]
    fn test_viewers_are_independent() {
        let volume = layered_volume();
        let mut first = Viewer::new(&volume, boxes(), ViewerConfig::default()).unwrap();
        let second = Viewer::new(&volume, boxes(), ViewerConfig::default()).unwrap();
        first.handle_event(ViewerEvent::Scroll(5));
        assert_eq!(first.state().axial_slice, 5);
        assert_eq!(second.state().axial_slice, 0);
    }

    #[test]
    fn test_patient_id_in_title() {
        let volume = layered_volume();
        let viewer = Viewer::new(
            &volume,
            boxes(),
            ViewerConfig::default().with_patient_id("CT590466").with_start_slice(2),
        )
        .unwrap();
        assert_eq!(viewer.frame().title, "patientID=CT590466, z=2");
    }
}
