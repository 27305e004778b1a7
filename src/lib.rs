//! # CT bounding-box viewer
//!
//! This crate helps validating lesion and nodule detectors on CT volumes. It
//! has two parts:
//!
//!  - Bounding-box geometry: conversions between boxes
//!    (`[min0, min1, min2, max0, max1, max2]`) and center/diameter pairs,
//!    rounding onto the voxel grid and extraction of padded sub-volumes.
//!  - An event-driven slice viewer: a volume is browsed on the axial plane
//!    (slices along dim2) or the sagittal plane (slices along dim1) with
//!    intensity windowing and box overlays. Input arrives as discrete
//!    [`ViewerEvent`]s and every event is answered with a [`RenderCommand`],
//!    so any UI back-end can drive it.
//!
//! Volumes are assumed to be loaded already; the viewer borrows them
//! read-only. Frames can be written to disk for batch review.
//!
//! # Examples
//!
//! ## Cropping a nodule with padding
//!
//! ```
//! # use ct_bbox_viewer::bbox::{center_to_bbox, extract_subvolume};
//! # use ndarray::Array3;
//! let volume = Array3::<i16>::zeros((100, 100, 50));
//! let bbox = center_to_bbox([2.0, 50.0, 25.0], 10.0).unwrap();
//! let crop = extract_subvolume(volume.view(), bbox.to_array().map(f64::from), -1024)
//!     .expect("should have cropped the volume");
//! assert_eq!(crop.dim(), (10, 10, 10));
//! ```
//!
//! ## Browsing a volume
//!
//! ```
//! # use ct_bbox_viewer::{BoxSet, EventHandler, Key, Viewer, ViewerConfig, ViewerEvent, Volume};
//! # use ndarray::Array3;
//! let volume = Volume::new(Array3::from_shape_fn((64, 64, 32), |(i, j, k)| (i + j + k) as f32));
//! let boxes = BoxSet::from_boxes(&[[10.0, 10.0, 4.0, 20.0, 20.0, 12.0]]);
//! let mut viewer = Viewer::new(&volume, boxes, ViewerConfig::default().with_start_slice(8))
//!     .expect("should have started a session");
//! viewer.handle_event(ViewerEvent::Scroll(2));
//! viewer.handle_event(ViewerEvent::Key(Key::SwitchToSagittal));
//! assert_eq!(viewer.state().axial_slice, 10);
//! ```

pub mod bbox;
pub mod config;
pub mod enums;
pub mod event;
pub mod frame;
mod interpolator;
pub mod overlay;
pub mod snapshot;
pub mod viewer;
pub mod volume;
pub mod window;

pub use bbox::{BBox, Diameter, GeometryError};
pub use config::ViewerConfig;
pub use enums::{Plane, WindowMode};
pub use event::{Key, ViewerEvent};
pub use frame::Frame;
pub use overlay::{BoxColor, BoxSet, OverlayError};
pub use viewer::{EventHandler, RenderCommand, ViewState, Viewer, ViewerError};
pub use volume::Volume;
