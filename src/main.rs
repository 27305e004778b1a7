use ct_bbox_viewer::BoxColor;
use ct_bbox_viewer::Key;
use ct_bbox_viewer::Viewer;
use ct_bbox_viewer::ViewerConfig;
use ct_bbox_viewer::ViewerEvent;
use ct_bbox_viewer::Volume;
use ct_bbox_viewer::WindowMode;
use ct_bbox_viewer::bbox::center_to_bbox;
use ct_bbox_viewer::bbox::extract_subvolume;
use ct_bbox_viewer::snapshot::FileSequencePresenter;
use ct_bbox_viewer::snapshot::replay;
use ct_bbox_viewer::snapshot::save_montage;

use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::Axis;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SHAPE: (usize, usize, usize) = (128, 128, 64);

/// Chest-like phantom in Hounsfield units: air, a soft tissue body, two lungs
/// and a few spherical nodules.
fn phantom(nodules: &[([f64; 3], f64)]) -> Array3<i16> {
    Array3::from_shape_fn(SHAPE, |(i, j, k)| {
        let (y, x) = (i as f64 - 64.0, j as f64 - 64.0);
        let point = [i as f64, j as f64, k as f64];
        let in_nodule = nodules.iter().any(|(center, diameter)| {
            let d2: f64 = (0..3).map(|a| (point[a] - center[a]).powi(2)).sum();
            d2 <= (diameter / 2.0).powi(2)
        });
        let in_lung = ((x.abs() - 26.0) / 18.0).powi(2) + (y / 38.0).powi(2) <= 1.0;
        let in_body = (x / 58.0).powi(2) + (y / 46.0).powi(2) <= 1.0;

        if in_nodule {
            40
        } else if in_lung {
            -850
        } else if in_body {
            30
        } else {
            -1024
        }
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let nodules = [
        ([60.0, 38.0, 20.0], 9.0),
        ([70.0, 92.0, 41.0], 14.0),
        ([40.0, 30.0, 52.0], 6.0),
    ];
    let hu = phantom(&nodules);
    let volume = Volume::from_array(&hu);

    let boxes: Vec<[f64; 6]> = nodules
        .iter()
        .map(|&(center, diameter)| {
            center_to_bbox(center, diameter + 4.0)
                .expect("nodule diameters are positive")
                .to_array()
                .map(f64::from)
        })
        .collect();
    let attributes = vec!["0.91".to_string(), "0.47".to_string(), "+".to_string()];
    let colors = vec![BoxColor::RED, BoxColor::GREEN, "yellow".parse().expect("known color")];

    let config = ViewerConfig::default()
        .with_start_slice(20)
        .with_patient_id("PHANTOM01")
        .with_figure_size(16.0, 16.0);
    let mut viewer = Viewer::with_metadata(&volume, &boxes, attributes, colors, config)
        .expect("should have started a viewer session");

    let mut events: Vec<ViewerEvent> = "ddwzxbbo."
        .chars()
        .filter_map(Key::from_binding)
        .map(ViewerEvent::from)
        .collect();
    events.extend([
        ViewerEvent::Scroll(3),
        ViewerEvent::PointerClick { col: 92.0, row: 70.0 },
        ViewerEvent::Key(Key::SwitchToSagittal),
        ViewerEvent::Key(Key::SetWindow(WindowMode::Wide)),
        ViewerEvent::Scroll(-2),
    ]);

    let mut presenter =
        FileSequencePresenter::new("frames", "view").expect("should have created frames/");
    let presented =
        replay(&mut viewer, events, &mut presenter).expect("should have written frames");
    info!(
        presented,
        plane = ?viewer.state().plane,
        sagittal = viewer.state().sagittal_slice,
        "replay finished"
    );

    let (center, _) = nodules[0];
    let crop_box = center_to_bbox(center, 40.0).expect("diameter is positive");
    let mut crop = extract_subvolume(hu.view(), crop_box.to_array().map(f64::from), -1024)
        .expect("should have cropped around the nodule");
    crop.mapv_inplace(|v| v.clamp(-1024, 300));
    let crop = crop.mapv(f32::from);
    let slices: Vec<ArrayView2<'_, f32>> = crop.axis_iter(Axis(0)).collect();
    save_montage(&slices, 8, "frames/nodule_0_montage.png").expect("should have written montage");
}
