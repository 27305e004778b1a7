use crate::enums::WindowMode;

/// Discrete key commands understood by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    StepForward,
    StepBackward,
    NextBox,
    PreviousBox,
    ToggleOverlay,
    SetWindow(WindowMode),
    SwitchToAxial,
    SwitchToSagittal,
}

impl Key {
    /// Default keyboard layout.
    ///
    /// `w`/`x` step, `d`/`a` next/previous box, `b` overlay, `f`/`z`/`o`
    /// wide/narrow/raw window, `.`/`,` axial/sagittal.
    pub fn from_binding(key: char) -> Option<Key> {
        let key = match key {
            'w' => Key::StepForward,
            'x' => Key::StepBackward,
            'd' => Key::NextBox,
            'a' => Key::PreviousBox,
            'b' => Key::ToggleOverlay,
            'f' => Key::SetWindow(WindowMode::Wide),
            'z' => Key::SetWindow(WindowMode::Narrow),
            'o' => Key::SetWindow(WindowMode::Raw),
            '.' => Key::SwitchToAxial,
            ',' => Key::SwitchToSagittal,
            _ => return None,
        };
        Some(key)
    }
}

/// Input delivered to the viewer, independent of the UI back-end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    /// Wheel notches, positive forward
    Scroll(i32),
    Key(Key),
    /// Click in displayed pixel coordinates of the current frame
    PointerClick { col: f64, row: f64 },
}

impl From<Key> for ViewerEvent {
    fn from(key: Key) -> Self {
        ViewerEvent::Key(key)
    }
}
