use std::path::{Path, PathBuf};

use crate::infra::error::AppError;

/// Opaque reference to a selected image on the device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(PathBuf);

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(AppError::InvalidInput(
                "image reference must not be empty".to_string(),
            ));
        }
        Ok(Self(path))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loaded,
    Filtered,
}

/// The whole editor state: the selected image, if any, and whether the
/// saturation-boost filter is composited onto the render. All mutation
/// goes through the three transitions below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    selected_image: Option<ImageRef>,
    filter_engaged: bool,
}

impl EditorState {
    pub fn selected_image(&self) -> Option<&ImageRef> {
        self.selected_image.as_ref()
    }

    pub fn filter_engaged(&self) -> bool {
        self.filter_engaged
    }

    pub fn phase(&self) -> Phase {
        match (&self.selected_image, self.filter_engaged) {
            (None, _) => Phase::Empty,
            (Some(_), false) => Phase::Loaded,
            (Some(_), true) => Phase::Filtered,
        }
    }

    /// A pick completed. The filter never carries over to a fresh image.
    pub fn image_picked(&mut self, image: ImageRef) {
        self.selected_image = Some(image);
        self.filter_engaged = false;
    }

    /// A pick was abandoned; nothing changes.
    pub fn pick_cancelled(&mut self) {}

    /// Engages the filter. One-directional: there is no disengage
    /// transition, only picking a new image resets it. Returns whether the
    /// action applied (it is a no-op without a selected image).
    pub fn engage_filter(&mut self) -> bool {
        if self.selected_image.is_none() {
            return false;
        }
        self.filter_engaged = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(path: &str) -> ImageRef {
        ImageRef::new(path).expect("test path should be valid")
    }

    #[test]
    fn image_ref_rejects_empty_path() {
        assert!(matches!(ImageRef::new(""), Err(AppError::InvalidInput(_))));
        assert!(ImageRef::new("/tmp/a.jpg").is_ok());
    }

    #[test]
    fn initial_state_is_empty() {
        let state = EditorState::default();
        assert_eq!(state.phase(), Phase::Empty);
        assert!(state.selected_image().is_none());
        assert!(!state.filter_engaged());
    }

    #[test]
    fn pick_moves_empty_to_loaded() {
        let mut state = EditorState::default();
        state.image_picked(image("/tmp/r1.jpg"));
        assert_eq!(state.phase(), Phase::Loaded);
        assert_eq!(state.selected_image(), Some(&image("/tmp/r1.jpg")));
        assert!(!state.filter_engaged());
    }

    #[test]
    fn engage_filter_moves_loaded_to_filtered() {
        let mut state = EditorState::default();
        state.image_picked(image("/tmp/r1.jpg"));
        assert!(state.engage_filter());
        assert_eq!(state.phase(), Phase::Filtered);
        assert!(state.filter_engaged());
    }

    #[test]
    fn engage_filter_without_image_has_no_effect() {
        let mut state = EditorState::default();
        assert!(!state.engage_filter());
        assert_eq!(state, EditorState::default());
    }

    #[test]
    fn engage_filter_is_idempotent() {
        let mut state = EditorState::default();
        state.image_picked(image("/tmp/r1.jpg"));
        assert!(state.engage_filter());
        let once = state.clone();
        assert!(state.engage_filter());
        assert_eq!(state, once);
    }

    #[test]
    fn fresh_pick_resets_filter() {
        let mut state = EditorState::default();
        state.image_picked(image("/tmp/r1.jpg"));
        state.engage_filter();
        assert_eq!(state.phase(), Phase::Filtered);

        state.image_picked(image("/tmp/r2.jpg"));
        assert_eq!(state.phase(), Phase::Loaded);
        assert_eq!(state.selected_image(), Some(&image("/tmp/r2.jpg")));
        assert!(!state.filter_engaged());
    }

    #[test]
    fn filter_is_false_after_any_successful_pick() {
        // Regardless of the prior value of the flag.
        for engage_first in [false, true] {
            let mut state = EditorState::default();
            state.image_picked(image("/tmp/r1.jpg"));
            if engage_first {
                state.engage_filter();
            }
            state.image_picked(image("/tmp/r2.jpg"));
            assert!(!state.filter_engaged());
        }
    }

    #[test]
    fn cancellation_leaves_state_untouched() {
        let mut state = EditorState::default();
        state.pick_cancelled();
        assert_eq!(state, EditorState::default());

        state.image_picked(image("/tmp/r1.jpg"));
        let before = state.clone();
        state.pick_cancelled();
        assert_eq!(state, before);
    }
}
