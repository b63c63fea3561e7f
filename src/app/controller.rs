use tracing::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::state::EditorState;
use crate::engine::decode::{DecodeEvent, DecodePipeline, DecodedBitmap};
use crate::infra::config::AppConfig;
use crate::picker::{NativePicker, PickOutcome, PickerAdapter};

/// User-facing alert. The only one the app ever shows is the
/// pick-cancellation notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub body: &'static str,
}

impl Notice {
    pub fn pick_cancelled() -> Self {
        Self {
            title: "Seleção Cancelada",
            body: "Nenhuma imagem foi selecionada.",
        }
    }
}

pub struct FilterController {
    state: EditorState,
    picker: Box<dyn PickerAdapter>,
    decode: DecodePipeline,
    bitmap: Option<DecodedBitmap>,
    awaiting_sequence: Option<u64>,
    notice: Option<Notice>,
}

impl FilterController {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_picker(Box::new(NativePicker::new(&config.picker_extensions)))
    }

    pub fn with_picker(picker: Box<dyn PickerAdapter>) -> Self {
        Self {
            state: EditorState::default(),
            picker,
            decode: DecodePipeline::new(),
            bitmap: None,
            awaiting_sequence: None,
            notice: None,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// The decoded pixels of the currently selected image, once ready.
    pub fn bitmap(&self) -> Option<&DecodedBitmap> {
        self.bitmap.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// True while a dialog or a decode is outstanding; the UI keeps
    /// scheduling repaints so the completion gets picked up.
    pub fn is_busy(&self) -> bool {
        self.picker.is_pending() || self.awaiting_sequence.is_some()
    }

    pub fn dispatch(&mut self, event: AppEvent) {
        match event {
            AppEvent::RequestPick => {
                info!("opening native image picker");
                self.picker.request_pick();
            }
            AppEvent::PickFinished(PickOutcome::Selected(image)) => {
                let sequence = self.decode.submit(&image);
                self.awaiting_sequence = Some(sequence);
                self.bitmap = None;
                self.state.image_picked(image);
            }
            AppEvent::PickFinished(PickOutcome::Cancelled) => {
                info!("pick cancelled by the user");
                self.state.pick_cancelled();
                self.notice = Some(Notice::pick_cancelled());
            }
            AppEvent::ApplyFilter => {
                if !self.state.engage_filter() {
                    debug!("apply-filter ignored, no image selected");
                }
            }
        }
    }

    /// Called once per UI frame: converts picker and decode completions
    /// into state updates.
    pub fn pump(&mut self) {
        if let Some(outcome) = self.picker.try_receive() {
            self.dispatch(AppEvent::PickFinished(outcome));
        }

        match self.decode.try_receive() {
            Ok(Some(event)) => {
                // A result for anything but the current selection is stale.
                if self.awaiting_sequence != Some(event.sequence()) {
                    return;
                }
                self.awaiting_sequence = None;
                match event {
                    DecodeEvent::Decoded(bitmap) => {
                        self.bitmap = Some(bitmap);
                    }
                    DecodeEvent::Failed { error, .. } => {
                        // The canvas falls back to the placeholder.
                        warn!(%error, "selected image could not be decoded");
                        self.bitmap = None;
                    }
                }
            }
            Ok(None) => {}
            Err(error) => {
                // No completion can arrive anymore; stop waiting for one.
                warn!(%error, "decode pipeline disconnected");
                self.awaiting_sequence = None;
            }
        }
    }
}
