use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use tracing::{info, warn};

use crate::app::state::ImageRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Selected(ImageRef),
    Cancelled,
}

/// Port to the platform's media-selection UI. One attempt per request, no
/// retry; the outcome arrives asynchronously through `try_receive`.
pub trait PickerAdapter {
    fn request_pick(&mut self);

    fn try_receive(&mut self) -> Option<PickOutcome>;

    fn is_pending(&self) -> bool;
}

type DialogFn = dyn Fn(&[String]) -> Option<PathBuf> + Send + Sync;

/// Runs the native file dialog on its own thread so the UI stays
/// interactive for the unbounded time the dialog is foregrounded.
pub struct NativePicker {
    extensions: Vec<String>,
    dialog: Arc<DialogFn>,
    result_tx: mpsc::Sender<PickOutcome>,
    result_rx: mpsc::Receiver<PickOutcome>,
    pending: bool,
}

impl NativePicker {
    pub fn new(extensions: &[String]) -> Self {
        Self::with_dialog(extensions, Arc::new(native_dialog))
    }

    fn with_dialog(extensions: &[String], dialog: Arc<DialogFn>) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        Self {
            extensions: extensions.to_vec(),
            dialog,
            result_tx,
            result_rx,
            pending: false,
        }
    }
}

fn native_dialog(extensions: &[String]) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new().set_title("Selecionar Imagem");
    if let Some(filter) = dialog_filter(extensions) {
        dialog = dialog.add_filter("Imagens", &filter);
    }
    dialog.pick_file()
}

/// An empty filter list on some backends yields a dialog in which nothing
/// is selectable; leave the dialog unfiltered instead.
fn dialog_filter(extensions: &[String]) -> Option<Vec<&str>> {
    if extensions.is_empty() {
        return None;
    }
    Some(extensions.iter().map(String::as_str).collect())
}

impl PickerAdapter for NativePicker {
    fn request_pick(&mut self) {
        // Only one dialog at a time; further taps are ignored until the
        // pending one resolves.
        if self.pending {
            return;
        }
        self.pending = true;

        let tx = self.result_tx.clone();
        let dialog = Arc::clone(&self.dialog);
        let extensions = self.extensions.clone();
        thread::spawn(move || {
            let outcome = match (*dialog)(&extensions) {
                Some(path) => match ImageRef::new(path) {
                    Ok(image) => {
                        info!(path = %image.path().display(), "image selected");
                        PickOutcome::Selected(image)
                    }
                    Err(error) => {
                        warn!(%error, "picker returned an unusable path");
                        PickOutcome::Cancelled
                    }
                },
                None => PickOutcome::Cancelled,
            };
            // The receiver disappearing just means the app is shutting down.
            let _ = tx.send(outcome);
        });
    }

    fn try_receive(&mut self) -> Option<PickOutcome> {
        match self.result_rx.try_recv() {
            Ok(outcome) => {
                self.pending = false;
                Some(outcome)
            }
            Err(mpsc::TryRecvError::Empty) | Err(mpsc::TryRecvError::Disconnected) => None,
        }
    }

    fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    fn poll_outcome(picker: &mut NativePicker) -> Option<PickOutcome> {
        for _ in 0..500 {
            if let Some(outcome) = picker.try_receive() {
                return Some(outcome);
            }
            thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn dialog_filter_lists_the_configured_extensions() {
        let extensions = vec!["png".to_string(), "jpg".to_string()];
        assert_eq!(dialog_filter(&extensions), Some(vec!["png", "jpg"]));
    }

    #[test]
    fn empty_extension_list_leaves_the_dialog_unfiltered() {
        assert_eq!(dialog_filter(&[]), None);
    }

    #[test]
    fn selected_path_arrives_as_an_outcome() {
        let mut picker = NativePicker::with_dialog(
            &[],
            Arc::new(|_: &[String]| Some(PathBuf::from("/tmp/r1.jpg"))),
        );

        picker.request_pick();
        assert!(picker.is_pending());

        let outcome = poll_outcome(&mut picker).expect("outcome should arrive");
        let expected = ImageRef::new("/tmp/r1.jpg").expect("path should be valid");
        assert_eq!(outcome, PickOutcome::Selected(expected));
        assert!(!picker.is_pending());
    }

    #[test]
    fn dismissed_dialog_arrives_as_cancellation() {
        let mut picker = NativePicker::with_dialog(&[], Arc::new(|_: &[String]| None));

        picker.request_pick();
        let outcome = poll_outcome(&mut picker).expect("outcome should arrive");
        assert_eq!(outcome, PickOutcome::Cancelled);
    }

    #[test]
    fn repeated_requests_while_pending_open_no_second_dialog() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let gate_rx = Mutex::new(gate_rx);

        let dialog_calls = Arc::clone(&calls);
        let mut picker = NativePicker::with_dialog(
            &[],
            Arc::new(move |_: &[String]| {
                dialog_calls.fetch_add(1, Ordering::SeqCst);
                // Hold the dialog open until the test releases it.
                let _ = gate_rx.lock().expect("gate lock should work").recv();
                Some(PathBuf::from("/tmp/r1.jpg"))
            }),
        );

        picker.request_pick();
        assert!(picker.is_pending());

        // Further taps while the dialog is up are ignored.
        picker.request_pick();
        picker.request_pick();

        gate_tx.send(()).expect("gate should deliver");
        let outcome = poll_outcome(&mut picker).expect("outcome should arrive");
        assert!(matches!(outcome, PickOutcome::Selected(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Exactly one outcome was produced.
        assert!(picker.try_receive().is_none());
    }
}
