use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use image::ImageReader;
use tracing::{debug, warn};

use crate::app::state::ImageRef;
use crate::infra::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBitmap {
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major.
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeEvent {
    Decoded(DecodedBitmap),
    Failed { sequence: u64, error: AppError },
}

impl DecodeEvent {
    pub fn sequence(&self) -> u64 {
        match self {
            Self::Decoded(bitmap) => bitmap.sequence,
            Self::Failed { sequence, .. } => *sequence,
        }
    }
}

struct DecodeJob {
    sequence: u64,
    path: PathBuf,
}

/// Decodes selected images off the UI thread. Jobs are tagged with a
/// sequence number; when picks arrive faster than decodes finish, only the
/// newest submission is worth rendering and the rest are skipped.
pub struct DecodePipeline {
    next_sequence: AtomicU64,
    latest_sequence: Arc<AtomicU64>,
    submit_tx: mpsc::Sender<DecodeJob>,
    result_rx: mpsc::Receiver<DecodeEvent>,
}

impl DecodePipeline {
    pub fn new() -> Self {
        let (submit_tx, submit_rx) = mpsc::channel::<DecodeJob>();
        let (result_tx, result_rx) = mpsc::channel::<DecodeEvent>();
        let latest_sequence = Arc::new(AtomicU64::new(0));

        spawn_worker(submit_rx, result_tx, Arc::clone(&latest_sequence));

        Self {
            next_sequence: AtomicU64::new(0),
            latest_sequence,
            submit_tx,
            result_rx,
        }
    }

    /// Queues a decode and returns the sequence its result will carry.
    pub fn submit(&self, image: &ImageRef) -> u64 {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest_sequence.store(sequence, Ordering::SeqCst);
        let job = DecodeJob {
            sequence,
            path: image.path().to_path_buf(),
        };
        if self.submit_tx.send(job).is_err() {
            warn!(sequence, "decode worker is gone, dropping job");
        }
        sequence
    }

    /// Non-blocking poll; drains the channel and keeps only the newest
    /// event when several piled up between frames. A dead worker is an
    /// error, not an idle channel.
    pub fn try_receive(&mut self) -> Result<Option<DecodeEvent>, AppError> {
        let mut newest = match self.result_rx.try_recv() {
            Ok(event) => event,
            Err(mpsc::TryRecvError::Empty) => return Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => {
                return Err(AppError::Io(
                    "decode result channel disconnected".to_string(),
                ))
            }
        };
        while let Ok(next) = self.result_rx.try_recv() {
            debug!(superseded = newest.sequence(), "dropping stale decode event");
            newest = next;
        }
        Ok(Some(newest))
    }
}

impl Default for DecodePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl DecodePipeline {
    /// Pipeline whose worker is already gone, for exercising shutdown
    /// paths.
    pub(crate) fn disconnected() -> Self {
        let (submit_tx, _submit_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        drop(result_tx);
        Self {
            next_sequence: AtomicU64::new(0),
            latest_sequence: Arc::new(AtomicU64::new(0)),
            submit_tx,
            result_rx,
        }
    }
}

fn spawn_worker(
    submit_rx: mpsc::Receiver<DecodeJob>,
    result_tx: mpsc::Sender<DecodeEvent>,
    latest_sequence: Arc<AtomicU64>,
) {
    thread::spawn(move || {
        while let Ok(mut job) = submit_rx.recv() {
            // Newest submission wins; anything already queued behind it is
            // for an image the user no longer looks at.
            while let Ok(next) = submit_rx.try_recv() {
                job = next;
            }
            if job.sequence < latest_sequence.load(Ordering::SeqCst) {
                continue;
            }

            let event = match decode_rgba(&job.path) {
                Ok((width, height, pixels)) => DecodeEvent::Decoded(DecodedBitmap {
                    sequence: job.sequence,
                    width,
                    height,
                    pixels,
                }),
                Err(error) => {
                    warn!(path = %job.path.display(), %error, "decode failed");
                    DecodeEvent::Failed {
                        sequence: job.sequence,
                        error,
                    }
                }
            };
            if result_tx.send(event).is_err() {
                return;
            }
        }
    });
}

pub fn decode_rgba(path: &Path) -> Result<(u32, u32, Vec<u8>), AppError> {
    let image = ImageReader::open(path)
        .map_err(|error| AppError::Io(format!("{}: {error}", path.display())))?
        .with_guessed_format()
        .map_err(|error| AppError::Io(format!("{}: {error}", path.display())))?
        .decode()
        .map_err(|error| AppError::Decode(format!("{}: {error}", path.display())))?;
    let rgba = image.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    Ok((width, height, rgba.into_raw()))
}
