use crate::picker::PickOutcome;

#[derive(Debug, Clone)]
pub enum AppEvent {
    RequestPick,
    PickFinished(PickOutcome),
    ApplyFilter,
}
