use serde::{Deserialize, Serialize};

/// Sentinel percentage meaning "generation finished".
pub const PROGRESS_COMPLETE: i32 = 100;
/// Sentinel percentage meaning "no file in flight"; some backends emit it
/// instead of 100 when a job winds down.
pub const PROGRESS_IDLE: i32 = -1;

/// One raw message from the progress stream. Every field is optional; the
/// backend sends only what changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_file: Option<String>,
}

impl ProgressFrame {
    pub fn is_terminal(&self) -> bool {
        matches!(self.progress, Some(PROGRESS_COMPLETE | PROGRESS_IDLE))
    }
}

/// The merged client-side view of a job's progress.
///
/// Frames carry no sequence numbers, so the merge is last-write-wins: each
/// present field overwrites, absent fields are left alone. A later frame
/// with a lower percentage still overwrites a higher one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub percent: i32,
    pub message: String,
    pub current_file: Option<String>,
}

impl Default for ProgressEvent {
    fn default() -> Self {
        Self {
            percent: 0,
            message: String::new(),
            current_file: None,
        }
    }
}

impl ProgressEvent {
    /// Fold one frame into the latest-known state.
    ///
    /// `current_file` is cleared on a terminal percentage (100 or -1) even
    /// when the frame omits the field, and an explicitly empty
    /// `currentFile` clears it too.
    pub fn absorb(&mut self, frame: &ProgressFrame) {
        if let Some(p) = frame.progress {
            self.percent = p;
        }
        if let Some(m) = &frame.message {
            self.message = m.clone();
        }
        if let Some(f) = &frame.current_file {
            self.current_file = if f.is_empty() { None } else { Some(f.clone()) };
        }
        if frame.is_terminal() {
            self.current_file = None;
        }
    }
}
