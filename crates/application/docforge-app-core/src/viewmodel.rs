use docforge_core::GenerationOutcome;

use crate::domain::{AppState, BootState};
use crate::session::SessionPhase;

#[derive(Debug, Clone)]
pub struct AccountVm {
    pub logged_in: bool,
    pub user_id: Option<String>,
}

pub fn account_vm(state: &AppState) -> AccountVm {
    AccountVm {
        logged_in: state.auth.is_some(),
        user_id: state.auth.as_ref().map(|a| a.user_id.clone()),
    }
}

/// Snapshot of the generation session for a presentation layer. Pure
/// projection: no I/O, raw session state stays untouched.
#[derive(Debug, Clone)]
pub struct SessionVm {
    pub phase_label: &'static str,
    /// Display-clamped to `0.0..=1.0`; the session keeps raw percentages
    /// (including the -1 idle sentinel).
    pub progress_ratio: f32,
    pub percent_label: String,
    pub message: String,
    pub current_file: Option<String>,
    /// Non-fatal: the stream dropped but the job is still running.
    pub channel_warning: Option<String>,
    pub can_submit: bool,
    pub can_retry: bool,
    pub needs_payment: bool,
    pub failure: Option<String>,
    pub succeeded: bool,
}

pub fn session_vm(state: &AppState) -> SessionVm {
    let session = &state.session;
    let booted = matches!(state.boot, BootState::Ready);

    let phase_label = match session.phase {
        SessionPhase::Idle => "Idle",
        SessionPhase::Submitting => "Submitting…",
        SessionPhase::InProgress => "Generating…",
        SessionPhase::Resolved => match &session.outcome {
            Some(GenerationOutcome::Success(_)) => "Done",
            Some(GenerationOutcome::PaymentRequired) => "Out of credits",
            _ => "Failed",
        },
    };

    let percent = docforge_config::clamp_percent(session.progress.percent);

    let (needs_payment, failure, succeeded) = match &session.outcome {
        Some(GenerationOutcome::Success(_)) => (false, None, true),
        Some(GenerationOutcome::PaymentRequired) => (true, None, false),
        Some(GenerationOutcome::Failure(reason)) => (false, Some(reason.clone()), false),
        None => (false, None, false),
    };

    SessionVm {
        phase_label,
        progress_ratio: percent as f32 / 100.0,
        percent_label: format!("{percent}%"),
        message: session.progress.message.clone(),
        current_file: session.progress.current_file.clone(),
        channel_warning: session.channel_error.clone(),
        can_submit: booted && !session.is_active(),
        can_retry: session.is_terminal() && !succeeded,
        needs_payment,
        failure,
        succeeded,
    }
}
