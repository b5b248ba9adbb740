use crate::domain::{AppState, BootState};
use crate::session::{SessionPhase, SessionRunEvent, SessionState};

use super::events::DomainEvent;

pub fn reduce(mut state: AppState, ev: DomainEvent) -> AppState {
    match ev {
        DomainEvent::BootLoadingStarted => {
            state.boot = BootState::Loading;
        }

        DomainEvent::InitialStateLoaded { auth } => {
            state.auth = auth;
            state.boot = BootState::Ready;
        }

        DomainEvent::BootFailed { message } => {
            state.boot = BootState::Failed(message);
        }

        DomainEvent::AuthUpdated(ctx) => {
            state.last_error = None;
            state.auth = Some(ctx);
        }

        DomainEvent::AuthCleared => {
            state.auth = None;
        }

        DomainEvent::SessionEvent { run_id: _, ev } => apply_session_event(&mut state, ev),

        DomainEvent::UserError(msg) => {
            state.last_error = Some(msg);
        }
    }
    state
}

fn apply_session_event(state: &mut AppState, ev: SessionRunEvent) {
    match ev {
        SessionRunEvent::Started { target } => {
            state.last_error = None;
            state.session = SessionState::starting(target).with_run_id(state.session.run_id);
        }

        SessionRunEvent::ChannelOpened => {
            if state.session.phase == SessionPhase::Submitting {
                state.session.phase = SessionPhase::InProgress;
            }
        }

        SessionRunEvent::Progress(frame) => {
            // A resolved session's outcome is authoritative; a frame still
            // queued behind it must not disturb the final snapshot.
            if state.session.phase == SessionPhase::Resolved {
                return;
            }
            state.session.progress.absorb(&frame);
            if state.session.phase == SessionPhase::Submitting {
                state.session.phase = SessionPhase::InProgress;
            }
        }

        SessionRunEvent::ChannelClosed { error } => {
            // Stream loss alone never resolves the session; the terminal
            // response remains authoritative.
            if let Some(e) = error {
                state.session.channel_error = Some(e);
            }
        }

        SessionRunEvent::Resolved(outcome) => {
            state.session.phase = SessionPhase::Resolved;
            state.session.outcome = Some(outcome);
        }
    }
}
