//! Call status reconciliation
//!
//! The voice provider reports on a call through two independent shapes:
//! webhook events pushed to us, and call snapshots we poll for. Both are
//! normalized into a [`ProviderSignal`] and applied to the call task
//! through one deterministic mapping, so the final record is the same
//! whichever channel delivered the news, and replaying an event does not
//! change the outcome.

use crate::domain::call_task::{CallStatus, CallTask};

/// Outcome fields extracted from an ended call. Missing provider fields
/// decode to empty strings; a missing confirmation flag decodes to false.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOutcome {
    pub transcript: String,
    pub summary: String,
    pub ended_reason: String,
    pub booking_confirmed: bool,
}

/// Normalized provider signal, from either a webhook event or a polled
/// call snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderSignal {
    /// The call is queued, ringing, being forwarded, or on the line
    Ongoing,
    /// The call ended; carries the extracted outcome
    Ended(CallOutcome),
    /// An event or status this system does not act on
    Unrecognized,
}

impl CallTask {
    /// Apply a provider signal to this task. Returns whether any field
    /// changed.
    ///
    /// Booking success is the sole determinant of terminal status: an
    /// ended call is COMPLETED when the booking was confirmed and FAILED
    /// otherwise. `ended_reason` and `ai_summary` carry the nuance.
    /// Ongoing signals never move a task out of a terminal status, so an
    /// out-of-order status update cannot reopen a finished call. Ended
    /// signals always apply; replaying one rewrites the same values.
    pub fn apply_signal(&mut self, signal: &ProviderSignal) -> bool {
        match signal {
            ProviderSignal::Ongoing => {
                if self.status.is_terminal() || self.status == CallStatus::InProgress {
                    return false;
                }
                self.status = CallStatus::InProgress;
                true
            }
            ProviderSignal::Ended(outcome) => {
                self.transcript = Some(outcome.transcript.clone());
                self.ai_summary = Some(outcome.summary.clone());
                self.ended_reason = Some(outcome.ended_reason.clone());
                self.booking_confirmed = Some(outcome.booking_confirmed);
                self.status = if outcome.booking_confirmed {
                    CallStatus::Completed
                } else {
                    CallStatus::Failed
                };
                true
            }
            ProviderSignal::Unrecognized => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::call_task::NewCallTask;

    fn task(status: CallStatus) -> CallTask {
        let mut t = NewCallTask::manual("555-1234".to_string(), None, 0, Some(status)).with_id(1);
        t.vapi_call_id = Some("vapi-abc".to_string());
        t
    }

    fn confirmed_outcome() -> CallOutcome {
        CallOutcome {
            transcript: "Hello, tee time booked.".to_string(),
            summary: "Booked 14:00 for 4 players.".to_string(),
            ended_reason: "customer-ended-call".to_string(),
            booking_confirmed: true,
        }
    }

    #[test]
    fn test_ongoing_moves_scheduled_to_in_progress() {
        let mut t = task(CallStatus::Scheduled);
        assert!(t.apply_signal(&ProviderSignal::Ongoing));
        assert_eq!(t.status, CallStatus::InProgress);
        assert!(t.transcript.is_none());
    }

    #[test]
    fn test_ongoing_is_noop_when_already_in_progress() {
        let mut t = task(CallStatus::InProgress);
        assert!(!t.apply_signal(&ProviderSignal::Ongoing));
        assert_eq!(t.status, CallStatus::InProgress);
    }

    #[test]
    fn test_ongoing_does_not_reopen_terminal_task() {
        for status in [CallStatus::Completed, CallStatus::Failed, CallStatus::Cancelled] {
            let mut t = task(status);
            assert!(!t.apply_signal(&ProviderSignal::Ongoing));
            assert_eq!(t.status, status);
        }
    }

    #[test]
    fn test_ended_confirmed_completes_task() {
        let mut t = task(CallStatus::InProgress);
        assert!(t.apply_signal(&ProviderSignal::Ended(confirmed_outcome())));

        assert_eq!(t.status, CallStatus::Completed);
        assert_eq!(t.booking_confirmed, Some(true));
        assert_eq!(t.transcript, Some("Hello, tee time booked.".to_string()));
        assert_eq!(t.ai_summary, Some("Booked 14:00 for 4 players.".to_string()));
        assert_eq!(t.ended_reason, Some("customer-ended-call".to_string()));
    }

    #[test]
    fn test_ended_unconfirmed_fails_task() {
        let mut t = task(CallStatus::InProgress);
        let outcome = CallOutcome {
            booking_confirmed: false,
            ..confirmed_outcome()
        };
        assert!(t.apply_signal(&ProviderSignal::Ended(outcome)));

        assert_eq!(t.status, CallStatus::Failed);
        assert_eq!(t.booking_confirmed, Some(false));
        assert!(t.transcript.is_some());
    }

    #[test]
    fn test_ended_replay_is_idempotent() {
        let mut t = task(CallStatus::InProgress);
        let signal = ProviderSignal::Ended(confirmed_outcome());

        t.apply_signal(&signal);
        let after_first = t.clone();
        t.apply_signal(&signal);

        assert_eq!(t, after_first);
    }

    #[test]
    fn test_empty_outcome_still_fails_task() {
        // An ended call with no analysis at all: fields become empty,
        // confirmation defaults to false.
        let mut t = task(CallStatus::InProgress);
        t.apply_signal(&ProviderSignal::Ended(CallOutcome::default()));

        assert_eq!(t.status, CallStatus::Failed);
        assert_eq!(t.booking_confirmed, Some(false));
        assert_eq!(t.transcript, Some(String::new()));
        assert_eq!(t.ai_summary, Some(String::new()));
    }

    #[test]
    fn test_unrecognized_is_noop() {
        let mut t = task(CallStatus::InProgress);
        let before = t.clone();
        assert!(!t.apply_signal(&ProviderSignal::Unrecognized));
        assert_eq!(t, before);
    }
}
