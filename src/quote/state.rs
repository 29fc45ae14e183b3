//! Wizard state machine: submission status and contact dialog steps.

use serde::{Deserialize, Serialize};

/// Where a quote request is in its submission lifecycle.
///
/// Progresses Idle → AwaitingEmailStep → Sending → Succeeded | Failed.
/// `Failed` may go back to `Sending` (retry) or `AwaitingEmailStep`, and
/// closing the popup or dismissing the confirmation returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    AwaitingEmailStep,
    Sending,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, target),
            (Idle, AwaitingEmailStep)
                | (AwaitingEmailStep, Sending)
                | (Sending, Succeeded)
                | (Sending, Failed)
                | (Failed, Sending)
                | (Failed, AwaitingEmailStep)
                | (AwaitingEmailStep | Sending | Succeeded | Failed, Idle)
        )
    }

    /// Whether this status ends a submission attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::AwaitingEmailStep => "awaiting_email_step",
            Self::Sending => "sending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// A page of the two-step contact details dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStep {
    /// Full name and business email.
    #[default]
    Personal,
    /// Company name and contact number.
    Company,
}

impl ContactStep {
    /// 1-indexed step number for display.
    pub fn number(&self) -> u8 {
        match self {
            Self::Personal => 1,
            Self::Company => 2,
        }
    }

    pub fn total() -> u8 {
        2
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Personal => "Your details",
            Self::Company => "Company details",
        }
    }

    /// Next step, or `None` when the dialog is ready to submit.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Personal => Some(Self::Company),
            Self::Company => None,
        }
    }

    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::Personal => None,
            Self::Company => Some(Self::Personal),
        }
    }
}

impl std::fmt::Display for ContactStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SubmissionStatus; 5] = [
        SubmissionStatus::Idle,
        SubmissionStatus::AwaitingEmailStep,
        SubmissionStatus::Sending,
        SubmissionStatus::Succeeded,
        SubmissionStatus::Failed,
    ];

    #[test]
    fn valid_transitions() {
        use SubmissionStatus::*;
        let transitions = [
            (Idle, AwaitingEmailStep),
            (AwaitingEmailStep, Sending),
            (Sending, Succeeded),
            (Sending, Failed),
            (Failed, Sending),
            (Failed, AwaitingEmailStep),
        ];
        for (from, to) in transitions {
            assert!(from.can_transition_to(to), "{from} should transition to {to}");
        }
    }

    #[test]
    fn every_active_status_can_reset_to_idle() {
        for from in ALL {
            if from == SubmissionStatus::Idle {
                continue;
            }
            assert!(from.can_transition_to(SubmissionStatus::Idle), "{from} -> idle");
        }
    }

    #[test]
    fn invalid_transitions() {
        use SubmissionStatus::*;
        // Skip the dialog
        assert!(!Idle.can_transition_to(Sending));
        // Backwards from success
        assert!(!Succeeded.can_transition_to(AwaitingEmailStep));
        assert!(!Succeeded.can_transition_to(Sending));
        // Outcome without sending
        assert!(!AwaitingEmailStep.can_transition_to(Succeeded));
        assert!(!AwaitingEmailStep.can_transition_to(Failed));
        // Sending does not bounce back to the dialog
        assert!(!Sending.can_transition_to(AwaitingEmailStep));
        // Self-transitions
        for status in ALL {
            assert!(!status.can_transition_to(status), "{status} self-transition");
        }
    }

    #[test]
    fn terminal_statuses() {
        use SubmissionStatus::*;
        assert!(Succeeded.is_terminal());
        assert!(Failed.is_terminal());
        assert!(!Idle.is_terminal());
        assert!(!AwaitingEmailStep.is_terminal());
        assert!(!Sending.is_terminal());
    }

    #[test]
    fn display_matches_serde() {
        for status in ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(format!("\"{status}\""), json);
        }
    }

    #[test]
    fn steps_walk_forward_and_back() {
        assert_eq!(ContactStep::default(), ContactStep::Personal);
        assert_eq!(ContactStep::Personal.next(), Some(ContactStep::Company));
        assert_eq!(ContactStep::Company.next(), None);
        assert_eq!(ContactStep::Company.previous(), Some(ContactStep::Personal));
        assert_eq!(ContactStep::Personal.previous(), None);
    }

    #[test]
    fn step_numbers_count_up_to_total() {
        assert_eq!(ContactStep::Personal.number(), 1);
        assert_eq!(ContactStep::Company.number(), ContactStep::total());
    }
}
