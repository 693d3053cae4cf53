use serde::{Deserialize, Serialize};

use crate::contact::ContactForm;

/// Where the contact form currently is in its submit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(SendFailure),
}

/// Why a message could not be delivered. Visitors only ever see a generic
/// error banner, the distinction is kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendFailure {
    /// The email provider refused the message.
    Rejected,
    /// The email provider could not be reached or answered with garbage.
    Unavailable,
}

impl SubmissionStatus {
    pub fn is_submitting(self) -> bool {
        self == Self::Submitting
    }

    pub fn submit_success(self) -> bool {
        self == Self::Succeeded
    }

    pub fn submit_error(self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Whether a success or error banner is currently shown.
    pub fn has_banner(self) -> bool {
        self.submit_success() || self.submit_error()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormSnapshot {
    pub fields: ContactForm,
    pub status: SubmissionStatus,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn at_most_one_flag() {
        for status in [
            SubmissionStatus::Idle,
            SubmissionStatus::Submitting,
            SubmissionStatus::Succeeded,
            SubmissionStatus::Failed(SendFailure::Rejected),
            SubmissionStatus::Failed(SendFailure::Unavailable),
        ] {
            let flags = [
                status.is_submitting(),
                status.submit_success(),
                status.submit_error(),
            ];
            assert!(flags.into_iter().filter(|&x| x).count() <= 1, "{status:?}");
        }
    }

    #[test]
    fn serialize() {
        assert_eq!(
            serde_json::to_value(SubmissionStatus::Idle).unwrap(),
            json!({"state": "idle"})
        );
        assert_eq!(
            serde_json::to_value(SubmissionStatus::Failed(SendFailure::Unavailable)).unwrap(),
            json!({"state": "failed", "reason": "unavailable"})
        );
    }
}
