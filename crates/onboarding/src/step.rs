//! The six named wizard states and their display copy.

use serde::{Deserialize, Serialize};

/// Steps of the onboarding wizard, in order.
///
/// Persisted as its 1-based number.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    #[default]
    Website = 1,
    Details = 2,
    Knowledge = 3,
    Phone = 4,
    Calendar = 5,
    Email = 6,
}

pub const TOTAL_STEPS: u8 = 6;

/// A step number outside `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("step {0} is outside 1..={TOTAL_STEPS}")]
pub struct InvalidStep(pub u8);

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Website,
        Step::Details,
        Step::Knowledge,
        Step::Phone,
        Step::Calendar,
        Step::Email,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    /// The following step, `None` from [`Step::Email`].
    pub fn next(self) -> Option<Step> {
        Step::try_from(self.number() + 1).ok()
    }

    /// The preceding step, `None` from [`Step::Website`].
    pub fn previous(self) -> Option<Step> {
        Step::try_from(self.number() - 1).ok()
    }

    /// Machine name used in the JSON API.
    pub fn name(self) -> &'static str {
        match self {
            Step::Website => "website",
            Step::Details => "details",
            Step::Knowledge => "knowledge",
            Step::Phone => "phone",
            Step::Calendar => "calendar",
            Step::Email => "email",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Website => "Website Information",
            Step::Details => "Practice Details",
            Step::Knowledge => "Knowledge Base",
            Step::Phone => "Phone Configuration",
            Step::Calendar => "Calendar Integration",
            Step::Email => "Email Integration",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::Website => {
                "Enter your website URL to automatically extract your business information (optional)."
            },
            Step::Details => "Provide basic information about your practice.",
            Step::Knowledge => {
                "Upload documents to train your voice agent with your specific knowledge."
            },
            Step::Phone => "Set up phone numbers for inbound and outbound voice agent calls.",
            Step::Calendar => "Connect your calendar system for appointment booking.",
            Step::Email => "Configure email for sending confirmations and notifications.",
        }
    }

    /// Whether the step offers a "skip" that advances without an answer.
    pub fn is_skippable(self) -> bool {
        !matches!(self, Step::Details | Step::Phone)
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = InvalidStep;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Step::Website),
            2 => Ok(Step::Details),
            3 => Ok(Step::Knowledge),
            4 => Ok(Step::Phone),
            5 => Ok(Step::Calendar),
            6 => Ok(Step::Email),
            other => Err(InvalidStep(other)),
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
