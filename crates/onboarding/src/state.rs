//! Pure state machine for the onboarding wizard. No I/O.

use {
    serde::{Deserialize, Serialize},
    voira_common::PhoneNumbers,
};

use crate::{
    field::Field,
    session::{
        BusinessDetails, IntegrationChoice, KnowledgeSummary, OnboardingData, OnboardingSession,
        WebsiteInfo,
    },
    step::Step,
};

/// Calendar providers offered on step 5.
pub const CALENDAR_PROVIDERS: &[(&str, &str)] = &[
    ("google", "Google Calendar"),
    ("calendly", "Calendly"),
    ("outlook", "Microsoft Outlook"),
];

/// Email providers offered on step 6.
pub const EMAIL_PROVIDERS: &[(&str, &str)] = &[("gmail", "Gmail"), ("outlook", "Microsoft Outlook")];

/// Business types suggested by the Details view. Free text is accepted too.
pub const BUSINESS_TYPES: &[&str] = &[
    "Dental Practice",
    "Medical Clinic",
    "Veterinary Clinic",
    "Salon",
    "Spa",
    "Other",
];

/// A step's submit action. `None` payloads are the step's "skip".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "payload", rename_all = "snake_case")]
pub enum Submission {
    Website(Option<WebsiteInfo>),
    Details(BusinessDetails),
    Knowledge(Option<KnowledgeSummary>),
    Phone(PhoneNumbers),
    Calendar(Option<IntegrationChoice>),
    Email(Option<IntegrationChoice>),
}

impl Submission {
    /// The step this submission belongs to.
    pub fn step(&self) -> Step {
        match self {
            Submission::Website(_) => Step::Website,
            Submission::Details(_) => Step::Details,
            Submission::Knowledge(_) => Step::Knowledge,
            Submission::Phone(_) => Step::Phone,
            Submission::Calendar(_) => Step::Calendar,
            Submission::Email(_) => Step::Email,
        }
    }
}

/// Input to [`transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Back,
    Submit(Submission),
}

/// Why a submission was refused. The session is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("cannot submit the {submitted} step while on the {current} step")]
    StepMismatch { current: Step, submitted: Step },
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("unknown {step} provider: {provider}")]
    UnknownProvider { step: Step, provider: String },
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The flow is (still) inside the six-step chain.
    Next(OnboardingSession),
    /// Step 6 was submitted; the chain is left with the final answers.
    Completed(OnboardingData),
    Rejected {
        session: OnboardingSession,
        reason: Rejection,
    },
}

/// Apply `event` to `session`.
///
/// Defined for every (step, event) pair: back from the first step is a no-op,
/// a submission for another step or one failing its gate is rejected, and a
/// submission for the current step records the answer and moves forward by
/// exactly one (or completes from the last step).
pub fn transition(session: OnboardingSession, event: Event) -> Transition {
    match event {
        Event::Back => {
            let step = session.step.previous().unwrap_or(session.step);
            Transition::Next(OnboardingSession { step, ..session })
        },
        Event::Submit(submission) => submit(session, submission),
    }
}

fn submit(session: OnboardingSession, submission: Submission) -> Transition {
    if submission.step() != session.step {
        let reason = Rejection::StepMismatch {
            current: session.step,
            submitted: submission.step(),
        };
        return Transition::Rejected { session, reason };
    }

    let mut data = session.data.clone();
    if let Err(reason) = record(&mut data, submission) {
        return Transition::Rejected { session, reason };
    }

    match session.step.next() {
        Some(step) => Transition::Next(OnboardingSession { step, data }),
        None => Transition::Completed(data),
    }
}

/// Validate a submission and store it in its slot.
fn record(data: &mut OnboardingData, submission: Submission) -> Result<(), Rejection> {
    match submission {
        Submission::Website(answer) => {
            // An empty URL with nothing scraped carries no information.
            let answer = answer.filter(|w| !w.url.trim().is_empty() || w.scraped_data.is_some());
            data.website = Field::from_answer(answer);
        },
        Submission::Details(details) => {
            data.details = Field::Provided(validate_details(details)?);
        },
        Submission::Knowledge(summary) => {
            data.knowledge = Field::from_answer(summary);
        },
        Submission::Phone(numbers) => {
            require("inboundNumber", &numbers.inbound_number)?;
            require("outboundNumber", &numbers.outbound_number)?;
            data.phone = Field::Provided(numbers);
        },
        Submission::Calendar(choice) => {
            check_provider(Step::Calendar, CALENDAR_PROVIDERS, choice.as_ref())?;
            data.calendar = Field::from_answer(choice);
        },
        Submission::Email(choice) => {
            check_provider(Step::Email, EMAIL_PROVIDERS, choice.as_ref())?;
            data.email = Field::from_answer(choice);
        },
    }
    Ok(())
}

fn validate_details(details: BusinessDetails) -> Result<BusinessDetails, Rejection> {
    let details = BusinessDetails {
        practice_name: details.practice_name.trim().to_string(),
        business_type: details.business_type.trim().to_string(),
        location: details.location.trim().to_string(),
    };
    require("practiceName", &details.practice_name)?;
    require("businessType", &details.business_type)?;
    require("location", &details.location)?;
    Ok(details)
}

fn require(field: &'static str, value: &str) -> Result<(), Rejection> {
    if value.trim().is_empty() {
        return Err(Rejection::MissingField { field });
    }
    Ok(())
}

fn check_provider(
    step: Step,
    catalog: &[(&str, &str)],
    choice: Option<&IntegrationChoice>,
) -> Result<(), Rejection> {
    match choice {
        Some(c) if !catalog.iter().any(|(id, _)| *id == c.provider) => {
            Err(Rejection::UnknownProvider {
                step,
                provider: c.provider.clone(),
            })
        },
        _ => Ok(()),
    }
}

/// Display name of a provider id, if it is in either catalog.
pub fn provider_name(id: &str) -> Option<&'static str> {
    CALENDAR_PROVIDERS
        .iter()
        .chain(EMAIL_PROVIDERS)
        .find(|(pid, _)| *pid == id)
        .map(|(_, name)| *name)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest, serde_json::json};

    fn acme() -> BusinessDetails {
        BusinessDetails {
            practice_name: "Acme Vet".into(),
            business_type: "Veterinary Clinic".into(),
            location: "Austin, TX".into(),
        }
    }

    fn numbers() -> PhoneNumbers {
        PhoneNumbers {
            inbound_number: "+1 (555) 123-4567".into(),
            outbound_number: "+1 (555) 765-4321".into(),
        }
    }

    /// A valid submission for each step.
    fn valid_submission(step: Step) -> Submission {
        match step {
            Step::Website => Submission::Website(None),
            Step::Details => Submission::Details(acme()),
            Step::Knowledge => Submission::Knowledge(None),
            Step::Phone => Submission::Phone(numbers()),
            Step::Calendar => Submission::Calendar(Some(IntegrationChoice::new("google"))),
            Step::Email => Submission::Email(Some(IntegrationChoice::new("gmail"))),
        }
    }

    fn filled_data() -> OnboardingData {
        OnboardingData {
            website: Field::Skipped,
            details: Field::Provided(acme()),
            knowledge: Field::Skipped,
            phone: Field::Provided(numbers()),
            calendar: Field::Provided(IntegrationChoice::new("calendly")),
            email: Field::Unset,
        }
    }

    #[test]
    fn back_moves_one_step_and_keeps_data() {
        for step in Step::ALL {
            let session = OnboardingSession::new(step, filled_data());
            let Transition::Next(after) = transition(session, Event::Back) else {
                panic!("back must stay in the chain");
            };
            let expected = step.number().saturating_sub(1).max(1);
            assert_eq!(after.step.number(), expected);
            assert_eq!(after.data, filled_data());
        }
    }

    #[test]
    fn every_event_at_every_step_is_handled() {
        for current in Step::ALL {
            for target in Step::ALL {
                let session = OnboardingSession::new(current, OnboardingData::default());
                let result = transition(session.clone(), Event::Submit(valid_submission(target)));
                match (current == target, current.next(), result) {
                    (true, Some(next), Transition::Next(after)) => {
                        assert_eq!(after.step, next);
                        assert_eq!(after.step.number(), current.number() + 1);
                    },
                    (true, None, Transition::Completed(_)) => {},
                    (false, _, Transition::Rejected { session: kept, reason }) => {
                        assert_eq!(kept, session);
                        assert_eq!(reason, Rejection::StepMismatch {
                            current,
                            submitted: target,
                        });
                    },
                    (_, _, other) => panic!("{current} + {target}: unexpected {other:?}"),
                }
            }
        }
    }

    #[test]
    fn details_submission_scenario() {
        let session = OnboardingSession::new(Step::Details, OnboardingData::default());
        let Transition::Next(after) = transition(session, Event::Submit(Submission::Details(acme())))
        else {
            panic!("details should advance");
        };
        assert_eq!(after.step, Step::Knowledge);
        assert_eq!(after.data.details, Field::Provided(acme()));
    }

    #[rstest]
    #[case("", "Veterinary Clinic", "Austin, TX", "practiceName")]
    #[case("Acme Vet", "  ", "Austin, TX", "businessType")]
    #[case("Acme Vet", "Veterinary Clinic", "", "location")]
    fn details_gate(
        #[case] name: &str,
        #[case] kind: &str,
        #[case] location: &str,
        #[case] missing: &'static str,
    ) {
        let session = OnboardingSession::new(Step::Details, OnboardingData::default());
        let details = BusinessDetails {
            practice_name: name.into(),
            business_type: kind.into(),
            location: location.into(),
        };
        let result = transition(session.clone(), Event::Submit(Submission::Details(details)));
        assert_eq!(result, Transition::Rejected {
            session,
            reason: Rejection::MissingField { field: missing },
        });
    }

    #[test]
    fn details_are_trimmed() {
        let session = OnboardingSession::new(Step::Details, OnboardingData::default());
        let details = BusinessDetails {
            practice_name: "  Acme Vet ".into(),
            ..acme()
        };
        let Transition::Next(after) = transition(session, Event::Submit(Submission::Details(details)))
        else {
            panic!("details should advance");
        };
        assert_eq!(after.data.details.provided().unwrap().practice_name, "Acme Vet");
    }

    #[test]
    fn phone_requires_both_numbers() {
        let session = OnboardingSession::new(Step::Phone, OnboardingData::default());
        let partial = PhoneNumbers {
            outbound_number: String::new(),
            ..numbers()
        };
        let result = transition(session, Event::Submit(Submission::Phone(partial)));
        assert!(matches!(result, Transition::Rejected {
            reason: Rejection::MissingField {
                field: "outboundNumber"
            },
            ..
        }));
    }

    #[test]
    fn skips_are_recorded_as_skipped() {
        let mut session = OnboardingSession::default();
        for submission in [
            Submission::Website(None),
            Submission::Details(acme()),
            Submission::Knowledge(None),
            Submission::Phone(numbers()),
            Submission::Calendar(None),
        ] {
            session = match transition(session, Event::Submit(submission)) {
                Transition::Next(s) => s,
                other => panic!("unexpected {other:?}"),
            };
        }
        assert_eq!(session.step, Step::Email);
        assert!(session.data.website.is_skipped());
        assert!(session.data.knowledge.is_skipped());
        assert!(session.data.calendar.is_skipped());
        assert!(session.data.email.is_unset());

        let Transition::Completed(data) =
            transition(session, Event::Submit(Submission::Email(None)))
        else {
            panic!("email completes the flow");
        };
        assert!(data.email.is_skipped());
    }

    #[test]
    fn empty_website_answer_counts_as_skip() {
        let session = OnboardingSession::default();
        let answer = WebsiteInfo {
            url: "  ".into(),
            scraped_data: None,
        };
        let Transition::Next(after) =
            transition(session, Event::Submit(Submission::Website(Some(answer))))
        else {
            panic!("website never blocks");
        };
        assert!(after.data.website.is_skipped());
    }

    #[rstest]
    #[case(Step::Calendar, "gmail")]
    #[case(Step::Email, "calendly")]
    #[case(Step::Email, "yahoo")]
    fn unknown_providers_are_rejected(#[case] step: Step, #[case] provider: &str) {
        let session = OnboardingSession::new(step, OnboardingData::default());
        let choice = Some(IntegrationChoice::new(provider));
        let submission = match step {
            Step::Calendar => Submission::Calendar(choice),
            _ => Submission::Email(choice),
        };
        let result = transition(session, Event::Submit(submission));
        assert!(matches!(
            result,
            Transition::Rejected {
                reason: Rejection::UnknownProvider { .. },
                ..
            }
        ));
    }

    #[test]
    fn back_never_clears_later_answers() {
        let session = OnboardingSession::new(Step::Email, filled_data());
        let mut current = session;
        for _ in 0..3 {
            current = match transition(current, Event::Back) {
                Transition::Next(s) => s,
                other => panic!("unexpected {other:?}"),
            };
        }
        assert_eq!(current.step, Step::Knowledge);
        assert_eq!(current.data.calendar, Field::Provided(IntegrationChoice::new("calendly")));
        assert_eq!(current.data.phone, Field::Provided(numbers()));
    }

    #[test]
    fn submission_json_shape() {
        let parsed: Submission = serde_json::from_value(json!({
            "step": "details",
            "payload": {
                "practiceName": "Acme Vet",
                "businessType": "Veterinary Clinic",
                "location": "Austin, TX",
            },
        }))
        .unwrap();
        assert_eq!(parsed, Submission::Details(acme()));

        let skip: Submission =
            serde_json::from_value(json!({ "step": "calendar", "payload": null })).unwrap();
        assert_eq!(skip, Submission::Calendar(None));
    }

    #[test]
    fn provider_names() {
        assert_eq!(provider_name("calendly"), Some("Calendly"));
        assert_eq!(provider_name("gmail"), Some("Gmail"));
        assert_eq!(provider_name("fax"), None);
    }
}
