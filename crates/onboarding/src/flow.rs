//! Onboarding flow controller: owns the session and keeps storage in sync.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    session::{DetailsPrefill, IntegrationChoice, OnboardingData, OnboardingSession},
    state::{Event, Rejection, Submission, Transition, transition},
    step::Step,
    store::{SessionStore, clear_session, load_session, persist_session},
    tenant::derive_tenant_id,
};

/// What a successful submission led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Now on this step.
    Moved(Step),
    /// The last step was submitted; storage was cleared and the session
    /// restarted. Carries the final answers for the success view.
    Completed(OnboardingData),
}

/// Drives one persisted onboarding session.
///
/// Every state change is written through to the store. A failed write is
/// logged and does not undo the change; the next successful write catches
/// storage up.
pub struct OnboardingFlow {
    store: Arc<dyn SessionStore>,
    key: String,
    session: OnboardingSession,
}

impl OnboardingFlow {
    /// Resume whatever is stored under `key`, or start fresh.
    pub async fn resume(store: Arc<dyn SessionStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let session = load_session(store.as_ref(), &key).await;
        debug!(key = %key, step = session.step.number(), "onboarding session loaded");
        Self {
            store,
            key,
            session,
        }
    }

    pub fn session(&self) -> &OnboardingSession {
        &self.session
    }

    pub fn step(&self) -> Step {
        self.session.step
    }

    pub fn data(&self) -> &OnboardingData {
        &self.session.data
    }

    pub fn can_go_back(&self) -> bool {
        self.session.step.previous().is_some()
    }

    /// Step back one; a no-op on the first step. Answers are kept.
    pub async fn go_back(&mut self) -> Step {
        if !self.can_go_back() {
            return self.session.step;
        }
        if let Transition::Next(session) = transition(self.session.clone(), Event::Back) {
            self.session = session;
            self.persist().await;
        }
        self.session.step
    }

    /// Record the current step's answer and move on.
    ///
    /// Submitting the last step completes the flow, same as
    /// [`complete_flow`](Self::complete_flow).
    pub async fn advance(&mut self, submission: Submission) -> Result<FlowOutcome, Rejection> {
        match transition(self.session.clone(), Event::Submit(submission)) {
            Transition::Next(session) => {
                debug!(from = %self.session.step, to = %session.step, "onboarding step advanced");
                self.session = session;
                self.persist().await;
                Ok(FlowOutcome::Moved(self.session.step))
            },
            Transition::Completed(data) => {
                self.finish().await;
                Ok(FlowOutcome::Completed(data))
            },
            Transition::Rejected { reason, .. } => Err(reason),
        }
    }

    /// Submit the Email step and leave the chain.
    ///
    /// Returns the final answers; the stored entry is removed.
    pub async fn complete_flow(
        &mut self,
        email: Option<IntegrationChoice>,
    ) -> Result<OnboardingData, Rejection> {
        match self.advance(Submission::Email(email)).await? {
            FlowOutcome::Completed(data) => Ok(data),
            // Only reachable if the email step were not last.
            FlowOutcome::Moved(step) => Err(Rejection::StepMismatch {
                current: step,
                submitted: Step::Email,
            }),
        }
    }

    /// Drop all answers and start over at step 1.
    pub async fn reset(&mut self) {
        self.session = OnboardingSession::default();
        if let Err(e) = clear_session(self.store.as_ref(), &self.key).await {
            warn!(key = %self.key, error = %e, "failed to clear onboarding session");
        }
    }

    pub fn tenant_id(&self) -> String {
        derive_tenant_id(&self.session.data)
    }

    pub fn title(&self) -> &'static str {
        self.session.step.title()
    }

    pub fn description(&self) -> &'static str {
        self.session.step.description()
    }

    pub fn details_prefill(&self) -> DetailsPrefill {
        self.session.data.details_prefill()
    }

    async fn finish(&mut self) {
        info!(tenant_id = %self.tenant_id(), "onboarding completed");
        self.reset().await;
    }

    async fn persist(&self) {
        if let Err(e) = persist_session(self.store.as_ref(), &self.key, &self.session).await {
            warn!(key = %self.key, error = %e, "failed to persist onboarding session");
        }
    }
}
