//! Onboarding flow for new practices.
//!
//! Flow: website → details → knowledge → phone → calendar → email → done.
//! Progress is persisted as a single JSON entry and resumed on restart.

pub mod error;
pub mod field;
pub mod flow;
pub mod service;
pub mod session;
pub mod state;
pub mod step;
pub mod store;
pub mod store_file;
pub mod store_memory;
pub mod tenant;
pub mod wizard;

pub use {
    error::{Context, Error, Result},
    field::Field,
    flow::{FlowOutcome, OnboardingFlow},
    service::LiveOnboardingService,
    session::{
        BusinessDetails, IntegrationChoice, KnowledgeSummary, OnboardingData, OnboardingSession,
        WebsiteInfo,
    },
    state::{Event, Rejection, Submission, Transition, transition},
    step::Step,
    store::SessionStore,
    tenant::derive_tenant_id,
    wizard::TerminalWizard,
};
