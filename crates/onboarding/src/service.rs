//! Live onboarding service that backs the gateway's `/api/onboarding` routes.
//!
//! Wraps one [`OnboardingFlow`] and speaks JSON: every call returns the
//! view the client renders for the current step.

use std::sync::Arc;

use {
    serde_json::{Value, json},
    tokio::sync::Mutex,
};

use crate::{
    Result,
    flow::{FlowOutcome, OnboardingFlow},
    state::{BUSINESS_TYPES, CALENDAR_PROVIDERS, EMAIL_PROVIDERS, Submission},
    step::TOTAL_STEPS,
    store::SessionStore,
    tenant::derive_tenant_id,
};

pub struct LiveOnboardingService {
    flow: Mutex<OnboardingFlow>,
}

impl LiveOnboardingService {
    pub fn new(flow: OnboardingFlow) -> Self {
        Self {
            flow: Mutex::new(flow),
        }
    }

    /// Resume the session stored under `key`.
    pub async fn open(store: Arc<dyn SessionStore>, key: impl Into<String>) -> Self {
        Self::new(OnboardingFlow::resume(store, key).await)
    }

    /// The current step's view.
    pub async fn view(&self) -> Value {
        let flow = self.flow.lock().await;
        step_view(&flow)
    }

    /// Step back one; a no-op on the first step.
    pub async fn back(&self) -> Value {
        let mut flow = self.flow.lock().await;
        flow.go_back().await;
        step_view(&flow)
    }

    /// Submit the current step.
    ///
    /// Accepts `{"payload": ...}`; `step` defaults to the current step, and
    /// a missing or null payload is the step's skip. On completion the
    /// response carries `done: true`, the final answers and the fresh view.
    pub async fn next(&self, params: Value) -> Result<Value> {
        let mut flow = self.flow.lock().await;
        let submission = parse_submission(params, flow.step().name())?;

        match flow.advance(submission).await? {
            FlowOutcome::Moved(_) => {
                let mut view = step_view(&flow);
                view["done"] = json!(false);
                Ok(view)
            },
            FlowOutcome::Completed(data) => Ok(json!({
                "done": true,
                "tenantId": derive_tenant_id(&data),
                "data": data,
                "view": step_view(&flow),
            })),
        }
    }

    /// Drop all answers and return the first step's view.
    pub async fn reset(&self) -> Value {
        let mut flow = self.flow.lock().await;
        flow.reset().await;
        step_view(&flow)
    }
}

fn parse_submission(params: Value, current: &str) -> Result<Submission> {
    let mut params = match params {
        Value::Object(map) => map,
        Value::Null => Default::default(),
        other => {
            return Err(crate::Error::message(format!(
                "expected an object, got {other}"
            )));
        },
    };
    params
        .entry("step")
        .or_insert_with(|| Value::String(current.to_string()));
    params.entry("payload").or_insert(Value::Null);
    Ok(serde_json::from_value(Value::Object(params))?)
}

fn catalog(providers: &[(&str, &str)]) -> Value {
    providers
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect()
}

fn step_view(flow: &OnboardingFlow) -> Value {
    let step = flow.step();
    json!({
        "step": step.number(),
        "name": step.name(),
        "title": flow.title(),
        "description": flow.description(),
        "totalSteps": TOTAL_STEPS,
        "canGoBack": flow.can_go_back(),
        "skippable": step.is_skippable(),
        "tenantId": flow.tenant_id(),
        "prefill": flow.details_prefill(),
        "data": flow.data(),
        "catalogs": {
            "businessTypes": BUSINESS_TYPES,
            "calendar": catalog(CALENDAR_PROVIDERS),
            "email": catalog(EMAIL_PROVIDERS),
        },
    })
}
