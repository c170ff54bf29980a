//! HTTP gateway: collaborator endpoints for the wizard and the demo page,
//! plus the persisted onboarding session.

pub mod api_routes;
pub mod error;
pub mod onboarding_routes;
pub mod server;
pub mod state;
