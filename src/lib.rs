//! Front-end core for the clinical decision support wizard.
//!
//! Typed client for the CDSS backend, request forms with pre-flight
//! validation, and the step controller that ties them together. Rendering
//! is left to whichever front end embeds this crate.

pub mod api;
pub mod config;
pub mod display;
pub mod feedback_form;
pub mod health_check;
pub mod models;
pub mod prediction_form;
pub mod wizard;

pub use api::{ApiError, CdssApi, HttpClient, MockApi};
pub use config::ClientConfig;
pub use feedback_form::{FeedbackForm, OutcomeForm};
pub use prediction_form::{ListField, PredictionForm};
pub use wizard::{StatusMessage, StepView, Wizard, WizardError, WizardState, WizardStep};

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default
/// filter. Calling it again is a no-op.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}

/// Wizard talking to the backend configured through the environment.
pub fn wizard_from_env() -> Result<Wizard<HttpClient>, ApiError> {
    let client = HttpClient::from_env()?;
    tracing::info!(base_url = client.base_url(), "Backend client ready");
    Ok(Wizard::new(client))
}
