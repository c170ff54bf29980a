//! CLI commands for the locally stored onboarding session.

use std::sync::Arc;

use {
    voira_config::VoiraConfig,
    voira_onboarding::{
        OnboardingFlow, SessionStore, Step, TerminalWizard, step::TOTAL_STEPS,
        store_file::FileSessionStore,
    },
    voira_services::Services,
};

async fn open_flow(config: &VoiraConfig) -> OnboardingFlow {
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::default_path());
    OnboardingFlow::resume(store, config.onboarding.storage_key.clone()).await
}

pub async fn handle_onboard(config: &VoiraConfig) -> anyhow::Result<()> {
    let services = Services::from_config(config);
    let mut flow = open_flow(config).await;
    if flow.step() != Step::Website {
        println!("Resuming at step {} of {TOTAL_STEPS}.", flow.step().number());
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    TerminalWizard::new(&mut flow, &services, stdin.lock(), stdout.lock())
        .run()
        .await?;
    Ok(())
}

pub async fn handle_status(config: &VoiraConfig, json: bool) -> anyhow::Result<()> {
    let flow = open_flow(config).await;
    if json {
        println!("{}", serde_json::to_string_pretty(flow.session())?);
    } else {
        print!("{}", render_status(&flow));
    }
    Ok(())
}

pub async fn handle_reset(config: &VoiraConfig) -> anyhow::Result<()> {
    let mut flow = open_flow(config).await;
    flow.reset().await;
    println!("Onboarding progress cleared.");
    Ok(())
}

fn render_status(flow: &OnboardingFlow) -> String {
    let data = flow.data();
    let state = |unset: bool, skipped: bool| {
        if unset {
            "-"
        } else if skipped {
            "skipped"
        } else {
            "done"
        }
    };
    let rows = [
        (Step::Website, state(data.website.is_unset(), data.website.is_skipped())),
        (Step::Details, state(data.details.is_unset(), data.details.is_skipped())),
        (Step::Knowledge, state(data.knowledge.is_unset(), data.knowledge.is_skipped())),
        (Step::Phone, state(data.phone.is_unset(), data.phone.is_skipped())),
        (Step::Calendar, state(data.calendar.is_unset(), data.calendar.is_skipped())),
        (Step::Email, state(data.email.is_unset(), data.email.is_skipped())),
    ];

    let mut out = format!(
        "Step {} of {TOTAL_STEPS}: {}\nTenant: {}\n",
        flow.step().number(),
        flow.title(),
        flow.tenant_id()
    );
    for (step, answer) in rows {
        let marker = if step == flow.step() { ">" } else { " " };
        out.push_str(&format!("{marker} {}. {:<22} {answer}\n", step.number(), step.title()));
    }
    out
}
