//! Terminal-based onboarding wizard driving the shared flow.
//!
//! Every prompt accepts `back`; skippable steps accept `skip`. End of input
//! stops the wizard with progress saved.

use std::{
    io::{BufRead, Write},
    path::Path,
};

use {
    tracing::debug,
    voira_services::{
        Services,
        ingest::{Document, IngestRequest},
        phone::PhoneRequest,
    },
};

use crate::{
    flow::{FlowOutcome, OnboardingFlow},
    session::{BusinessDetails, IntegrationChoice, KnowledgeSummary, OnboardingData, WebsiteInfo},
    state::{CALENDAR_PROVIDERS, EMAIL_PROVIDERS, Submission},
    step::{Step, TOTAL_STEPS},
    tenant::derive_tenant_id,
};

/// What the user asked for on one step.
enum Action {
    Submit(Submission),
    Back,
    /// Re-prompt the same step.
    Retry,
    Quit,
}

/// Line read from the user, with the shared commands already recognized.
enum Reply {
    Text(String),
    Back,
    Skip,
    Eof,
}

pub struct TerminalWizard<'a, R, W> {
    flow: &'a mut OnboardingFlow,
    services: &'a Services,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> TerminalWizard<'a, R, W> {
    pub fn new(flow: &'a mut OnboardingFlow, services: &'a Services, input: R, output: W) -> Self {
        Self {
            flow,
            services,
            input,
            output,
        }
    }

    /// Run until the flow completes or input ends.
    ///
    /// Returns the final answers on completion, `None` when the user left
    /// early (the session stays stored and resumes next time).
    pub async fn run(&mut self) -> anyhow::Result<Option<OnboardingData>> {
        loop {
            let step = self.flow.step();
            writeln!(
                self.output,
                "\nStep {} of {TOTAL_STEPS}: {}\n{}",
                step.number(),
                step.title(),
                step.description()
            )?;

            let action = match step {
                Step::Website => self.website().await?,
                Step::Details => self.details()?,
                Step::Knowledge => self.knowledge().await?,
                Step::Phone => self.phone().await?,
                Step::Calendar => {
                    self.integration(CALENDAR_PROVIDERS, Submission::Calendar)
                        .await?
                },
                Step::Email => self.integration(EMAIL_PROVIDERS, Submission::Email).await?,
            };

            match action {
                Action::Submit(submission) => match self.flow.advance(submission).await {
                    Ok(FlowOutcome::Moved(next)) => debug!(step = %next, "wizard advanced"),
                    Ok(FlowOutcome::Completed(data)) => {
                        self.summary(&data)?;
                        return Ok(Some(data));
                    },
                    Err(reason) => writeln!(self.output, "  {reason}")?,
                },
                Action::Back => {
                    if !self.flow.can_go_back() {
                        writeln!(self.output, "  Already on the first step.")?;
                    }
                    self.flow.go_back().await;
                },
                Action::Retry => {},
                Action::Quit => {
                    writeln!(
                        self.output,
                        "\nProgress saved. Run `voira onboard` to continue."
                    )?;
                    return Ok(None);
                },
            }
        }
    }

    fn ask(&mut self, prompt: &str) -> anyhow::Result<Reply> {
        write!(self.output, "{prompt}\n> ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Reply::Eof);
        }
        let line = line.trim();
        Ok(match line.to_ascii_lowercase().as_str() {
            "back" => Reply::Back,
            "skip" => Reply::Skip,
            "quit" | "exit" => Reply::Eof,
            _ => Reply::Text(line.to_string()),
        })
    }

    async fn website(&mut self) -> anyhow::Result<Action> {
        let url = match self.ask("Website URL (or 'skip'):")? {
            Reply::Text(url) if !url.is_empty() => url,
            Reply::Text(_) | Reply::Skip => return Ok(Action::Submit(Submission::Website(None))),
            Reply::Back => return Ok(Action::Back),
            Reply::Eof => return Ok(Action::Quit),
        };

        writeln!(self.output, "  Scraping {url}...")?;
        match self.services.scraper.scrape(&url).await {
            Ok(scraped) => {
                if let Some(name) = &scraped.practice_name {
                    writeln!(self.output, "  Found: {name}")?;
                }
                Ok(Action::Submit(Submission::Website(Some(WebsiteInfo {
                    url,
                    scraped_data: Some(scraped),
                }))))
            },
            Err(e) => {
                writeln!(self.output, "  {e}")?;
                Ok(Action::Retry)
            },
        }
    }

    fn details(&mut self) -> anyhow::Result<Action> {
        let prefill = self.flow.details_prefill();
        let mut answers = Vec::with_capacity(3);
        for (label, default) in [
            ("Practice name", prefill.practice_name),
            ("Business type", prefill.business_type),
            ("Location", prefill.location),
        ] {
            let prompt = if default.is_empty() {
                format!("{label}:")
            } else {
                format!("{label} [{default}]:")
            };
            match self.ask(&prompt)? {
                Reply::Text(value) if value.is_empty() => answers.push(default),
                Reply::Text(value) => answers.push(value),
                Reply::Skip => {
                    writeln!(self.output, "  This step cannot be skipped.")?;
                    return Ok(Action::Retry);
                },
                Reply::Back => return Ok(Action::Back),
                Reply::Eof => return Ok(Action::Quit),
            }
        }
        let [practice_name, business_type, location]: [String; 3] = answers
            .try_into()
            .map_err(|_| anyhow::anyhow!("expected three answers"))?;
        Ok(Action::Submit(Submission::Details(BusinessDetails {
            practice_name,
            business_type,
            location,
        })))
    }

    async fn knowledge(&mut self) -> anyhow::Result<Action> {
        let paths = match self.ask("Paths of .txt/.md files, comma separated (or 'skip'):")? {
            Reply::Text(paths) if !paths.is_empty() => paths,
            Reply::Text(_) | Reply::Skip => return Ok(Action::Submit(Submission::Knowledge(None))),
            Reply::Back => return Ok(Action::Back),
            Reply::Eof => return Ok(Action::Quit),
        };

        let mut documents = Vec::new();
        for path in paths.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match read_document(Path::new(path)).await {
                Ok(doc) => documents.push(doc),
                Err(e) => writeln!(self.output, "  Cannot read {path}: {e}")?,
            }
        }
        if documents.is_empty() {
            return Ok(Action::Retry);
        }

        let request = IngestRequest {
            tenant_id: self.flow.tenant_id(),
            documents: Some(documents),
        };
        match self.services.ingest.ingest(request).await {
            Ok(report) => {
                writeln!(
                    self.output,
                    "  Uploaded {} of {} document(s) to {}.",
                    report.inserted, report.total, report.collection
                )?;
                Ok(Action::Submit(Submission::Knowledge(Some(KnowledgeSummary {
                    uploaded: report.inserted,
                    skipped: report.skipped,
                    collection: Some(report.collection),
                }))))
            },
            Err(e) => {
                writeln!(self.output, "  Upload failed: {e}")?;
                Ok(Action::Retry)
            },
        }
    }

    async fn phone(&mut self) -> anyhow::Result<Action> {
        writeln!(self.output, "  Allocating phone numbers...")?;
        let allocation = match self.services.phone.allocate(PhoneRequest::default()).await {
            Ok(allocation) => allocation,
            Err(e) => {
                writeln!(self.output, "  {e}")?;
                return match self.ask("Press Enter to retry:")? {
                    Reply::Back => Ok(Action::Back),
                    Reply::Eof => Ok(Action::Quit),
                    Reply::Text(_) | Reply::Skip => Ok(Action::Retry),
                };
            },
        };
        writeln!(
            self.output,
            "  Inbound:  {}\n  Outbound: {}",
            allocation.numbers.inbound_number, allocation.numbers.outbound_number
        )?;
        match self.ask("Press Enter to continue ('retry' for other numbers):")? {
            Reply::Text(t) if t.eq_ignore_ascii_case("retry") => Ok(Action::Retry),
            Reply::Text(_) => Ok(Action::Submit(Submission::Phone(allocation.numbers))),
            Reply::Skip => {
                writeln!(self.output, "  This step cannot be skipped.")?;
                Ok(Action::Retry)
            },
            Reply::Back => Ok(Action::Back),
            Reply::Eof => Ok(Action::Quit),
        }
    }

    async fn integration(
        &mut self,
        catalog: &[(&str, &str)],
        submit: fn(Option<IntegrationChoice>) -> Submission,
    ) -> anyhow::Result<Action> {
        for (i, (_, name)) in catalog.iter().enumerate() {
            writeln!(self.output, "  {}. {name}", i + 1)?;
        }
        let answer = match self.ask("Choose a provider (or 'skip'):")? {
            Reply::Text(answer) if !answer.is_empty() => answer,
            Reply::Text(_) => return Ok(Action::Retry),
            Reply::Skip => return Ok(Action::Submit(submit(None))),
            Reply::Back => return Ok(Action::Back),
            Reply::Eof => return Ok(Action::Quit),
        };

        let Some((id, name)) = pick(catalog, &answer) else {
            writeln!(self.output, "  Unknown provider: {answer}")?;
            return Ok(Action::Retry);
        };
        writeln!(self.output, "  Connecting {name}...")?;
        match self.services.integrations.connect(id).await {
            Ok(()) => {
                writeln!(self.output, "  {name} connected.")?;
                Ok(Action::Submit(submit(Some(IntegrationChoice::new(id)))))
            },
            Err(e) => {
                writeln!(self.output, "  {e}")?;
                Ok(Action::Retry)
            },
        }
    }

    fn summary(&mut self, data: &OnboardingData) -> anyhow::Result<()> {
        writeln!(self.output, "\nOnboarding complete!")?;
        if let Some(details) = data.details.provided() {
            writeln!(
                self.output,
                "  {} ({}, {})",
                details.practice_name, details.business_type, details.location
            )?;
        }
        if let Some(phone) = data.phone.provided() {
            writeln!(self.output, "  Inbound number: {}", phone.inbound_number)?;
        }
        writeln!(self.output, "  Tenant: {}", derive_tenant_id(data))?;
        Ok(())
    }
}

/// Match a 1-based index, a provider id or a display name.
fn pick<'c>(catalog: &[(&'c str, &'c str)], answer: &str) -> Option<(&'c str, &'c str)> {
    if let Ok(n) = answer.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| catalog.get(i)).copied();
    }
    catalog
        .iter()
        .find(|(id, name)| id.eq_ignore_ascii_case(answer) || name.eq_ignore_ascii_case(answer))
        .copied()
}

async fn read_document(path: &Path) -> std::io::Result<Document> {
    let content = tokio::fs::read_to_string(path).await?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Document {
        filename,
        content,
        metadata: None,
    })
}
