use std::{io::Write, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    load_settings, FormController, FormEvent, FormSurface, HttpRegistrationApi, MemoryFieldCache,
    PriceQuote, StatusKind, SubmissionOutcome, SubmitAttempt,
};
use shared::{domain::FieldName, error::MSG_PRICE_UNAVAILABLE};
use tracing_subscriber::EnvFilter;

/// Submits one BBQ registration without opening a window.
#[derive(Parser, Debug)]
struct Cli {
    /// Overrides `server_url` from signup.toml / APP__SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    price_per_adult: Option<f64>,
    /// Milliseconds to wait before printing the redirect target.
    #[arg(long, default_value_t = 0)]
    redirect_delay_ms: u64,
    #[arg(long)]
    name: String,
    #[arg(long)]
    house_number: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "1")]
    adults: String,
    #[arg(long, default_value = "0")]
    children: String,
    #[arg(long, default_value = "")]
    notes: String,
}

impl Cli {
    fn field_inputs(&self) -> [(FieldName, &str); 7] {
        [
            (FieldName::Name, self.name.as_str()),
            (FieldName::HouseNumber, self.house_number.as_str()),
            (FieldName::Email, self.email.as_str()),
            (FieldName::Phone, self.phone.as_str()),
            (FieldName::PersonsAdults, self.adults.as_str()),
            (FieldName::PersonsChildren, self.children.as_str()),
            (FieldName::AllergiesNotes, self.notes.as_str()),
        ]
    }
}

/// Prints controller output as plain lines.
struct StdoutSurface<W: Write> {
    out: W,
}

impl<W: Write> StdoutSurface<W> {
    fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{text}") {
            tracing::warn!("failed to write output: {err}");
        }
    }
}

impl<W: Write> FormSurface for StdoutSurface<W> {
    fn show_field_error(&mut self, field: FieldName, message: &str) {
        self.line(format_args!("! {}: {message}", field.label()));
    }

    fn clear_field_error(&mut self, _field: FieldName) {}

    fn clear_all_field_errors(&mut self) {}

    fn set_field_value(&mut self, _field: FieldName, _value: &str) {}

    fn show_price(&mut self, quote: Option<&PriceQuote>) {
        match quote {
            Some(quote) => self.line(format_args!(
                "totaal: {} ({} volwassene(n))",
                quote.display(),
                quote.adults
            )),
            None => self.line(format_args!("totaal: {MSG_PRICE_UNAVAILABLE}")),
        }
    }

    fn show_status(&mut self, kind: StatusKind, message: &str) {
        let tag = match kind {
            StatusKind::Info => "info",
            StatusKind::Success => "ok",
            StatusKind::Error => "fout",
        };
        self.line(format_args!("[{tag}] {message}"));
    }

    fn set_submit_busy(&mut self, _busy: bool) {}

    fn navigate(&mut self, url: &str) {
        self.line(format_args!("betalen: {url}"));
    }

    fn alert(&mut self, message: &str) {
        self.line(format_args!("{message}"));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(server_url) = cli.server_url.clone() {
        settings.server_url = server_url;
    }
    if cli.price_per_adult.is_some() {
        settings.price_per_adult = cli.price_per_adult;
    }

    let api = HttpRegistrationApi::from_settings(&settings)
        .context("failed to prepare registration client")?;
    let mut config = settings.controller_config();
    config.redirect_delay = Duration::from_millis(cli.redirect_delay_ms);

    let mut controller = FormController::new(
        StdoutSurface::new(std::io::stdout()),
        Arc::new(api),
        Box::new(MemoryFieldCache::new()),
        config,
    );

    controller.dispatch(FormEvent::PageLoaded).await;
    for (field, value) in cli.field_inputs() {
        controller
            .dispatch(FormEvent::Input {
                field,
                value: value.to_string(),
            })
            .await;
    }

    if let Some(SubmitAttempt::Rejected(report)) = controller.dispatch(FormEvent::Submit).await {
        bail!("{} field(s) need attention", report.errors().len());
    }
    match controller.last_outcome() {
        Some(SubmissionOutcome::Succeeded { .. }) => Ok(()),
        Some(SubmissionOutcome::Failed { message }) => bail!(message.clone()),
        other => bail!("registration did not complete: {other:?}"),
    }
}
