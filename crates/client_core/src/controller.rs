//! Registration form controller: validation on blur/submit, live pricing, and
//! the single-attempt submission workflow.
//!
//! One submission attempt moves through
//! `Idle -> Validating -> (Idle | Submitting -> (Idle | PendingRedirect))`.
//! A submit that arrives outside `Idle` is ignored.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{FieldName, Money, RegistrationForm},
    error::{
        ConfigError, FieldError, SubmitError, MSG_PROCESSING, MSG_REGISTERED, MSG_SUCCESS,
    },
};
use tracing::{debug, error, info, warn};

use crate::{
    cache::FieldCache,
    pricing::{quote_for_input, PriceQuote},
    surface::{FormSurface, StatusKind},
    validation::{build_request, validate_field, ValidationReport},
    RegistrationApi,
};

pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// `None` disables the price preview and omits `totalAmount`.
    pub price_per_adult: Option<Money>,
    pub redirect_delay: Duration,
    /// Destination when the server accepts without a payment URL.
    pub success_url: Option<String>,
}

impl ControllerConfig {
    pub fn new(price_per_adult: Option<Money>) -> Self {
        Self {
            price_per_adult,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            success_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    PageLoaded,
    Input { field: FieldName, value: String },
    Blur { field: FieldName },
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Validating,
    Submitting,
    PendingRedirect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Pending,
    Succeeded { redirect_url: Option<String> },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// Another attempt is in flight or the form already completed.
    Busy,
    /// Client-side validation failed; nothing was sent.
    Rejected(ValidationReport),
    Completed(SubmissionOutcome),
}

pub struct FormController<S: FormSurface> {
    surface: S,
    api: Arc<dyn RegistrationApi>,
    cache: Box<dyn FieldCache>,
    config: ControllerConfig,
    form: RegistrationForm,
    phase: FormPhase,
    last_outcome: Option<SubmissionOutcome>,
}

impl<S: FormSurface> FormController<S> {
    pub fn new(
        surface: S,
        api: Arc<dyn RegistrationApi>,
        cache: Box<dyn FieldCache>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            surface,
            api,
            cache,
            config,
            form: RegistrationForm::default(),
            phase: FormPhase::Idle,
            last_outcome: None,
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn last_outcome(&self) -> Option<&SubmissionOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn price_quote(&self) -> Option<PriceQuote> {
        self.config
            .price_per_adult
            .map(|per_adult| quote_for_input(&self.form.persons_adults, per_adult))
    }

    /// Routes one UI event. Only `Submit` produces an attempt result.
    pub async fn dispatch(&mut self, event: FormEvent) -> Option<SubmitAttempt> {
        match event {
            FormEvent::PageLoaded => {
                self.initialize();
                None
            }
            FormEvent::Input { field, value } => {
                self.on_input(field, value);
                None
            }
            FormEvent::Blur { field } => {
                let _ = self.on_blur(field);
                None
            }
            FormEvent::Submit => Some(self.submit().await),
        }
    }

    /// Restores cached values into empty fields and renders the first price.
    pub fn initialize(&mut self) {
        for field in FieldName::ALL {
            if !self.form.value(field).is_empty() {
                continue;
            }
            if let Some(saved) = self.cache.load(field).filter(|value| !value.is_empty()) {
                debug!(field = field.as_str(), "restored cached field value");
                self.surface.set_field_value(field, &saved);
                self.form.set(field, saved);
            }
        }

        if self.config.price_per_adult.is_none() {
            error!("{}; price preview disabled", ConfigError::PricePerAdultMissing);
        }
        self.refresh_price();
    }

    /// Typing clears the field's error without re-validating it.
    pub fn on_input(&mut self, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        self.surface.clear_field_error(field);
        self.cache.store(field, &value);
        self.form.set(field, value);
        if field == FieldName::PersonsAdults {
            self.refresh_price();
        }
    }

    pub fn on_blur(&mut self, field: FieldName) -> Result<(), FieldError> {
        self.surface.clear_field_error(field);
        let result = validate_field(field, self.form.value(field));
        if let Err(err) = &result {
            self.surface.show_field_error(field, &err.message);
        }
        result
    }

    fn refresh_price(&mut self) {
        let quote = self.price_quote();
        self.surface.show_price(quote.as_ref());
    }

    pub async fn submit(&mut self) -> SubmitAttempt {
        if self.phase != FormPhase::Idle {
            debug!(phase = ?self.phase, "submit ignored: attempt already active");
            return SubmitAttempt::Busy;
        }

        self.phase = FormPhase::Validating;
        self.surface.clear_all_field_errors();
        let total = self.price_quote().map(|quote| quote.total);
        let request = match build_request(&self.form, total) {
            Ok(request) => request,
            Err(report) => {
                for err in report.errors() {
                    self.surface.show_field_error(err.field, &err.message);
                }
                debug!(errors = report.errors().len(), "submit blocked by validation");
                // Front-ends may lock the control on click; nothing was sent.
                self.surface.set_submit_busy(false);
                self.phase = FormPhase::Idle;
                return SubmitAttempt::Rejected(report);
            }
        };

        self.phase = FormPhase::Submitting;
        self.last_outcome = Some(SubmissionOutcome::Pending);
        self.surface.set_submit_busy(true);
        self.surface.show_status(StatusKind::Info, MSG_PROCESSING);

        let outcome = match self.api.register(&request).await {
            Ok(receipt) => {
                info!(
                    registration_id = ?receipt.registration_id,
                    has_payment_url = receipt.payment_url.is_some(),
                    "registration accepted"
                );
                self.surface.show_status(StatusKind::Success, MSG_SUCCESS);
                SubmissionOutcome::Succeeded {
                    redirect_url: receipt.payment_url,
                }
            }
            Err(err) => {
                match &err {
                    SubmitError::ServerRejection { .. } => warn!("{err}"),
                    SubmitError::NetworkFailure(_) => error!("{err}"),
                }
                let message = err.user_message();
                self.surface.show_status(StatusKind::Error, &message);
                SubmissionOutcome::Failed { message }
            }
        };

        // Exactly once per attempt, and before any redirect delay.
        self.surface.set_submit_busy(false);
        self.last_outcome = Some(outcome.clone());

        match &outcome {
            SubmissionOutcome::Succeeded { redirect_url } => {
                self.cache.clear();
                self.phase = FormPhase::PendingRedirect;
                self.follow_redirect(redirect_url.clone()).await;
            }
            _ => self.phase = FormPhase::Idle,
        }

        SubmitAttempt::Completed(outcome)
    }

    async fn follow_redirect(&mut self, payment_url: Option<String>) {
        tokio::time::sleep(self.config.redirect_delay).await;
        match payment_url.or_else(|| self.config.success_url.clone()) {
            Some(url) => {
                info!(%url, "leaving form after registration");
                self.surface.navigate(&url);
            }
            None => self.surface.alert(MSG_REGISTERED),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
