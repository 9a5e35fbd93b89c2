use super::*;

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::{
    error::{FieldErrorKind, MSG_NETWORK_FAILURE},
    protocol::{RegisterRequest, RegistrationReceipt},
};

use crate::cache::MemoryFieldCache;

const PAYMENT_URL: &str = "https://bunq.me/kamperwegBBQ/30.00/BBQ%20Jan";
const SUCCESS_URL: &str = "http://127.0.0.1:5000/success";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    FieldError(FieldName, String),
    ClearFieldError(FieldName),
    ClearAllFieldErrors,
    SetValue(FieldName, String),
    Price(Option<String>),
    Status(StatusKind, String),
    Busy(bool),
    Navigate(String),
    Alert(String),
}

#[derive(Default)]
struct RecordingSurface {
    calls: Vec<Call>,
}

impl RecordingSurface {
    fn busy_toggles(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Busy(busy) => Some(*busy),
                _ => None,
            })
            .collect()
    }

    fn last_status(&self) -> Option<(StatusKind, String)> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::Status(kind, message) => Some((*kind, message.clone())),
            _ => None,
        })
    }

    fn last_price(&self) -> Option<Option<String>> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::Price(price) => Some(price.clone()),
            _ => None,
        })
    }

    /// Replays error show/clear calls into what is currently visible.
    fn visible_errors(&self) -> BTreeMap<FieldName, String> {
        let mut visible = BTreeMap::new();
        for call in &self.calls {
            match call {
                Call::FieldError(field, message) => {
                    visible.insert(*field, message.clone());
                }
                Call::ClearFieldError(field) => {
                    visible.remove(field);
                }
                Call::ClearAllFieldErrors => visible.clear(),
                _ => {}
            }
        }
        visible
    }
}

impl FormSurface for RecordingSurface {
    fn show_field_error(&mut self, field: FieldName, message: &str) {
        self.calls.push(Call::FieldError(field, message.to_string()));
    }

    fn clear_field_error(&mut self, field: FieldName) {
        self.calls.push(Call::ClearFieldError(field));
    }

    fn clear_all_field_errors(&mut self) {
        self.calls.push(Call::ClearAllFieldErrors);
    }

    fn set_field_value(&mut self, field: FieldName, value: &str) {
        self.calls.push(Call::SetValue(field, value.to_string()));
    }

    fn show_price(&mut self, quote: Option<&PriceQuote>) {
        self.calls.push(Call::Price(quote.map(PriceQuote::display)));
    }

    fn show_status(&mut self, kind: StatusKind, message: &str) {
        self.calls.push(Call::Status(kind, message.to_string()));
    }

    fn set_submit_busy(&mut self, busy: bool) {
        self.calls.push(Call::Busy(busy));
    }

    fn navigate(&mut self, url: &str) {
        self.calls.push(Call::Navigate(url.to_string()));
    }

    fn alert(&mut self, message: &str) {
        self.calls.push(Call::Alert(message.to_string()));
    }
}

struct StubApi {
    reply: Result<RegistrationReceipt, SubmitError>,
    requests: Arc<Mutex<Vec<RegisterRequest>>>,
}

#[async_trait]
impl RegistrationApi for StubApi {
    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<RegistrationReceipt, SubmitError> {
        self.requests.lock().expect("requests").push(request.clone());
        self.reply.clone()
    }
}

#[derive(Clone, Default)]
struct SharedCache(Arc<Mutex<MemoryFieldCache>>);

impl FieldCache for SharedCache {
    fn load(&self, field: FieldName) -> Option<String> {
        self.0.lock().expect("cache").load(field)
    }

    fn store(&mut self, field: FieldName, value: &str) {
        self.0.lock().expect("cache").store(field, value);
    }

    fn clear(&mut self) {
        self.0.lock().expect("cache").clear();
    }
}

struct Harness {
    controller: FormController<RecordingSurface>,
    requests: Arc<Mutex<Vec<RegisterRequest>>>,
    cache: SharedCache,
}

impl Harness {
    fn new(reply: Result<RegistrationReceipt, SubmitError>) -> Self {
        Self::with_config(reply, test_config(Some(Money::from_cents(1000))), SharedCache::default())
    }

    fn with_config(
        reply: Result<RegistrationReceipt, SubmitError>,
        config: ControllerConfig,
        cache: SharedCache,
    ) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let api = Arc::new(StubApi {
            reply,
            requests: requests.clone(),
        });
        let controller = FormController::new(
            RecordingSurface::default(),
            api,
            Box::new(cache.clone()),
            config,
        );
        Self {
            controller,
            requests,
            cache,
        }
    }

    fn sent(&self) -> Vec<RegisterRequest> {
        self.requests.lock().expect("requests").clone()
    }

    async fn type_value(&mut self, field: FieldName, value: &str) {
        self.controller
            .dispatch(FormEvent::Input {
                field,
                value: value.to_string(),
            })
            .await;
    }

    async fn fill_jan(&mut self) {
        self.type_value(FieldName::Name, "Jan").await;
        self.type_value(FieldName::HouseNumber, "12b").await;
        self.type_value(FieldName::PersonsAdults, "3").await;
        self.type_value(FieldName::PersonsChildren, "1").await;
    }

    async fn submit(&mut self) -> SubmitAttempt {
        self.controller
            .dispatch(FormEvent::Submit)
            .await
            .expect("submit produces an attempt")
    }
}

fn test_config(price_per_adult: Option<Money>) -> ControllerConfig {
    ControllerConfig {
        price_per_adult,
        redirect_delay: Duration::ZERO,
        success_url: Some(SUCCESS_URL.to_string()),
    }
}

fn accepted(payment_url: Option<&str>) -> Result<RegistrationReceipt, SubmitError> {
    Ok(RegistrationReceipt {
        message: None,
        payment_url: payment_url.map(str::to_string),
        registration_id: Some(1),
    })
}

#[tokio::test]
async fn jan_registration_prices_submits_and_redirects() {
    let mut harness = Harness::new(accepted(Some(PAYMENT_URL)));
    harness.controller.dispatch(FormEvent::PageLoaded).await;
    harness.fill_jan().await;

    assert_eq!(
        harness.controller.surface().last_price(),
        Some(Some("€30.00".to_string()))
    );

    let attempt = harness.submit().await;
    assert_eq!(
        attempt,
        SubmitAttempt::Completed(SubmissionOutcome::Succeeded {
            redirect_url: Some(PAYMENT_URL.to_string()),
        })
    );

    let sent = harness.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].total_amount.as_deref(), Some("30.00"));
    assert_eq!(sent[0].persons_adults, 3);
    assert_eq!(sent[0].persons_children, 1);

    let surface = harness.controller.surface();
    assert_eq!(surface.busy_toggles(), vec![true, false]);
    assert_eq!(
        surface.last_status(),
        Some((StatusKind::Success, MSG_SUCCESS.to_string()))
    );
    assert_eq!(
        surface.calls.last(),
        Some(&Call::Navigate(PAYMENT_URL.to_string()))
    );
    assert_eq!(harness.controller.phase(), FormPhase::PendingRedirect);
    assert!(harness.cache.0.lock().expect("cache").is_empty());
}

#[tokio::test]
async fn server_rejection_shows_message_and_keeps_form() {
    let mut harness = Harness::new(Err(SubmitError::ServerRejection {
        status: 200,
        message: Some("Vol".to_string()),
    }));
    harness.fill_jan().await;
    let before = harness.controller.form().clone();

    let attempt = harness.submit().await;
    assert_eq!(
        attempt,
        SubmitAttempt::Completed(SubmissionOutcome::Failed {
            message: "Vol".to_string(),
        })
    );

    let surface = harness.controller.surface();
    assert_eq!(
        surface.last_status(),
        Some((StatusKind::Error, "Vol".to_string()))
    );
    assert_eq!(surface.busy_toggles(), vec![true, false]);
    assert_eq!(harness.controller.form(), &before);
    assert_eq!(harness.controller.phase(), FormPhase::Idle);
    assert_eq!(
        harness.cache.load(FieldName::Name).as_deref(),
        Some("Jan")
    );
}

#[tokio::test]
async fn network_failure_shows_connectivity_error_and_reenables_submit() {
    let mut harness = Harness::new(Err(SubmitError::NetworkFailure(
        "connection refused".to_string(),
    )));
    harness.fill_jan().await;

    harness.submit().await;

    let surface = harness.controller.surface();
    assert_eq!(
        surface.last_status(),
        Some((StatusKind::Error, MSG_NETWORK_FAILURE.to_string()))
    );
    assert_eq!(surface.busy_toggles(), vec![true, false]);
    assert_eq!(harness.controller.phase(), FormPhase::Idle);
    assert_eq!(
        harness.controller.last_outcome(),
        Some(&SubmissionOutcome::Failed {
            message: MSG_NETWORK_FAILURE.to_string(),
        })
    );

    // A failed attempt leaves the form ready for another try.
    harness.submit().await;
    assert_eq!(harness.sent().len(), 2);
}

#[tokio::test]
async fn zero_adults_never_reaches_the_server() {
    let mut harness = Harness::new(accepted(Some(PAYMENT_URL)));
    harness.fill_jan().await;
    harness.type_value(FieldName::PersonsAdults, "0").await;

    let report = match harness.submit().await {
        SubmitAttempt::Rejected(report) => report,
        other => panic!("expected validation rejection, got {other:?}"),
    };
    assert_eq!(
        report.error_for(FieldName::PersonsAdults).map(|err| err.kind),
        Some(FieldErrorKind::BelowMinimum)
    );
    assert!(harness.sent().is_empty());

    let surface = harness.controller.surface();
    assert_eq!(surface.busy_toggles(), vec![false]);
    assert!(surface
        .visible_errors()
        .contains_key(&FieldName::PersonsAdults));
    assert_eq!(harness.controller.phase(), FormPhase::Idle);
}

#[tokio::test]
async fn blur_shows_error_and_input_clears_it_without_revalidating() {
    let mut harness = Harness::new(accepted(None));
    harness.type_value(FieldName::HouseNumber, "46ab").await;
    harness
        .controller
        .dispatch(FormEvent::Blur {
            field: FieldName::HouseNumber,
        })
        .await;

    let shown = harness.controller.surface().visible_errors();
    let first_message = shown
        .get(&FieldName::HouseNumber)
        .cloned()
        .expect("house number error visible");
    assert_eq!(first_message, "Voer een geldig huisnummer in (bijv. 46 of 46a)");

    // Still invalid, but typing clears the indicator unconditionally.
    harness.type_value(FieldName::HouseNumber, "46abc").await;
    assert!(!harness
        .controller
        .surface()
        .visible_errors()
        .contains_key(&FieldName::HouseNumber));

    harness.type_value(FieldName::HouseNumber, "46ab").await;
    harness.submit().await;
    assert_eq!(
        harness
            .controller
            .surface()
            .visible_errors()
            .get(&FieldName::HouseNumber),
        Some(&first_message)
    );
}

#[tokio::test]
async fn submit_after_success_is_ignored() {
    let mut harness = Harness::new(accepted(Some(PAYMENT_URL)));
    harness.fill_jan().await;
    harness.submit().await;

    assert_eq!(harness.submit().await, SubmitAttempt::Busy);
    assert_eq!(harness.sent().len(), 1);
    assert_eq!(harness.controller.surface().busy_toggles(), vec![true, false]);
}

#[tokio::test]
async fn success_without_payment_url_uses_success_destination() {
    let mut harness = Harness::new(accepted(None));
    harness.fill_jan().await;
    harness.submit().await;
    assert_eq!(
        harness.controller.surface().calls.last(),
        Some(&Call::Navigate(SUCCESS_URL.to_string()))
    );
}

#[tokio::test]
async fn success_without_any_destination_alerts() {
    let config = ControllerConfig {
        success_url: None,
        ..test_config(Some(Money::from_cents(1000)))
    };
    let mut harness = Harness::with_config(accepted(None), config, SharedCache::default());
    harness.fill_jan().await;
    harness.submit().await;
    assert_eq!(
        harness.controller.surface().calls.last(),
        Some(&Call::Alert(MSG_REGISTERED.to_string()))
    );
}

#[tokio::test]
async fn missing_price_disables_preview_but_not_submission() {
    let mut harness =
        Harness::with_config(accepted(None), test_config(None), SharedCache::default());
    harness.controller.dispatch(FormEvent::PageLoaded).await;
    assert_eq!(harness.controller.surface().last_price(), Some(None));

    harness.fill_jan().await;
    assert_eq!(harness.controller.price_quote(), None);

    harness.submit().await;
    let sent = harness.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].total_amount, None);
}

#[tokio::test]
async fn children_count_never_changes_the_price() {
    let mut harness = Harness::new(accepted(None));
    harness.type_value(FieldName::PersonsAdults, "2").await;
    let calls_before = harness.controller.surface().calls.len();

    harness.type_value(FieldName::PersonsChildren, "5").await;
    let new_calls = &harness.controller.surface().calls[calls_before..];
    assert!(!new_calls.iter().any(|call| matches!(call, Call::Price(_))));
    assert_eq!(
        harness.controller.price_quote().map(|quote| quote.display()),
        Some("€20.00".to_string())
    );
}

#[tokio::test]
async fn page_load_restores_cached_values_into_empty_fields() {
    let mut cache = SharedCache::default();
    cache.store(FieldName::Name, "Marieke");
    cache.store(FieldName::PersonsAdults, "2");

    let mut harness = Harness::with_config(
        accepted(None),
        test_config(Some(Money::from_cents(2850))),
        cache,
    );
    harness.controller.dispatch(FormEvent::PageLoaded).await;

    assert_eq!(harness.controller.form().name, "Marieke");
    assert_eq!(harness.controller.form().persons_adults, "2");
    let surface = harness.controller.surface();
    assert!(surface
        .calls
        .contains(&Call::SetValue(FieldName::Name, "Marieke".to_string())));
    assert_eq!(surface.last_price(), Some(Some("€57.00".to_string())));
}

/// Recording surface that stays readable while a submit is in flight.
#[derive(Clone, Default)]
struct SharedSurface(Arc<Mutex<RecordingSurface>>);

impl SharedSurface {
    fn calls(&self) -> Vec<Call> {
        self.0.lock().expect("surface").calls.clone()
    }
}

impl FormSurface for SharedSurface {
    fn show_field_error(&mut self, field: FieldName, message: &str) {
        self.0.lock().expect("surface").show_field_error(field, message);
    }

    fn clear_field_error(&mut self, field: FieldName) {
        self.0.lock().expect("surface").clear_field_error(field);
    }

    fn clear_all_field_errors(&mut self) {
        self.0.lock().expect("surface").clear_all_field_errors();
    }

    fn set_field_value(&mut self, field: FieldName, value: &str) {
        self.0.lock().expect("surface").set_field_value(field, value);
    }

    fn show_price(&mut self, quote: Option<&PriceQuote>) {
        self.0.lock().expect("surface").show_price(quote);
    }

    fn show_status(&mut self, kind: StatusKind, message: &str) {
        self.0.lock().expect("surface").show_status(kind, message);
    }

    fn set_submit_busy(&mut self, busy: bool) {
        self.0.lock().expect("surface").set_submit_busy(busy);
    }

    fn navigate(&mut self, url: &str) {
        self.0.lock().expect("surface").navigate(url);
    }

    fn alert(&mut self, message: &str) {
        self.0.lock().expect("surface").alert(message);
    }
}

#[tokio::test(start_paused = true)]
async fn submit_is_released_before_redirect_delay_and_navigation_waits_for_it() {
    let surface = SharedSurface::default();
    let api = Arc::new(StubApi {
        reply: accepted(Some(PAYMENT_URL)),
        requests: Arc::new(Mutex::new(Vec::new())),
    });
    let config = ControllerConfig {
        redirect_delay: Duration::from_secs(2),
        ..test_config(Some(Money::from_cents(1000)))
    };
    let mut controller = FormController::new(
        surface.clone(),
        api,
        Box::new(MemoryFieldCache::new()),
        config,
    );
    controller.on_input(FieldName::Name, "Jan");
    controller.on_input(FieldName::HouseNumber, "12b");
    controller.on_input(FieldName::PersonsAdults, "3");

    let started = tokio::time::Instant::now();
    let submit = tokio::spawn(async move { controller.submit().await });

    tokio::time::sleep(Duration::from_millis(1900)).await;
    let calls = surface.calls();
    assert!(calls.contains(&Call::Busy(false)));
    assert!(!calls
        .iter()
        .any(|call| matches!(call, Call::Navigate(_) | Call::Alert(_))));

    let attempt = submit.await.expect("submit task");
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(
        attempt,
        SubmitAttempt::Completed(SubmissionOutcome::Succeeded {
            redirect_url: Some(PAYMENT_URL.to_string()),
        })
    );

    let calls = surface.calls();
    let released = calls
        .iter()
        .position(|call| call == &Call::Busy(false))
        .expect("busy released");
    let navigated = calls
        .iter()
        .position(|call| call == &Call::Navigate(PAYMENT_URL.to_string()))
        .expect("navigated");
    assert!(released < navigated);
    assert_eq!(calls.last(), Some(&Call::Navigate(PAYMENT_URL.to_string())));
}
