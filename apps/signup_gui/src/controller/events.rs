//! Backend-to-UI events and the surface that produces them.

use client_core::{FormSurface, PriceQuote, StatusKind};
use crossbeam_channel::{Sender, TrySendError};
use shared::domain::FieldName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    FieldError { field: FieldName, message: String },
    FieldErrorCleared(FieldName),
    AllFieldErrorsCleared,
    FieldValue { field: FieldName, value: String },
    /// `None` when no price per adult is configured.
    Price(Option<String>),
    Status { kind: StatusKind, message: String },
    SubmitBusy(bool),
    Navigate(String),
    Alert(String),
    BackendFailed(String),
}

/// Renders controller output by forwarding it to the UI thread.
#[derive(Debug, Clone)]
pub struct ChannelSurface {
    ui_tx: Sender<UiEvent>,
}

impl ChannelSurface {
    pub fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }

    fn emit(&self, event: UiEvent) {
        match self.ui_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "ui event queue full; dropping event");
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!("ui event queue disconnected");
            }
        }
    }
}

impl FormSurface for ChannelSurface {
    fn show_field_error(&mut self, field: FieldName, message: &str) {
        self.emit(UiEvent::FieldError {
            field,
            message: message.to_string(),
        });
    }

    fn clear_field_error(&mut self, field: FieldName) {
        self.emit(UiEvent::FieldErrorCleared(field));
    }

    fn clear_all_field_errors(&mut self) {
        self.emit(UiEvent::AllFieldErrorsCleared);
    }

    fn set_field_value(&mut self, field: FieldName, value: &str) {
        self.emit(UiEvent::FieldValue {
            field,
            value: value.to_string(),
        });
    }

    fn show_price(&mut self, quote: Option<&PriceQuote>) {
        self.emit(UiEvent::Price(quote.map(PriceQuote::display)));
    }

    fn show_status(&mut self, kind: StatusKind, message: &str) {
        self.emit(UiEvent::Status {
            kind,
            message: message.to_string(),
        });
    }

    fn set_submit_busy(&mut self, busy: bool) {
        self.emit(UiEvent::SubmitBusy(busy));
    }

    fn navigate(&mut self, url: &str) {
        self.emit(UiEvent::Navigate(url.to_string()));
    }

    fn alert(&mut self, message: &str) {
        self.emit(UiEvent::Alert(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use shared::domain::Money;

    #[test]
    fn surface_calls_arrive_as_ui_events_in_order() {
        let (ui_tx, ui_rx) = bounded(16);
        let mut surface = ChannelSurface::new(ui_tx);

        surface.set_submit_busy(true);
        surface.show_price(Some(&PriceQuote::new(3, Money::from_cents(1000))));
        surface.show_price(None);
        surface.show_field_error(FieldName::Email, "Voer een geldig e-mailadres in");

        let events: Vec<_> = ui_rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                UiEvent::SubmitBusy(true),
                UiEvent::Price(Some("€30.00".to_string())),
                UiEvent::Price(None),
                UiEvent::FieldError {
                    field: FieldName::Email,
                    message: "Voer een geldig e-mailadres in".to_string(),
                },
            ]
        );
    }

    #[test]
    fn full_queue_drops_events_without_panicking() {
        let (ui_tx, ui_rx) = bounded(1);
        let mut surface = ChannelSurface::new(ui_tx);
        surface.set_submit_busy(true);
        surface.set_submit_busy(false);
        assert_eq!(ui_rx.try_iter().count(), 1);
    }
}
