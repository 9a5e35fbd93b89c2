use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use client_core::StatusKind;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{domain::FieldName, error::MSG_PRICE_UNAVAILABLE};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};

const INFO_STATUS_TTL: Duration = Duration::from_secs(5);
const ERROR_TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(231, 76, 60);

#[derive(Debug, Clone)]
struct StatusLine {
    kind: StatusKind,
    message: String,
    shown_at: Instant,
}

impl StatusLine {
    fn expired(&self) -> bool {
        self.kind == StatusKind::Info && self.shown_at.elapsed() >= INFO_STATUS_TTL
    }

    fn colors(&self) -> (egui::Color32, &'static str) {
        match self.kind {
            StatusKind::Info => (egui::Color32::from_rgb(52, 84, 122), "ℹ"),
            StatusKind::Success => (egui::Color32::from_rgb(46, 110, 64), "✔"),
            StatusKind::Error => (egui::Color32::from_rgb(111, 53, 53), "✖"),
        }
    }
}

pub struct SignupApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    values: BTreeMap<FieldName, String>,
    field_errors: BTreeMap<FieldName, String>,
    price_text: String,
    status: Option<StatusLine>,
    submit_busy: bool,
    queue_status: String,
    alert: Option<String>,
    backend_failed: bool,
}

impl SignupApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            values: BTreeMap::new(),
            field_errors: BTreeMap::new(),
            price_text: String::new(),
            status: None,
            submit_busy: false,
            queue_status: String::new(),
            alert: None,
            backend_failed: false,
        };
        app.send(BackendCommand::PageLoaded);
        app
    }

    /// Locks the button until the worker reports the attempt finished, so a
    /// second click cannot queue another submission.
    fn request_submit(&mut self) {
        if self.submit_busy {
            return;
        }
        self.submit_busy = true;
        self.send(BackendCommand::Submit);
    }

    fn send(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.queue_status);
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::FieldError { field, message } => {
                    self.field_errors.insert(field, message);
                }
                UiEvent::FieldErrorCleared(field) => {
                    self.field_errors.remove(&field);
                }
                UiEvent::AllFieldErrorsCleared => self.field_errors.clear(),
                UiEvent::FieldValue { field, value } => {
                    self.values.insert(field, value);
                }
                UiEvent::Price(text) => {
                    self.price_text = text.unwrap_or_else(|| MSG_PRICE_UNAVAILABLE.to_string());
                }
                UiEvent::Status { kind, message } => {
                    self.status = Some(StatusLine {
                        kind,
                        message,
                        shown_at: Instant::now(),
                    });
                }
                UiEvent::SubmitBusy(busy) => self.submit_busy = busy,
                UiEvent::Navigate(url) => {
                    ctx.open_url(egui::OpenUrl::new_tab(&url));
                    self.queue_status = format!("Doorgestuurd naar {url}");
                }
                UiEvent::Alert(message) => self.alert = Some(message),
                UiEvent::BackendFailed(message) => {
                    self.backend_failed = true;
                    self.status = Some(StatusLine {
                        kind: StatusKind::Error,
                        message,
                        shown_at: Instant::now(),
                    });
                }
            }
        }

        if self.status.as_ref().is_some_and(StatusLine::expired) {
            self.status = None;
        }
    }

    fn show_status_line(&mut self, ui: &mut egui::Ui) {
        let Some(status) = self.status.clone() else {
            return;
        };
        let (fill, icon) = status.colors();
        egui::Frame::NONE
            .fill(fill)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(icon).color(egui::Color32::WHITE));
                    ui.label(egui::RichText::new(&status.message).color(egui::Color32::WHITE));
                });
            });
        ui.add_space(8.0);
    }

    fn field_row(&mut self, ui: &mut egui::Ui, field: FieldName) {
        let label = if field.is_required() {
            format!("{} *", field.label())
        } else {
            field.label().to_string()
        };
        ui.label(egui::RichText::new(label).strong());

        let value = self.values.entry(field).or_default();
        let edit = if field == FieldName::AllergiesNotes {
            egui::TextEdit::multiline(&mut *value).desired_rows(3)
        } else {
            egui::TextEdit::singleline(&mut *value)
        }
        .id_salt(field.as_str())
        .desired_width(f32::INFINITY);
        let response = ui.add(edit);
        let changed = response.changed().then(|| value.clone());

        if let Some(value) = changed {
            self.send(BackendCommand::Input { field, value });
        }
        if response.lost_focus() {
            self.send(BackendCommand::Blur { field });
        }
        if let Some(message) = self.field_errors.get(&field) {
            ui.label(
                egui::RichText::new(message)
                    .color(ERROR_TEXT_COLOR)
                    .small(),
            );
        }
        ui.add_space(6.0);
    }

    fn show_form(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("BBQ aanmelding");
                ui.weak("Kinderen eten gratis mee.");
                ui.add_space(10.0);

                self.show_status_line(ui);

                for field in FieldName::ALL {
                    self.field_row(ui, field);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("Totaal:");
                    ui.strong(&self.price_text);
                });
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let label = if self.submit_busy {
                        "Bezig met verwerken..."
                    } else {
                        "Aanmelden"
                    };
                    let button = egui::Button::new(egui::RichText::new(label).strong())
                        .min_size(egui::vec2(160.0, 36.0));
                    let enabled = !self.submit_busy && !self.backend_failed;
                    if ui.add_enabled(enabled, button).clicked() {
                        self.request_submit();
                    }
                    if self.submit_busy {
                        ui.spinner();
                    }
                });

                if !self.queue_status.is_empty() {
                    ui.add_space(6.0);
                    ui.small(egui::RichText::new(&self.queue_status).weak());
                }
            });
        });
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };
        egui::Window::new("Aanmelding")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    self.alert = None;
                }
            });
    }
}

impl eframe::App for SignupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);
        self.show_form(ctx);
        self.show_alert(ctx);

        if self.submit_busy {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
