//! Form commands queued from the UI thread to the backend worker.

use client_core::FormEvent;
use shared::domain::FieldName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    PageLoaded,
    Input { field: FieldName, value: String },
    Blur { field: FieldName },
    Submit,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::PageLoaded => "page_loaded",
            BackendCommand::Input { .. } => "input",
            BackendCommand::Blur { .. } => "blur",
            BackendCommand::Submit => "submit",
        }
    }
}

impl From<BackendCommand> for FormEvent {
    fn from(value: BackendCommand) -> Self {
        match value {
            BackendCommand::PageLoaded => FormEvent::PageLoaded,
            BackendCommand::Input { field, value } => FormEvent::Input { field, value },
            BackendCommand::Blur { field } => FormEvent::Blur { field },
            BackendCommand::Submit => FormEvent::Submit,
        }
    }
}
