//! Bridge between the UI thread and the backend worker hosting the form controller.

pub mod commands;
pub mod runtime;
