//! The page or window the controller drives.

use shared::domain::FieldName;

use crate::pricing::PriceQuote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Everything the controller may change on screen. Implementations only
/// render; no method may call back into the controller.
pub trait FormSurface {
    fn show_field_error(&mut self, field: FieldName, message: &str);
    fn clear_field_error(&mut self, field: FieldName);
    fn clear_all_field_errors(&mut self);
    /// Puts a value into an input without the user typing it (cache restore).
    fn set_field_value(&mut self, field: FieldName, value: &str);
    /// `None` means the price cannot be computed (no configured price).
    fn show_price(&mut self, quote: Option<&PriceQuote>);
    /// Replaces whatever status message is currently shown.
    fn show_status(&mut self, kind: StatusKind, message: &str);
    fn set_submit_busy(&mut self, busy: bool);
    fn navigate(&mut self, url: &str);
    fn alert(&mut self, message: &str);
}
