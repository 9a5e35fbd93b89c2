//! UI layer: the signup window.

pub mod app;

pub use app::SignupApp;
