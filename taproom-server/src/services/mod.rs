//! Services
//!
//! - [`settings`] - cached campaign settings (threshold, table count)

pub mod settings;

pub use settings::SettingsService;
