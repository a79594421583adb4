pub mod booking;
pub mod config;
pub mod core;
pub mod logging;

pub use booking::{BookingForm, LogNotifier, Notifier, ReminderNotice};
pub use config::StoreConfig;
pub use crate::core::db::{BookingDb, ConsultationRepository, ConsultationRequest, NewConsultation};
pub use crate::core::error::StoreError;
