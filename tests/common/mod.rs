#![allow(dead_code, unused_imports)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from tarot_booking for tests
pub use tarot_booking::{
    BookingDb, BookingForm, ConsultationRepository, ConsultationRequest, LogNotifier,
    NewConsultation, Notifier, ReminderNotice, StoreConfig, StoreError,
};
