//! Everything around the store that the booking screen drives: the form
//! state, the picked date and the reminder handed to the notification side.

mod calendar;
mod form;
mod notify;

pub use calendar::{format_iso_date, parse_iso_date};
pub use form::BookingForm;
pub use notify::{LogNotifier, Notifier, ReminderNotice};
