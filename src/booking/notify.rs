use time::OffsetDateTime;
use tracing::{info, warn};

use crate::booking::calendar::parse_iso_date;

/// A local reminder for a booked date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderNotice {
    pub title: String,
    pub body: String,
    pub fire_at: OffsetDateTime,
}

impl ReminderNotice {
    /// Build the reminder for a stored date string. Fires at midnight UTC of
    /// that day. Returns `None` when the text is not a `YYYY-MM-DD` date.
    pub fn for_date(date: &str) -> Option<Self> {
        let day = match parse_iso_date(date) {
            Ok(day) => day,
            Err(err) => {
                warn!(date, error = %err, "not scheduling reminder for unparseable date");
                return None;
            }
        };
        Some(Self {
            title: "New consultation".to_string(),
            body: format!("You have a consultation scheduled on {date}"),
            fire_at: day.midnight().assume_utc(),
        })
    }
}

/// Delivery side of reminders. The store never depends on it succeeding.
pub trait Notifier {
    fn schedule(&self, notice: &ReminderNotice) -> anyhow::Result<()>;
}

/// Records the reminder in the log instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn schedule(&self, notice: &ReminderNotice) -> anyhow::Result<()> {
        info!(title = %notice.title, fire_at = %notice.fire_at, "{}", notice.body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn reminder_fires_at_utc_midnight() {
        let notice = ReminderNotice::for_date("2024-03-01").unwrap();
        assert_eq!(notice.fire_at, datetime!(2024-03-01 0:00 UTC));
        assert_eq!(notice.title, "New consultation");
        assert_eq!(notice.body, "You have a consultation scheduled on 2024-03-01");
    }

    #[test]
    fn no_reminder_without_a_real_date() {
        assert!(ReminderNotice::for_date("null").is_none());
        assert!(ReminderNotice::for_date("tomorrow").is_none());
    }

    #[test]
    fn log_notifier_accepts_everything() {
        let notice = ReminderNotice::for_date("2030-12-31").unwrap();
        assert!(LogNotifier.schedule(&notice).is_ok());
    }
}
