use time::Date;
use tracing::{debug, info, warn};

use crate::booking::calendar::format_iso_date;
use crate::booking::notify::{Notifier, ReminderNotice};
use crate::core::db::{ConsultationRepository, ConsultationRequest, NewConsultation};
use crate::core::error::StoreError;

/// State of one booking screen, without any rendering.
///
/// The text fields hold whatever the user typed and are submitted verbatim.
/// `consultant` is `None` for screens that do not ask for a consultant, in
/// which case the column is stored as `NULL`.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub name: String,
    pub contact: String,
    pub consultant: Option<String>,
    pub message: String,
    selected_date: Option<Date>,
    consultations: Vec<ConsultationRequest>,
    last_error: Option<StoreError>,
}

impl BookingForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form that also asks which consultant the booking is for.
    pub fn with_consultant_field() -> Self {
        Self {
            consultant: Some(String::new()),
            ..Self::default()
        }
    }

    pub fn selected_date(&self) -> Option<Date> {
        self.selected_date
    }

    /// Records shown under the form, as of the last successful load.
    pub fn consultations(&self) -> &[ConsultationRequest] {
        &self.consultations
    }

    /// Error indicator for the most recent failed store call, if any.
    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    pub fn select_date(&mut self, date: Date) {
        self.selected_date = Some(date);
    }

    pub fn clear_date(&mut self) {
        self.selected_date = None;
    }

    /// First load of the screen: make sure the table exists, then show it.
    pub async fn mount<R: ConsultationRepository>(&mut self, repo: &R) -> Result<(), StoreError> {
        if let Err(err) = repo.initialize().await {
            self.show_list_failure(err.clone());
            return Err(err);
        }
        self.refresh(repo).await
    }

    /// Reload the list. On failure the list is emptied and the error kept.
    pub async fn refresh<R: ConsultationRepository>(&mut self, repo: &R) -> Result<(), StoreError> {
        match repo.list_all().await {
            Ok(consultations) => {
                debug!(count = consultations.len(), "refreshed consultation list");
                self.consultations = consultations;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.show_list_failure(err.clone());
                Err(err)
            }
        }
    }

    /// Store the entered values.
    ///
    /// On success the reminder for the booked date is handed to `notifier`,
    /// the entered values are cleared and the list is reloaded. A failed
    /// reload only shows up in [`BookingForm::last_error`]; the booking itself
    /// is already durable. On insert failure nothing is cleared.
    pub async fn submit<R, N>(&mut self, repo: &R, notifier: &N) -> Result<ConsultationRequest, StoreError>
    where
        R: ConsultationRepository,
        N: Notifier,
    {
        let stored = match repo.insert(&self.to_new_consultation()).await {
            Ok(stored) => stored,
            Err(err) => {
                warn!(error = %err, "booking not stored; keeping entered values");
                self.last_error = Some(err.clone());
                return Err(err);
            }
        };
        info!(id = stored.id, "booked consultation");

        if let Some(notice) = stored.date.as_deref().and_then(ReminderNotice::for_date) {
            if let Err(err) = notifier.schedule(&notice) {
                warn!(id = stored.id, error = %err, "failed to schedule reminder");
            }
        }

        self.reset_fields();
        self.last_error = None;
        let _ = self.refresh(repo).await;
        Ok(stored)
    }

    fn to_new_consultation(&self) -> NewConsultation {
        NewConsultation {
            name: self.name.clone(),
            contact: self.contact.clone(),
            consultant: self.consultant.clone(),
            message: Some(self.message.clone()),
            date: self.selected_date.map(format_iso_date),
        }
    }

    fn reset_fields(&mut self) {
        self.name.clear();
        self.contact.clear();
        if let Some(consultant) = self.consultant.as_mut() {
            consultant.clear();
        }
        self.message.clear();
        self.selected_date = None;
    }

    fn show_list_failure(&mut self, err: StoreError) {
        warn!(error = %err, "could not load consultations");
        self.consultations.clear();
        self.last_error = Some(err);
    }
}
