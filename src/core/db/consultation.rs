use std::future::Future;

use serde::Serialize;

use crate::core::error::StoreError;

/// A stored booking. Only the store hands these out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultationRequest {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub consultant: Option<String>,
    pub message: Option<String>,
    pub date: Option<String>,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewConsultation {
    pub name: String,
    /// Email address or phone number, stored as entered.
    pub contact: String,
    pub consultant: Option<String>,
    pub message: Option<String>,
    /// `YYYY-MM-DD`; kept as opaque text.
    pub date: Option<String>,
}

impl NewConsultation {
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            ..Default::default()
        }
    }

    pub fn with_consultant(mut self, consultant: impl Into<String>) -> Self {
        self.consultant = Some(consultant.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

pub trait ConsultationRepository {
    /// Create the `Consultations` table if it does not exist yet, adding any
    /// columns an older table lacks. Idempotent.
    fn initialize(&self) -> impl Future<Output = Result<(), StoreError>>;

    /// Every stored record, ordered by id (which is insertion order).
    fn list_all(&self) -> impl Future<Output = Result<Vec<ConsultationRequest>, StoreError>>;

    /// Store a new record without validating any field.
    fn insert(
        &self,
        consultation: &NewConsultation,
    ) -> impl Future<Output = Result<ConsultationRequest, StoreError>>;
}
