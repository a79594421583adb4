mod consultation;
mod state;

use std::sync::Arc;

use state::StoreState;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::core::error::StoreError;

pub use consultation::{ConsultationRepository, ConsultationRequest, NewConsultation};

/// Process-wide handle to the booking database.
///
/// Open it once at startup and clone it into whatever needs storage; clones
/// share one connection pool. There is no explicit close: the pool goes away
/// with the process.
#[derive(Debug, Clone)]
pub struct BookingDb {
    state: Arc<StoreState>,
}

impl BookingDb {
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        Ok(Self {
            state: Arc::new(StoreState::open(config).await?),
        })
    }
}

#[derive(sqlx::FromRow)]
struct ConsultationRow {
    id: i64,
    name: Option<String>,
    contact: Option<String>,
    consultant: Option<String>,
    message: Option<String>,
    date: Option<String>,
}

impl From<ConsultationRow> for ConsultationRequest {
    fn from(record: ConsultationRow) -> Self {
        ConsultationRequest {
            id: record.id,
            name: record.name.unwrap_or_default(),
            contact: record.contact.unwrap_or_default(),
            consultant: record.consultant,
            message: record.message,
            date: record.date,
            _guard: (),
        }
    }
}

impl ConsultationRepository for BookingDb {
    async fn initialize(&self) -> Result<(), StoreError> {
        self.state.migrate().await?;
        info!("consultations table ready");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ConsultationRequest>, StoreError> {
        let consultations = self
            .state
            .bounded("list consultations", select_all(&self.state))
            .await?;
        debug!(count = consultations.len(), "listed consultations");
        Ok(consultations)
    }

    async fn insert(&self, consultation: &NewConsultation) -> Result<ConsultationRequest, StoreError> {
        let stored = self
            .state
            .bounded("insert consultation", insert_one(&self.state, consultation))
            .await?;
        info!(id = stored.id, date = ?stored.date, "stored consultation");
        Ok(stored)
    }
}

async fn select_all(state: &StoreState) -> Result<Vec<ConsultationRequest>, StoreError> {
    let mut conn = state.conn().await?;
    Ok(sqlx::query_as::<_, ConsultationRow>(
        r#"SELECT id, name, contact, consultant, message, date
        FROM Consultations
        ORDER BY id ASC"#,
    )
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(ConsultationRequest::from)
    .collect())
}

async fn insert_one(
    state: &StoreState,
    consultation: &NewConsultation,
) -> Result<ConsultationRequest, StoreError> {
    let mut conn = state.conn().await?;
    let record = sqlx::query_as::<_, ConsultationRow>(
        r#"INSERT INTO Consultations (name, contact, consultant, message, date)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, name, contact, consultant, message, date"#,
    )
    .bind(&consultation.name)
    .bind(&consultation.contact)
    .bind(&consultation.consultant)
    .bind(&consultation.message)
    .bind(&consultation.date)
    .fetch_one(&mut *conn)
    .await?;
    Ok(ConsultationRequest::from(record))
}
