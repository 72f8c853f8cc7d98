use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::locks::SlotLocks;
use crate::models::{Reservation, ReservationRequest};
use crate::store::{ReservationStore, StoreError, TableCatalog};
use crate::time_slot::{TimeSlot, TimeSlotError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error(transparent)]
    TimeSlot(#[from] TimeSlotError),
}

#[derive(Error, Debug)]
pub enum AdmissionError {
    #[error("invalid reservation request: {0}")]
    Validation(#[from] ValidationError),
    #[error("table {0} not found")]
    TableNotFound(i32),
    #[error("slot {requested} on table {table_number} at {date} overlaps reservation {conflicting_id} {existing}")]
    OverlapConflict {
        table_number: i32,
        date: String,
        requested: TimeSlot,
        existing: TimeSlot,
        conflicting_id: Uuid,
    },
    #[error("storage failure")]
    StorageFailure(#[from] StoreError),
}

/// A request whose fields are all present and well formed.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedRequest {
    pub table_number: i32,
    pub client_name: String,
    pub phone_number: String,
    pub date: String,
    pub slot_time_start: String,
    pub slot_time_end: String,
    pub slot: TimeSlot,
}

fn required(value: Option<String>, field: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(field);
            String::new()
        }
    }
}

impl ReservationRequest {
    pub fn validate(self) -> Result<ValidatedRequest, ValidationError> {
        let mut missing = Vec::new();
        if self.table_number.is_none() {
            missing.push("tableNumber");
        }
        let client_name = required(self.client_name, "clientName", &mut missing);
        let phone_number = required(self.phone_number, "phoneNumber", &mut missing);
        let date = required(self.date, "date", &mut missing);
        let slot_time_start = required(self.slot_time_start, "slotTimeStart", &mut missing);
        let slot_time_end = required(self.slot_time_end, "slotTimeEnd", &mut missing);
        let table_number = match self.table_number {
            Some(n) if missing.is_empty() => n,
            _ => return Err(ValidationError::MissingFields(missing)),
        };

        if table_number <= 0 {
            return Err(ValidationError::InvalidField {
                field: "tableNumber",
                reason: "must be a positive integer".to_string(),
            });
        }

        // dates are compared as strings, so only the canonical form is accepted
        match NaiveDate::parse_from_str(&date, DATE_FORMAT) {
            Ok(d) if d.format(DATE_FORMAT).to_string() == date => {}
            _ => return Err(ValidationError::InvalidDate(date)),
        }

        let slot = TimeSlot::parse(&slot_time_start, &slot_time_end)?;

        Ok(ValidatedRequest {
            table_number,
            client_name,
            phone_number,
            date,
            slot_time_start,
            slot_time_end,
            slot,
        })
    }
}

/// Decides whether a reservation may be created and persists it when it may.
#[derive(Clone)]
pub struct ReservationAdmission {
    catalog: Arc<dyn TableCatalog>,
    store: Arc<dyn ReservationStore>,
    locks: SlotLocks,
}

impl ReservationAdmission {
    pub fn new(catalog: Arc<dyn TableCatalog>, store: Arc<dyn ReservationStore>) -> Self {
        Self {
            catalog,
            store,
            locks: SlotLocks::new(),
        }
    }

    /// Admits `request` and returns the id of the stored reservation.
    ///
    /// The conflict read and the insert run under a lock keyed by
    /// `(table_number, date)`, so two admissions for the same table and day in
    /// this process cannot both pass the check. Nothing is written on any
    /// rejection path.
    #[instrument(skip_all, fields(table_number = ?request.table_number, date = ?request.date))]
    pub async fn create_reservation(
        &self,
        request: ReservationRequest,
    ) -> Result<Uuid, AdmissionError> {
        let request = request.validate().inspect_err(|e| {
            warn!(error = %e, "rejected invalid reservation request");
        })?;

        if self
            .catalog
            .find_by_number(request.table_number)
            .await?
            .is_none()
        {
            warn!("table does not exist");
            return Err(AdmissionError::TableNotFound(request.table_number));
        }

        let _guard = self.locks.acquire(request.table_number, &request.date).await;

        let existing = self
            .store
            .find_by_table_and_date(request.table_number, &request.date)
            .await?;
        for reservation in &existing {
            let slot =
                TimeSlot::parse_stored(&reservation.slot_time_start, &reservation.slot_time_end)
                    .map_err(|_| StoreError::InvalidRecord(reservation.id.to_string()))?;
            if request.slot.overlaps(&slot) {
                warn!(conflicting_id = %reservation.id, "requested slot {} overlaps {}", request.slot, slot);
                return Err(AdmissionError::OverlapConflict {
                    table_number: request.table_number,
                    date: request.date,
                    requested: request.slot,
                    existing: slot,
                    conflicting_id: reservation.id,
                });
            }
        }

        let reservation = Reservation {
            id: Uuid::new_v4(),
            table_number: request.table_number,
            client_name: request.client_name,
            phone_number: request.phone_number,
            date: request.date,
            slot_time_start: request.slot_time_start,
            slot_time_end: request.slot_time_end,
        };
        self.store.insert_reservation(&reservation).await?;

        info!(reservation_id = %reservation.id, "reservation admitted");
        Ok(reservation.id)
    }

    pub async fn list_reservations(&self) -> Result<Vec<Reservation>, AdmissionError> {
        Ok(self.store.list_reservations().await?)
    }
}
