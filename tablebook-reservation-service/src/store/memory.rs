use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, RwLock,
};

use async_trait::async_trait;

use super::{ReservationStore, StoreError, TableCatalog};
use crate::models::{Reservation, Table};

/// In-process record store used by `serve --in-memory` and by tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Vec<Table>>>,
    reservations: Arc<RwLock<Vec<Reservation>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation fails with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }
        Ok(())
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl TableCatalog for MemoryStore {
    async fn find_by_number(&self, number: i32) -> Result<Option<Table>, StoreError> {
        self.check_available()?;
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        Ok(tables.iter().find(|t| t.number == number).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Table>, StoreError> {
        self.check_available()?;
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        Ok(tables.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tables(&self) -> Result<Vec<Table>, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.read().map_err(|_| Self::poisoned())?.clone();
        tables.sort_by_key(|t| t.number);
        Ok(tables)
    }

    async fn insert_table(&self, table: &Table) -> Result<(), StoreError> {
        self.check_available()?;
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        if tables
            .iter()
            .any(|t| t.id == table.id || t.number == table.number)
        {
            return Err(StoreError::Duplicate);
        }
        tables.push(table.clone());
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn find_by_table_and_date(
        &self,
        table_number: i32,
        date: &str,
    ) -> Result<Vec<Reservation>, StoreError> {
        self.check_available()?;
        let reservations = self.reservations.read().map_err(|_| Self::poisoned())?;
        Ok(reservations
            .iter()
            .filter(|r| r.table_number == table_number && r.date == date)
            .cloned()
            .collect())
    }

    async fn list_reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        self.check_available()?;
        let mut reservations = self.reservations.read().map_err(|_| Self::poisoned())?.clone();
        reservations.sort_by(|a, b| {
            (&a.date, &a.slot_time_start, a.table_number).cmp(&(
                &b.date,
                &b.slot_time_start,
                b.table_number,
            ))
        });
        Ok(reservations)
    }

    async fn insert_reservation(&self, reservation: &Reservation) -> Result<(), StoreError> {
        self.check_available()?;
        let mut reservations = self.reservations.write().map_err(|_| Self::poisoned())?;
        if reservations.iter().any(|r| r.id == reservation.id) {
            return Err(StoreError::Duplicate);
        }
        reservations.push(reservation.clone());
        Ok(())
    }
}
