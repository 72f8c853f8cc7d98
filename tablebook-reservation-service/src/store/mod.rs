use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Reservation, Table};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot acquire database connection")]
    Pool(#[from] diesel_async::pooled_connection::deadpool::PoolError),
    #[error("error while executing database query")]
    Query(#[from] diesel::result::Error),
    #[error("record already exists")]
    Duplicate,
    #[error("record {0} is malformed")]
    InvalidRecord(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read and write access to the table collection.
#[async_trait]
pub trait TableCatalog: Send + Sync {
    /// Looks a table up by its business-facing `number`, not by its storage id.
    async fn find_by_number(&self, number: i32) -> Result<Option<Table>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Table>, StoreError>;

    async fn list_tables(&self) -> Result<Vec<Table>, StoreError>;

    async fn insert_table(&self, table: &Table) -> Result<(), StoreError>;
}

/// Read and write access to the reservation collection.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Every reservation for `table_number` whose `date` equals `date` exactly.
    /// The result is unordered and may be empty.
    async fn find_by_table_and_date(
        &self,
        table_number: i32,
        date: &str,
    ) -> Result<Vec<Reservation>, StoreError>;

    async fn list_reservations(&self) -> Result<Vec<Reservation>, StoreError>;

    async fn insert_reservation(&self, reservation: &Reservation) -> Result<(), StoreError>;
}
