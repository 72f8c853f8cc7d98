use async_trait::async_trait;
use diesel::{
    insert_into,
    prelude::*,
    result::{DatabaseErrorKind, Error::DatabaseError},
};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use super::{ReservationStore, StoreError, TableCatalog};
use crate::models::{Reservation, Table};
use crate::schema;

/// Record store backed by Postgres. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<AsyncPgConnection>,
}

impl PgStore {
    pub fn new(pool: Pool<AsyncPgConnection>) -> Self {
        Self { pool }
    }
}

fn map_insert_error(err: diesel::result::Error) -> StoreError {
    match err {
        DatabaseError(DatabaseErrorKind::UniqueViolation, _) => StoreError::Duplicate,
        err => StoreError::Query(err),
    }
}

#[async_trait]
impl TableCatalog for PgStore {
    async fn find_by_number(&self, number: i32) -> Result<Option<Table>, StoreError> {
        let mut conn = self.pool.get().await?;
        let table = schema::tables::table
            .select(Table::as_select())
            .filter(schema::tables::number.eq(number))
            .first::<Table>(&mut conn)
            .await
            .optional()?;
        Ok(table)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Table>, StoreError> {
        let mut conn = self.pool.get().await?;
        let table = schema::tables::table
            .select(Table::as_select())
            .find(id)
            .first::<Table>(&mut conn)
            .await
            .optional()?;
        Ok(table)
    }

    async fn list_tables(&self) -> Result<Vec<Table>, StoreError> {
        let mut conn = self.pool.get().await?;
        let tables = schema::tables::table
            .select(Table::as_select())
            .order_by(schema::tables::number.asc())
            .load::<Table>(&mut conn)
            .await?;
        Ok(tables)
    }

    async fn insert_table(&self, table: &Table) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        insert_into(schema::tables::table)
            .values(table)
            .execute(&mut conn)
            .await
            .map_err(map_insert_error)?;
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for PgStore {
    async fn find_by_table_and_date(
        &self,
        table_number: i32,
        date: &str,
    ) -> Result<Vec<Reservation>, StoreError> {
        let mut conn = self.pool.get().await?;
        let reservations = schema::reservations::table
            .select(Reservation::as_select())
            .filter(schema::reservations::table_number.eq(table_number))
            .filter(schema::reservations::date.eq(date))
            .load::<Reservation>(&mut conn)
            .await?;
        Ok(reservations)
    }

    async fn list_reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        let mut conn = self.pool.get().await?;
        let reservations = schema::reservations::table
            .select(Reservation::as_select())
            .order_by((
                schema::reservations::date.asc(),
                schema::reservations::slot_time_start.asc(),
                schema::reservations::table_number.asc(),
            ))
            .load::<Reservation>(&mut conn)
            .await?;
        Ok(reservations)
    }

    async fn insert_reservation(&self, reservation: &Reservation) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        insert_into(schema::reservations::table)
            .values(reservation)
            .execute(&mut conn)
            .await
            .map_err(map_insert_error)?;
        Ok(())
    }
}
