use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::{reservations, tables};

/// A restaurant table. `id` is the storage key; `number` is the business key
/// that reservations point at.
#[derive(Queryable, Selectable, Identifiable, Insertable, Clone, Debug, PartialEq)]
#[diesel(table_name = tables)]
pub struct Table {
    pub id: String,
    pub number: i32,
    pub places: i32,
    pub is_vip: bool,
    pub min_order: Option<BigDecimal>,
}

#[derive(Queryable, Selectable, Identifiable, Insertable, Clone, Debug, PartialEq)]
#[diesel(table_name = reservations)]
pub struct Reservation {
    pub id: Uuid,
    pub table_number: i32,
    pub client_name: String,
    pub phone_number: String,
    pub date: String,
    pub slot_time_start: String,
    pub slot_time_end: String,
}

/// Inbound reservation payload. Every field is optional so that missing
/// fields can be reported instead of failing deserialization.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct ReservationRequest {
    pub table_number: Option<i32>,
    pub client_name: Option<String>,
    pub phone_number: Option<String>,
    pub date: Option<String>,
    pub slot_time_start: Option<String>,
    pub slot_time_end: Option<String>,
}
