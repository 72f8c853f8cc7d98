use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tablebook_reservation_service::{ValidationError, models};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// First name of the new user
    pub first_name: String,
    /// Last name of the new user
    pub last_name: String,
    /// Email address, used to sign in
    pub email: String,
    /// At least 12 characters with a letter, a digit and one of `$%^*-_`
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    /// Unique identifier for the user
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    /// Bearer token for the protected endpoints
    pub access_token: String,
    /// Token type (always "bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableRequest {
    /// Storage identifier, a number or a numeric-looking string
    #[schema(value_type = String)]
    pub id: Value,
    /// Business-facing table number, unique across tables
    pub number: i32,
    /// Seating capacity
    pub places: i32,
    #[serde(default)]
    pub is_vip: bool,
    /// Minimum order amount
    #[schema(value_type = Option<f64>)]
    pub min_order: Option<BigDecimal>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateTableResponse {
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub number: i32,
    pub places: i32,
    pub is_vip: bool,
    /// Minimum order amount, as a decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub min_order: Option<BigDecimal>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListTablesResponse {
    pub tables: Vec<Table>,
}

/// Reservation payload. Fields are optional here so that missing fields are
/// reported together by the admission validation.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    /// Number of the table to reserve (a number or a numeric string)
    #[schema(value_type = i32)]
    pub table_number: Option<Value>,
    pub client_name: Option<String>,
    pub phone_number: Option<String>,
    /// Date in YYYY-MM-DD format
    pub date: Option<String>,
    /// Start time in HH:MM format
    pub slot_time_start: Option<String>,
    /// End time in HH:MM format, after the start time
    pub slot_time_end: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationResponse {
    pub reservation_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub table_number: i32,
    pub client_name: String,
    pub phone_number: String,
    pub date: String,
    pub slot_time_start: String,
    pub slot_time_end: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListReservationsResponse {
    pub reservations: Vec<Reservation>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}

/// Accepts `5` and `"5"`; null and blank strings count as missing.
pub fn parse_table_number(value: Option<Value>) -> Result<Option<i32>, ValidationError> {
    let invalid = || ValidationError::InvalidField {
        field: "tableNumber",
        reason: "must be an integer".to_string(),
    };
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i32>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

/// Accepts `14406` and `"14406"`.
pub fn parse_table_id(value: Value) -> Result<String, ValidationError> {
    match value {
        Value::Number(n) if n.is_u64() || n.is_i64() => Ok(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(ValidationError::InvalidField {
            field: "id",
            reason: "must be a non-empty string or an integer".to_string(),
        }),
    }
}

impl TryFrom<CreateReservationRequest> for models::ReservationRequest {
    type Error = ValidationError;

    fn try_from(payload: CreateReservationRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            table_number: parse_table_number(payload.table_number)?,
            client_name: payload.client_name,
            phone_number: payload.phone_number,
            date: payload.date,
            slot_time_start: payload.slot_time_start,
            slot_time_end: payload.slot_time_end,
        })
    }
}

impl From<models::Table> for Table {
    fn from(table: models::Table) -> Self {
        Self {
            id: table.id,
            number: table.number,
            places: table.places,
            is_vip: table.is_vip,
            min_order: table.min_order,
        }
    }
}

impl From<models::Reservation> for Reservation {
    fn from(reservation: models::Reservation) -> Self {
        Self {
            id: reservation.id,
            table_number: reservation.table_number,
            client_name: reservation.client_name,
            phone_number: reservation.phone_number,
            date: reservation.date,
            slot_time_start: reservation.slot_time_start,
            slot_time_end: reservation.slot_time_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_table_number() {
        assert_eq!(parse_table_number(None), Ok(None));
        assert_eq!(parse_table_number(Some(Value::Null)), Ok(None));
        assert_eq!(parse_table_number(Some(json!(5))), Ok(Some(5)));
        assert_eq!(parse_table_number(Some(json!(" 12 "))), Ok(Some(12)));
        assert_eq!(parse_table_number(Some(json!(""))), Ok(None));
        for bad in [json!(1.5), json!("five"), json!(true), json!(9_999_999_999i64)] {
            assert!(parse_table_number(Some(bad.clone())).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_parse_table_id() {
        assert_eq!(parse_table_id(json!(14406)), Ok("14406".to_string()));
        assert_eq!(parse_table_id(json!("14406")), Ok("14406".to_string()));
        assert!(parse_table_id(json!("")).is_err());
        assert!(parse_table_id(json!(null)).is_err());
    }

    #[test]
    fn test_table_serializes_camel_case() {
        let table = Table {
            id: "1".to_string(),
            number: 1,
            places: 4,
            is_vip: true,
            min_order: None,
        };
        assert_eq!(
            serde_json::to_value(table).unwrap(),
            json!({"id": "1", "number": 1, "places": 4, "isVip": true})
        );
    }
}
