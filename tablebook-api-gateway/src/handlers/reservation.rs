use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    response::Json,
    routing::post,
};
use tablebook_reservation_service::{AdmissionError, models::ReservationRequest};
use tracing::{Span, field, instrument};

use crate::error::ApiError;
use crate::models::*;

use super::{AppState, extract_user_id_from_token};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/reservations",
        post(create_reservation).get(list_reservations),
    )
}

#[utoipa::path(
    post,
    path = "/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation admitted", body = CreateReservationResponse),
        (status = 400, description = "Missing or malformed fields", body = ApiErrorResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 404, description = "Table not found", body = ApiErrorResponse),
        (status = 409, description = "Slot overlaps an existing reservation", body = ApiErrorResponse),
        (status = 503, description = "Service unavailable", body = ApiErrorResponse),
    ),
    security(
        ("bearer" = []),
    ),
    tag = "reservations"
)]
#[instrument(skip_all, fields(user_id))]
pub async fn create_reservation(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Result<Json<CreateReservationResponse>, ApiError> {
    let user_id = extract_user_id_from_token(&headers, &state.auth).await?;
    Span::current().record("user_id", field::display(user_id));

    let Json(payload) = payload?;
    let request = ReservationRequest::try_from(payload).map_err(AdmissionError::from)?;

    let reservation_id = state.reservations.create_reservation(request).await?;

    Ok(Json(CreateReservationResponse { reservation_id }))
}

#[utoipa::path(
    get,
    path = "/reservations",
    responses(
        (status = 200, description = "Reservations ordered by date, start time and table", body = ListReservationsResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 503, description = "Service unavailable", body = ApiErrorResponse),
    ),
    security(
        ("bearer" = []),
    ),
    tag = "reservations"
)]
#[instrument(skip_all)]
pub async fn list_reservations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListReservationsResponse>, ApiError> {
    extract_user_id_from_token(&headers, &state.auth).await?;

    let reservations = state.reservations.list_reservations().await?;

    Ok(Json(ListReservationsResponse {
        reservations: reservations.into_iter().map(Reservation::from).collect(),
    }))
}
