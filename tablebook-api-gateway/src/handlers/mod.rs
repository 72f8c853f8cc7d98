pub mod auth;
pub mod reservation;
pub mod table;

pub use auth::router as auth_router;
pub use reservation::router as reservation_router;
pub use table::router as table_router;

use std::sync::Arc;

use axum::{Router, http::HeaderMap, response::Json, routing::get};
use tablebook_auth_service::{AuthService, TokenIssuer, store::UserStore};
use tablebook_reservation_service::{
    ReservationAdmission, TableRegistry,
    store::{ReservationStore, TableCatalog},
};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::HealthResponse;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tables: TableRegistry,
    pub reservations: ReservationAdmission,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn TableCatalog>,
        reservation_store: Arc<dyn ReservationStore>,
        user_store: Arc<dyn UserStore>,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            auth: AuthService::new(user_store, tokens),
            tables: TableRegistry::new(catalog.clone()),
            reservations: ReservationAdmission::new(catalog, reservation_store),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(auth_router())
        .merge(table_router())
        .merge(reservation_router())
}

async fn extract_user_id_from_token(
    headers: &HeaderMap,
    auth: &AuthService,
) -> Result<Uuid, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or(ApiError::AuthenticationFailed)?
        .to_str()
        .map_err(|_| ApiError::InvalidToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::InvalidToken)?;

    Ok(auth.verify_token(token.trim())?)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        auth::signup,
        auth::signin,
        table::create_table,
        table::list_tables,
        table::get_table,
        reservation::create_reservation,
        reservation::list_reservations,
    ),
    components(
        schemas(
            crate::models::SignupRequest,
            crate::models::SignupResponse,
            crate::models::SigninRequest,
            crate::models::SigninResponse,
            crate::models::CreateTableRequest,
            crate::models::CreateTableResponse,
            crate::models::Table,
            crate::models::ListTablesResponse,
            crate::models::CreateReservationRequest,
            crate::models::CreateReservationResponse,
            crate::models::Reservation,
            crate::models::ListReservationsResponse,
            crate::models::HealthResponse,
            crate::models::ApiErrorResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness endpoint"),
        (name = "auth", description = "Signup and signin endpoints"),
        (name = "tables", description = "Table management endpoints"),
        (name = "reservations", description = "Reservation endpoints")
    ),
    info(
        title = "Tablebook API",
        description = "Restaurant table reservations",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            use utoipa::openapi::security::*;
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
