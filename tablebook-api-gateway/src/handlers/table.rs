use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::HeaderMap,
    response::Json,
    routing::{get, post},
};
use tablebook_reservation_service::models;
use tracing::{Span, field, instrument};

use crate::error::ApiError;
use crate::models::*;

use super::{AppState, extract_user_id_from_token};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tables", post(create_table).get(list_tables))
        .route("/tables/{table_id}", get(get_table))
}

#[utoipa::path(
    post,
    path = "/tables",
    request_body = CreateTableRequest,
    responses(
        (status = 200, description = "Table created successfully", body = CreateTableResponse),
        (status = 400, description = "Bad request", body = ApiErrorResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 409, description = "Table already exists", body = ApiErrorResponse),
        (status = 503, description = "Service unavailable", body = ApiErrorResponse),
    ),
    security(
        ("bearer" = []),
    ),
    tag = "tables"
)]
#[instrument(skip_all, fields(user_id))]
pub async fn create_table(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateTableRequest>, JsonRejection>,
) -> Result<Json<CreateTableResponse>, ApiError> {
    let user_id = extract_user_id_from_token(&headers, &state.auth).await?;
    Span::current().record("user_id", field::display(user_id));

    let Json(payload) = payload?;
    let id = parse_table_id(payload.id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let id = state
        .tables
        .create_table(models::Table {
            id,
            number: payload.number,
            places: payload.places,
            is_vip: payload.is_vip,
            min_order: payload.min_order,
        })
        .await?;

    Ok(Json(CreateTableResponse { id }))
}

#[utoipa::path(
    get,
    path = "/tables",
    responses(
        (status = 200, description = "Tables ordered by number", body = ListTablesResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 503, description = "Service unavailable", body = ApiErrorResponse),
    ),
    security(
        ("bearer" = []),
    ),
    tag = "tables"
)]
#[instrument(skip_all)]
pub async fn list_tables(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListTablesResponse>, ApiError> {
    extract_user_id_from_token(&headers, &state.auth).await?;

    let tables = state.tables.list_tables().await?;

    Ok(Json(ListTablesResponse {
        tables: tables.into_iter().map(Table::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/tables/{table_id}",
    params(
        ("table_id" = String, Path, description = "Table identifier")
    ),
    responses(
        (status = 200, description = "Table found", body = Table),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 404, description = "Table not found", body = ApiErrorResponse),
        (status = 503, description = "Service unavailable", body = ApiErrorResponse),
    ),
    security(
        ("bearer" = []),
    ),
    tag = "tables"
)]
#[instrument(skip(state, headers))]
pub async fn get_table(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(table_id): Path<String>,
) -> Result<Json<Table>, ApiError> {
    extract_user_id_from_token(&headers, &state.auth).await?;

    let table = state.tables.get_table(&table_id).await?;

    Ok(Json(table.into()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::handlers::tests::test_app;

    #[tokio::test]
    async fn test_create_and_fetch_table() {
        let app = test_app();
        let token = app.token().await;

        let (status, body) = app
            .send(
                Method::POST,
                "/tables",
                Some(&token),
                Some(json!({
                    "id": 14406,
                    "number": 1,
                    "places": 4,
                    "isVip": true,
                    "minOrder": 250.5
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": "14406"}));

        let (status, body) = app
            .send(Method::GET, "/tables/14406", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["number"], json!(1));
        assert_eq!(body["isVip"], json!(true));
        assert_eq!(body["minOrder"], json!("250.5"));

        let (status, body) = app.send(Method::GET, "/tables", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tables"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_table_number_conflicts() {
        let app = test_app();
        let token = app.token().await;

        for (id, expected) in [("a", StatusCode::OK), ("b", StatusCode::CONFLICT)] {
            let (status, _) = app
                .send(
                    Method::POST,
                    "/tables",
                    Some(&token),
                    Some(json!({"id": id, "number": 3, "places": 2})),
                )
                .await;
            assert_eq!(status, expected);
        }
    }

    #[tokio::test]
    async fn test_invalid_table_is_rejected() {
        let app = test_app();
        let token = app.token().await;

        let (status, body) = app
            .send(
                Method::POST,
                "/tables",
                Some(&token),
                Some(json!({"id": "a", "number": 0, "places": 2})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("number"));
    }

    #[tokio::test]
    async fn test_unknown_table_is_not_found() {
        let app = test_app();
        let token = app.token().await;

        let (status, _) = app
            .send(Method::GET, "/tables/missing", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
