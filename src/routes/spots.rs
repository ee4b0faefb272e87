use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::spots::{CreateSpotRequest, SpotBundle, SpotList, SpotStatusRequest, UpdateSpotRequest},
    error::AppResult,
    extract::ValidatedJson,
    middleware::auth::AuthUser,
    models::ParkingSpot,
    response::ApiResponse,
    routes::params::{Pagination, SpotQuery},
    services::spot_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_spots))
        .route("/available", get(available_spots))
        .route("/", post(create_spot))
        .route("/{id}", put(update_spot))
        .route("/{id}/status", patch(update_status))
}

#[utoipa::path(
    get,
    path = "/api/spots/list",
    params(SpotQuery),
    responses(
        (status = 200, description = "List parking spots", body = ApiResponse<SpotList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Spots"
)]
pub async fn list_spots(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<SpotQuery>,
) -> AppResult<Json<ApiResponse<SpotList>>> {
    let resp = spot_service::list_spots(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/spots/available",
    params(Pagination),
    responses(
        (status = 200, description = "Active spots with status empty", body = ApiResponse<SpotList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Spots"
)]
pub async fn available_spots(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<SpotList>>> {
    let resp = spot_service::available_spots(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/spots",
    request_body = CreateSpotRequest,
    responses(
        (status = 201, description = "Spot with its reservation and payment", body = ApiResponse<SpotBundle>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Zone not found"),
        (status = 409, description = "Duplicate spot number or transaction id")
    ),
    security(("bearer_auth" = [])),
    tag = "Spots"
)]
pub async fn create_spot(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateSpotRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SpotBundle>>)> {
    let resp = spot_service::create_spot(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/spots/{id}",
    params(
        ("id" = Uuid, Path, description = "Spot ID")
    ),
    request_body = UpdateSpotRequest,
    responses(
        (status = 200, description = "Updated spot", body = ApiResponse<ParkingSpot>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Spots"
)]
pub async fn update_spot(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSpotRequest>,
) -> AppResult<Json<ApiResponse<ParkingSpot>>> {
    let resp = spot_service::update_spot(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/spots/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Spot ID")
    ),
    request_body = SpotStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ParkingSpot>),
        (status = 400, description = "Status is required"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Spots"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SpotStatusRequest>,
) -> AppResult<Json<ApiResponse<ParkingSpot>>> {
    let resp = spot_service::update_spot_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
