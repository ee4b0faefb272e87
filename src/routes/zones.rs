use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::zones::{CreateZoneRequest, UpdateZoneRequest, ZoneCreated, ZoneList, ZoneSpots},
    error::AppResult,
    extract::ValidatedJson,
    middleware::auth::AuthUser,
    models::ParkingZone,
    response::ApiResponse,
    routes::params::Pagination,
    services::zone_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parking-zones", get(list_zones).post(create_zone))
        .route(
            "/parking-zones/detail/{id}",
            get(get_zone).put(update_zone).delete(delete_zone),
        )
        .route("/parking-zones-spots/{id}/spots", get(zone_spots))
}

#[utoipa::path(
    get,
    path = "/api/parking-zones",
    params(Pagination),
    responses(
        (status = 200, description = "List parking zones", body = ApiResponse<ZoneList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Parking zones"
)]
pub async fn list_zones(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ZoneList>>> {
    let resp = zone_service::list_zones(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/parking-zones",
    request_body = CreateZoneRequest,
    responses(
        (status = 201, description = "Zone created with its spot layout", body = ApiResponse<ZoneCreated>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Parking zones"
)]
pub async fn create_zone(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateZoneRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ZoneCreated>>)> {
    let resp = zone_service::create_zone(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/parking-zones/detail/{id}",
    params(
        ("id" = Uuid, Path, description = "Zone ID")
    ),
    responses(
        (status = 200, description = "Zone detail", body = ApiResponse<ParkingZone>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Parking zones"
)]
pub async fn get_zone(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ParkingZone>>> {
    let resp = zone_service::get_zone(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/parking-zones/detail/{id}",
    params(
        ("id" = Uuid, Path, description = "Zone ID")
    ),
    request_body = UpdateZoneRequest,
    responses(
        (status = 200, description = "Updated zone", body = ApiResponse<ParkingZone>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Parking zones"
)]
pub async fn update_zone(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateZoneRequest>,
) -> AppResult<Json<ApiResponse<ParkingZone>>> {
    let resp = zone_service::update_zone(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/parking-zones/detail/{id}",
    params(
        ("id" = Uuid, Path, description = "Zone ID")
    ),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Parking zones"
)]
pub async fn delete_zone(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = zone_service::delete_zone(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/parking-zones-spots/{id}/spots",
    params(
        ("id" = Uuid, Path, description = "Zone ID")
    ),
    responses(
        (status = 200, description = "Empty spots of the zone", body = ApiResponse<ZoneSpots>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Parking zones"
)]
pub async fn zone_spots(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ZoneSpots>>> {
    let resp = zone_service::zone_spots(&state, &user, id).await?;
    Ok(Json(resp))
}
