use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::reservations::{CreateReservationRequest, ReservationList, UpdateReservationRequest},
    error::AppResult,
    extract::ValidatedJson,
    middleware::auth::AuthUser,
    models::Reservation,
    response::ApiResponse,
    routes::params::ReservationListQuery,
    services::reservation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route(
            "/{id}",
            get(get_reservation)
                .put(update_reservation)
                .delete(delete_reservation),
        )
        .route("/{id}/checkin", post(check_in))
        .route("/{id}/checkout", post(check_out))
}

#[utoipa::path(
    get,
    path = "/api/reservations",
    params(ReservationListQuery),
    responses(
        (status = 200, description = "Caller's reservations", body = ApiResponse<ReservationList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReservationListQuery>,
) -> AppResult<Json<ApiResponse<ReservationList>>> {
    let resp = reservation_service::list_reservations(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<Reservation>),
        (status = 400, description = "Spot does not exist")
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Reservation>>)> {
    let resp = reservation_service::create_reservation(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/reservations/{id}",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation detail", body = ApiResponse<Reservation>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::get_reservation(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/reservations/{id}",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Updated reservation", body = ApiResponse<Reservation>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn update_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateReservationRequest>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::update_reservation(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/reservations/{id}",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn delete_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = reservation_service::delete_reservation(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reservations/{id}/checkin",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation is active", body = ApiResponse<Reservation>),
        (status = 400, description = "Reservation is not pending"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn check_in(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::check_in(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reservations/{id}/checkout",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation is completed", body = ApiResponse<Reservation>),
        (status = 400, description = "Reservation is not active"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn check_out(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::check_out(&state, &user, id).await?;
    Ok(Json(resp))
}
