use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, put},
};
use uuid::Uuid;

use crate::{
    dto::profile::{UpdateProfileRequest, UserList},
    error::AppResult,
    extract::ValidatedJson,
    middleware::auth::AuthUser,
    models::UserProfile,
    response::ApiResponse,
    routes::params::Pagination,
    services::profile_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/about", get(about))
        .route("/update", put(update))
        .route("/list", get(list))
        .route("/{id}", delete(remove))
}

#[utoipa::path(
    get,
    path = "/api/profile/about",
    responses(
        (status = 200, description = "Caller's profile", body = ApiResponse<UserProfile>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn about(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = profile_service::get_profile(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/profile/update",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid or duplicate fields")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = profile_service::update_profile(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/profile/list",
    params(Pagination),
    responses(
        (status = 200, description = "All users", body = ApiResponse<UserList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = profile_service::list_profiles(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/profile/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Deleted user", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = profile_service::delete_profile(&state, &user, id).await?;
    Ok(Json(resp))
}
