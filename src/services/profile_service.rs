use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{
    audit,
    dto::profile::{UpdateProfileRequest, UserList},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult, field_error},
    middleware::auth::{AuthUser, ensure_admin},
    models::UserProfile,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::auth_service::normalize_phone,
    state::AppState,
};

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserProfile>> {
    let profile = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .map(UserProfile::from)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Profile", profile, Some(Meta::empty())))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    let existing = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut errors = ValidationErrors::new();
    let mut active: UserActive = existing.into();

    if let Some(username) = payload.username {
        let username = username.trim().to_owned();
        let taken = Users::find()
            .filter(
                Condition::all()
                    .add(UserCol::Username.eq(username.as_str()))
                    .add(UserCol::Id.ne(user.user_id)),
            )
            .one(&state.orm)
            .await?
            .is_some();
        if taken {
            errors.add("username", field_error("unique", "Username already exists"));
        }
        active.username = Set(username);
    }
    if let Some(phone) = payload.phone {
        match normalize_phone(&phone) {
            Some(phone) => {
                let taken = Users::find()
                    .filter(
                        Condition::all()
                            .add(UserCol::Phone.eq(phone.as_str()))
                            .add(UserCol::Id.ne(user.user_id)),
                    )
                    .one(&state.orm)
                    .await?
                    .is_some();
                if taken {
                    errors.add("phone", field_error("unique", "Phone already exists"));
                }
                active.phone = Set(phone);
            }
            None => errors.add(
                "phone",
                field_error("digits", "Phone number must contain only digits"),
            ),
        }
    }
    if !errors.errors().is_empty() {
        return Err(AppError::Validation(errors));
    }

    if let Some(first_name) = payload.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(last_name);
    }

    let updated = active.update(&state.orm).await?;
    Ok(ApiResponse::success(
        "Profile updated",
        UserProfile::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn list_profiles(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Users::find().order_by_asc(UserCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(UserProfile::from)
        .collect();

    Ok(ApiResponse::success(
        "Users",
        UserList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn delete_profile(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Users::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        Some(user.user_id),
        "user_delete",
        "users",
        serde_json::json!({ "user_id": id }),
    )
    .await;

    Ok(ApiResponse::ack("Deleted"))
}
