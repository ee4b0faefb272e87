use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::reservations::{CreateReservationRequest, ReservationList, UpdateReservationRequest},
    entity::{
        parking_spots::Entity as ParkingSpots,
        reservations::{
            ActiveModel as ReservationActive, Column as ReservationCol, Entity as Reservations,
            Model as ReservationModel, ReservationStatus,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Reservation,
    response::{ApiResponse, Meta},
    routes::params::{ReservationListQuery, SortOrder},
    state::AppState,
};

/// Reservations are visible to their owner only; anything else reads as missing.
async fn find_owned(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ReservationModel> {
    Reservations::find()
        .filter(
            Condition::all()
                .add(ReservationCol::Id.eq(id))
                .add(ReservationCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_spot_exists(state: &AppState, spot_id: Uuid) -> AppResult<()> {
    if ParkingSpots::find_by_id(spot_id).one(&state.orm).await?.is_none() {
        return Err(AppError::field("spot_id", "exists", "Parking spot does not exist"));
    }
    Ok(())
}

pub async fn list_reservations(
    state: &AppState,
    user: &AuthUser,
    query: ReservationListQuery,
) -> AppResult<ApiResponse<ReservationList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(ReservationCol::UserId.eq(user.user_id));
    if let Some(status) = query.status {
        condition = condition.add(ReservationCol::Status.eq(status));
    }

    let mut finder = Reservations::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(ReservationCol::StartTime),
        SortOrder::Desc => finder.order_by_desc(ReservationCol::StartTime),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Reservation::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        ReservationList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn create_reservation(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    ensure_spot_exists(state, payload.spot_id).await?;

    let reservation = ReservationActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        spot_id: Set(payload.spot_id),
        start_time: NotSet,
        end_time: NotSet,
        status: Set(ReservationStatus::Pending),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "reservation_create",
        "reservations",
        serde_json::json!({ "reservation_id": reservation.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation created",
        Reservation::from(reservation),
        Some(Meta::empty()),
    ))
}

pub async fn get_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Reservation>> {
    let reservation = find_owned(state, user, id).await?;
    Ok(ApiResponse::success(
        "OK",
        Reservation::from(reservation),
        Some(Meta::empty()),
    ))
}

pub async fn update_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    let existing = find_owned(state, user, id).await?;
    ensure_spot_exists(state, payload.spot_id).await?;

    let mut active: ReservationActive = existing.into();
    active.spot_id = Set(payload.spot_id);
    let reservation = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        Reservation::from(reservation),
        Some(Meta::empty()),
    ))
}

pub async fn delete_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let reservation = find_owned(state, user, id).await?;
    reservation.delete(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "reservation_delete",
        "reservations",
        serde_json::json!({ "reservation_id": id }),
    )
    .await;

    Ok(ApiResponse::ack("Deleted"))
}

pub async fn check_in(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Reservation>> {
    transition(
        state,
        user,
        id,
        ReservationStatus::check_in,
        "Check-in is only allowed for pending reservations",
        "reservation_checkin",
        "Checked in",
    )
    .await
}

pub async fn check_out(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Reservation>> {
    transition(
        state,
        user,
        id,
        ReservationStatus::check_out,
        "Check-out is only allowed for active reservations",
        "reservation_checkout",
        "Checked out",
    )
    .await
}

async fn transition(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    next: fn(ReservationStatus) -> Option<ReservationStatus>,
    rejection: &str,
    action: &str,
    message: &str,
) -> AppResult<ApiResponse<Reservation>> {
    let existing = find_owned(state, user, id).await?;
    let from = existing.status;
    let to = next(from).ok_or_else(|| AppError::BadRequest(rejection.to_owned()))?;

    let mut active: ReservationActive = existing.into();
    active.status = Set(to);
    let reservation = active.update(&state.orm).await?;

    tracing::info!(reservation_id = %reservation.id, ?from, ?to, "reservation transition");
    audit::record(
        state,
        Some(user.user_id),
        action,
        "reservations",
        serde_json::json!({ "reservation_id": reservation.id, "from": from, "to": to }),
    )
    .await;

    Ok(ApiResponse::success(
        message,
        Reservation::from(reservation),
        Some(Meta::empty()),
    ))
}
