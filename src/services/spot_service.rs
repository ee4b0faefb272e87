use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::spots::{CreateSpotRequest, SpotBundle, SpotList, SpotStatusRequest, UpdateSpotRequest},
    entity::{
        parking_spots::{ActiveModel as SpotActive, Column as SpotCol, Entity as ParkingSpots, SpotStatus},
        parking_zones::Entity as ParkingZones,
        payments::{ActiveModel as PaymentActive, PaymentStatus},
        reservations::{ActiveModel as ReservationActive, ReservationStatus},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{ParkingSpot, Payment, Reservation},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, SpotQuery},
    state::AppState,
};

pub async fn list_spots(state: &AppState, query: SpotQuery) -> AppResult<ApiResponse<SpotList>> {
    let mut condition = Condition::all();
    if let Some(zone_id) = query.zone_id {
        condition = condition.add(SpotCol::ZoneId.eq(zone_id));
    }
    if let Some(spot_type) = query.spot_type {
        condition = condition.add(SpotCol::SpotType.eq(spot_type));
    }
    paginate_spots(state, condition, query.pagination(), "Parking spots").await
}

/// Active spots whose status is `empty`.
pub async fn available_spots(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<SpotList>> {
    let condition = Condition::all()
        .add(SpotCol::Status.eq(SpotStatus::Empty))
        .add(SpotCol::IsActive.eq(true));
    paginate_spots(state, condition, pagination, "Available spots").await
}

async fn paginate_spots(
    state: &AppState,
    condition: Condition,
    pagination: Pagination,
    message: &str,
) -> AppResult<ApiResponse<SpotList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = ParkingSpots::find()
        .filter(condition)
        .order_by_asc(SpotCol::ZoneId)
        .order_by_asc(SpotCol::SpotNumber);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ParkingSpot::from)
        .collect();

    Ok(ApiResponse::success(
        message,
        SpotList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Creates the spot, a pending reservation for the caller and its pending payment.
/// All three rows are written in one transaction or none is.
pub async fn create_spot(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSpotRequest,
) -> AppResult<ApiResponse<SpotBundle>> {
    let txn = state.orm.begin().await?;

    let bundle = match insert_spot_bundle(&txn, user, payload).await {
        Ok(bundle) => bundle,
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!(error = %rollback_err, "spot bundle rollback failed");
            }
            return Err(err);
        }
    };
    txn.commit().await?;

    tracing::info!(
        spot_id = %bundle.spot.id,
        reservation_id = %bundle.reservation.id,
        payment_id = %bundle.payment.id,
        "spot reserved"
    );
    audit::record(
        state,
        Some(user.user_id),
        "spot_create",
        "parking_spots",
        serde_json::json!({
            "spot_id": bundle.spot.id,
            "reservation_id": bundle.reservation.id,
            "payment_id": bundle.payment.id,
        }),
    )
    .await;

    Ok(ApiResponse::success("Spot created", bundle, Some(Meta::empty())))
}

async fn insert_spot_bundle(
    txn: &DatabaseTransaction,
    user: &AuthUser,
    payload: CreateSpotRequest,
) -> AppResult<SpotBundle> {
    let zone = ParkingZones::find_by_id(payload.zone_id)
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if !zone.is_active {
        return Err(AppError::BadRequest("Parking zone is not active".into()));
    }

    let now = Utc::now();
    let spot = SpotActive {
        id: Set(Uuid::new_v4()),
        zone_id: Set(zone.id),
        spot_number: Set(payload.spot_number.trim().to_owned()),
        status: Set(SpotStatus::Empty),
        spot_type: Set(payload.spot_type.unwrap_or_default()),
        is_active: Set(true),
        created_at: Set(now.into()),
    }
    .insert(txn)
    .await?;

    let reservation = ReservationActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        spot_id: Set(spot.id),
        start_time: NotSet,
        end_time: NotSet,
        status: Set(ReservationStatus::Pending),
    }
    .insert(txn)
    .await?;

    let transaction_id = payload
        .transaction_id
        .unwrap_or_else(|| reservation.id.to_string());
    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        reservation_id: Set(reservation.id),
        user_id: Set(user.user_id),
        price: Set(zone.hourly_rate),
        payment_method: Set(payload.payment_method),
        status: Set(PaymentStatus::Pending),
        transaction_id: Set(transaction_id),
        created_at: Set(now.into()),
    }
    .insert(txn)
    .await?;

    Ok(SpotBundle {
        spot: ParkingSpot::from(spot),
        reservation: Reservation::from(reservation),
        payment: Payment::from(payment),
    })
}

pub async fn update_spot(
    state: &AppState,
    id: Uuid,
    payload: UpdateSpotRequest,
) -> AppResult<ApiResponse<ParkingSpot>> {
    let existing = ParkingSpots::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: SpotActive = existing.into();
    if let Some(zone_id) = payload.zone_id {
        if ParkingZones::find_by_id(zone_id).one(&state.orm).await?.is_none() {
            return Err(AppError::field("zone_id", "exists", "Parking zone does not exist"));
        }
        active.zone_id = Set(zone_id);
    }
    if let Some(spot_number) = payload.spot_number {
        active.spot_number = Set(spot_number.trim().to_owned());
    }
    if let Some(spot_type) = payload.spot_type {
        active.spot_type = Set(spot_type);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }

    let spot = active.update(&state.orm).await?;
    Ok(ApiResponse::success(
        "Updated",
        ParkingSpot::from(spot),
        Some(Meta::empty()),
    ))
}

/// Overwrites the status; every status may follow every other.
pub async fn update_spot_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: SpotStatusRequest,
) -> AppResult<ApiResponse<ParkingSpot>> {
    let status = payload
        .status
        .ok_or_else(|| AppError::BadRequest("Status is required".into()))?;

    let existing = ParkingSpots::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let previous = existing.status;

    let mut active: SpotActive = existing.into();
    active.status = Set(status);
    let spot = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "spot_status",
        "parking_spots",
        serde_json::json!({ "spot_id": spot.id, "from": previous, "to": status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Status updated",
        ParkingSpot::from(spot),
        Some(Meta::empty()),
    ))
}
