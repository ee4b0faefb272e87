use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::zones::{CreateZoneRequest, UpdateZoneRequest, ZoneCreated, ZoneList, ZoneSpots},
    entity::{
        parking_spots::{ActiveModel as SpotActive, Column as SpotCol, Entity as ParkingSpots, SpotStatus, SpotType},
        parking_zones::{ActiveModel as ZoneActive, Column as ZoneCol, Entity as ParkingZones},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{ParkingSpot, ParkingZone},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

const SPOT_INSERT_CHUNK: usize = 500;
const HANDICAPPED_SPOTS: i32 = 2;

/// Type of the 1-based spot `index` in a zone of `total` spots: the first two are
/// handicapped, then up to `ceil(total / 10)` electric, the rest regular.
pub fn spot_type_for(index: i32, total: i32) -> SpotType {
    let electric_upto = (total + 9) / 10;
    if index <= HANDICAPPED_SPOTS {
        SpotType::Handicapped
    } else if index <= electric_upto {
        SpotType::Electric
    } else {
        SpotType::Regular
    }
}

pub fn spot_number(index: i32) -> String {
    format!("A{index:03}")
}

pub async fn list_zones(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<ZoneList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = ParkingZones::find().order_by_asc(ZoneCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ParkingZone::from)
        .collect();

    Ok(ApiResponse::success(
        "Parking zones",
        ZoneList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn create_zone(
    state: &AppState,
    user: &AuthUser,
    payload: CreateZoneRequest,
) -> AppResult<ApiResponse<ZoneCreated>> {
    ensure_admin(user)?;
    let available_spots = payload.available_spots.unwrap_or(payload.total_spots);
    if available_spots > payload.total_spots {
        return Err(AppError::field(
            "available_spots",
            "range",
            "available_spots must not exceed total_spots",
        ));
    }

    let now = Utc::now();
    let txn = state.orm.begin().await?;

    let zone = ZoneActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_owned()),
        address: Set(payload.address),
        coordinates: Set(payload.coordinates),
        total_spots: Set(payload.total_spots),
        available_spots: Set(available_spots),
        hourly_rate: Set(payload.hourly_rate.unwrap_or(0)),
        daily_rate: Set(payload.daily_rate.unwrap_or(0)),
        monthly_rate: Set(payload.monthly_rate.unwrap_or(0)),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let spots: Vec<SpotActive> = (1..=zone.total_spots)
        .map(|index| SpotActive {
            id: Set(Uuid::new_v4()),
            zone_id: Set(zone.id),
            spot_number: Set(spot_number(index)),
            status: Set(SpotStatus::Empty),
            spot_type: Set(spot_type_for(index, zone.total_spots)),
            is_active: Set(true),
            created_at: Set(now.into()),
        })
        .collect();
    let spots_created = spots.len();
    for chunk in spots.chunks(SPOT_INSERT_CHUNK) {
        ParkingSpots::insert_many(chunk.to_vec()).exec(&txn).await?;
    }

    txn.commit().await?;

    tracing::info!(zone_id = %zone.id, spots = spots_created, "parking zone created");
    audit::record(
        state,
        Some(user.user_id),
        "zone_create",
        "parking_zones",
        serde_json::json!({ "zone_id": zone.id, "spots": spots_created }),
    )
    .await;

    Ok(ApiResponse::success(
        "Parking zone created",
        ZoneCreated {
            zone: ParkingZone::from(zone),
            spots_created,
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_zone(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ParkingZone>> {
    ensure_admin(user)?;
    let zone = ParkingZones::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(ParkingZone::from)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Parking zone", zone, Some(Meta::empty())))
}

pub async fn update_zone(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateZoneRequest,
) -> AppResult<ApiResponse<ParkingZone>> {
    ensure_admin(user)?;
    let existing = ParkingZones::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let total_spots = payload.total_spots.unwrap_or(existing.total_spots);
    let available_spots = payload.available_spots.unwrap_or(existing.available_spots);
    if available_spots > total_spots {
        return Err(AppError::field(
            "available_spots",
            "range",
            "available_spots must not exceed total_spots",
        ));
    }

    let mut active: ZoneActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_owned());
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(coordinates) = payload.coordinates {
        active.coordinates = Set(coordinates);
    }
    active.total_spots = Set(total_spots);
    active.available_spots = Set(available_spots);
    if let Some(rate) = payload.hourly_rate {
        active.hourly_rate = Set(rate);
    }
    if let Some(rate) = payload.daily_rate {
        active.daily_rate = Set(rate);
    }
    if let Some(rate) = payload.monthly_rate {
        active.monthly_rate = Set(rate);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }

    let zone = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "zone_update",
        "parking_zones",
        serde_json::json!({ "zone_id": zone.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        ParkingZone::from(zone),
        Some(Meta::empty()),
    ))
}

pub async fn delete_zone(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = ParkingZones::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        Some(user.user_id),
        "zone_delete",
        "parking_zones",
        serde_json::json!({ "zone_id": id }),
    )
    .await;

    Ok(ApiResponse::ack("Deleted"))
}

/// Active, empty spots of one zone.
pub async fn zone_spots(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ZoneSpots>> {
    ensure_admin(user)?;
    let zone = ParkingZones::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = ParkingSpots::find()
        .filter(
            Condition::all()
                .add(SpotCol::ZoneId.eq(zone.id))
                .add(SpotCol::Status.eq(SpotStatus::Empty))
                .add(SpotCol::IsActive.eq(true)),
        )
        .order_by_asc(SpotCol::SpotNumber)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ParkingSpot::from)
        .collect();

    Ok(ApiResponse::success(
        "Available spots",
        ZoneSpots {
            zone: ParkingZone::from(zone),
            items,
        },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(total: i32) -> Vec<SpotType> {
        (1..=total).map(|i| spot_type_for(i, total)).collect()
    }

    #[test]
    fn twenty_five_spots() {
        let types = layout(25);
        assert_eq!(types[0], SpotType::Handicapped);
        assert_eq!(types[1], SpotType::Handicapped);
        assert_eq!(types[2], SpotType::Electric);
        assert!(types[3..].iter().all(|t| *t == SpotType::Regular));
    }

    #[test]
    fn hundred_spots_have_eight_electric() {
        let types = layout(100);
        let electric = types.iter().filter(|t| **t == SpotType::Electric).count();
        assert_eq!(electric, 8);
        assert_eq!(types[9], SpotType::Electric);
        assert_eq!(types[10], SpotType::Regular);
    }

    #[test]
    fn small_zones_are_all_handicapped_then_regular() {
        assert_eq!(layout(1), vec![SpotType::Handicapped]);
        assert_eq!(
            layout(3),
            vec![SpotType::Handicapped, SpotType::Handicapped, SpotType::Regular]
        );
        assert!(layout(0).is_empty());
    }

    #[test]
    fn spot_numbers_are_zero_padded() {
        assert_eq!(spot_number(1), "A001");
        assert_eq!(spot_number(42), "A042");
        assert_eq!(spot_number(999), "A999");
        assert_eq!(spot_number(1000), "A1000");
    }
}
