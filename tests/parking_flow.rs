mod common;

use parking_reservation_api::{
    dto::{
        payments::{CreatePaymentRequest, RefundRequest},
        reservations::{CreateReservationRequest, UpdateReservationRequest},
        spots::{CreateSpotRequest, SpotStatusRequest},
        zones::{CreateZoneRequest, UpdateZoneRequest},
    },
    entity::{
        parking_spots::{Entity as ParkingSpots, SpotStatus, SpotType},
        payments::{Entity as Payments, PaymentMethod, PaymentStatus},
        reservations::{Entity as Reservations, ReservationStatus},
        users::Role,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::ParkingZone,
    routes::params::{Pagination, ReservationListQuery, SpotQuery},
    services::{payment_service, reservation_service, spot_service, zone_service},
    state::AppState,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

fn zone_request(name: &str, total_spots: i32) -> CreateZoneRequest {
    CreateZoneRequest {
        name: name.to_string(),
        address: "Amir Temur 1".to_string(),
        coordinates: "41.3,69.2".to_string(),
        total_spots,
        available_spots: None,
        hourly_rate: Some(5_000),
        daily_rate: Some(40_000),
        monthly_rate: None,
        is_active: None,
    }
}

fn spot_request(zone_id: Uuid, spot_number: &str, transaction_id: Option<&str>) -> CreateSpotRequest {
    CreateSpotRequest {
        zone_id,
        spot_number: spot_number.to_string(),
        spot_type: None,
        payment_method: PaymentMethod::Card,
        transaction_id: transaction_id.map(str::to_string),
    }
}

async fn create_zone(state: &AppState, admin: &AuthUser, name: &str, total: i32) -> anyhow::Result<ParkingZone> {
    let created = zone_service::create_zone(state, admin, zone_request(name, total)).await?;
    Ok(created.data.expect("zone").zone)
}

async fn row_counts(state: &AppState) -> anyhow::Result<(u64, u64, u64)> {
    Ok((
        ParkingSpots::find().count(&state.orm).await?,
        Reservations::find().count(&state.orm).await?,
        Payments::find().count(&state.orm).await?,
    ))
}

#[tokio::test]
async fn zone_creation_generates_spot_layout() -> anyhow::Result<()> {
    let (state, _mailer) = common::setup_state().await?;
    let admin = common::create_user(&state, "admin", Role::Admin).await?;

    let created = zone_service::create_zone(&state, &admin, zone_request("Central", 25))
        .await?
        .data
        .expect("zone");
    assert_eq!(created.spots_created, 25);
    assert_eq!(created.zone.available_spots, 25);

    let spots = zone_service::zone_spots(&state, &admin, created.zone.id)
        .await?
        .data
        .expect("spots")
        .items;
    assert_eq!(spots.len(), 25);
    assert_eq!(spots[0].spot_number, "A001");
    assert_eq!(spots[24].spot_number, "A025");

    let count = |t: SpotType| spots.iter().filter(|s| s.spot_type == t).count();
    assert_eq!(count(SpotType::Handicapped), 2);
    assert_eq!(count(SpotType::Electric), 1);
    assert_eq!(count(SpotType::Regular), 22);
    assert!(spots.iter().all(|s| s.status == SpotStatus::Empty));

    let listed = spot_service::list_spots(
        &state,
        SpotQuery {
            zone_id: Some(created.zone.id),
            spot_type: Some(SpotType::Handicapped),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(listed.meta.and_then(|m| m.total), Some(2));
    Ok(())
}

#[tokio::test]
async fn zone_management_is_admin_only() -> anyhow::Result<()> {
    let (state, _mailer) = common::setup_state().await?;
    let admin = common::create_user(&state, "admin", Role::Admin).await?;
    let user = common::create_user(&state, "driver", Role::User).await?;
    let super_admin = common::create_user(&state, "root", Role::SuperAdmin).await?;

    for caller in [&user, &super_admin] {
        let err = zone_service::create_zone(&state, caller, zone_request("North", 5))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    let zone = create_zone(&state, &admin, "North", 5).await?;
    let err = zone_service::get_zone(&state, &user, zone.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    let err = zone_service::delete_zone(&state, &user, zone.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // Any authenticated user can list zones.
    let zones = zone_service::list_zones(&state, Pagination::default()).await?;
    assert_eq!(zones.data.expect("zones").items.len(), 1);

    let err = zone_service::create_zone(&state, &admin, zone_request("North", 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let mut too_many = zone_request("South", 5);
    too_many.available_spots = Some(6);
    let err = zone_service::create_zone(&state, &admin, too_many).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let updated = zone_service::update_zone(
        &state,
        &admin,
        zone.id,
        UpdateZoneRequest {
            name: None,
            address: None,
            coordinates: None,
            total_spots: None,
            available_spots: Some(3),
            hourly_rate: Some(7_000),
            daily_rate: None,
            monthly_rate: None,
            is_active: None,
        },
    )
    .await?
    .data
    .expect("zone");
    assert_eq!(updated.available_spots, 3);
    assert_eq!(updated.hourly_rate, 7_000);
    assert_eq!(updated.total_spots, 5);

    zone_service::delete_zone(&state, &admin, zone.id).await?;
    let err = zone_service::get_zone(&state, &admin, zone.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn spot_creation_writes_spot_reservation_and_payment() -> anyhow::Result<()> {
    let (state, _mailer) = common::setup_state().await?;
    let admin = common::create_user(&state, "admin", Role::Admin).await?;
    let user = common::create_user(&state, "driver", Role::User).await?;
    let zone = create_zone(&state, &admin, "Airport", 0).await?;

    let bundle = spot_service::create_spot(&state, &user, spot_request(zone.id, "B001", None))
        .await?
        .data
        .expect("bundle");

    assert_eq!(bundle.spot.zone_id, zone.id);
    assert_eq!(bundle.spot.status, SpotStatus::Empty);
    assert_eq!(bundle.reservation.spot_id, bundle.spot.id);
    assert_eq!(bundle.reservation.user_id, user.user_id);
    assert_eq!(bundle.reservation.status, ReservationStatus::Pending);
    assert_eq!(bundle.payment.reservation_id, bundle.reservation.id);
    assert_eq!(bundle.payment.status, PaymentStatus::Pending);
    assert_eq!(bundle.payment.payment_method, PaymentMethod::Card);
    assert_eq!(bundle.payment.price, zone.hourly_rate);
    assert_eq!(bundle.payment.transaction_id, bundle.reservation.id.to_string());

    assert_eq!(row_counts(&state).await?, (1, 1, 1));
    Ok(())
}

#[tokio::test]
async fn failed_payment_rolls_back_spot_and_reservation() -> anyhow::Result<()> {
    let (state, _mailer) = common::setup_state().await?;
    let admin = common::create_user(&state, "admin", Role::Admin).await?;
    let user = common::create_user(&state, "driver", Role::User).await?;
    let zone = create_zone(&state, &admin, "Airport", 0).await?;

    spot_service::create_spot(&state, &user, spot_request(zone.id, "B001", Some("tx-1"))).await?;
    assert_eq!(row_counts(&state).await?, (1, 1, 1));

    // Same transaction id: the payment insert fails after spot and reservation were written.
    let err = spot_service::create_spot(&state, &user, spot_request(zone.id, "B002", Some("tx-1")))
        .await
        .unwrap_err();
    // Driver text (table and constraint names) stays in the log.
    assert!(matches!(err, AppError::Conflict(ref m) if m == "Duplicate value"));
    assert!(!err.to_string().contains("payments"));
    assert_eq!(row_counts(&state).await?, (1, 1, 1));

    let err = spot_service::create_spot(&state, &user, spot_request(zone.id, "B001", Some("tx-2")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(row_counts(&state).await?, (1, 1, 1));

    let err = spot_service::create_spot(&state, &user, spot_request(Uuid::new_v4(), "B003", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert_eq!(row_counts(&state).await?, (1, 1, 1));
    Ok(())
}

#[tokio::test]
async fn spot_status_is_overwritten_without_transition_rules() -> anyhow::Result<()> {
    let (state, _mailer) = common::setup_state().await?;
    let admin = common::create_user(&state, "admin", Role::Admin).await?;
    let zone = create_zone(&state, &admin, "Market", 3).await?;
    let spot_id = zone_service::zone_spots(&state, &admin, zone.id)
        .await?
        .data
        .expect("spots")
        .items[0]
        .id;

    for status in [
        SpotStatus::Maintenance,
        SpotStatus::Occupied,
        SpotStatus::Empty,
        SpotStatus::Reserved,
        SpotStatus::Maintenance,
    ] {
        let spot = spot_service::update_spot_status(
            &state,
            &admin,
            spot_id,
            SpotStatusRequest {
                status: Some(status),
            },
        )
        .await?
        .data
        .expect("spot");
        assert_eq!(spot.status, status);
    }

    let err = spot_service::update_spot_status(&state, &admin, spot_id, SpotStatusRequest { status: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Status is required"));

    let available = spot_service::available_spots(&state, Pagination::default()).await?;
    assert_eq!(available.meta.and_then(|m| m.total), Some(2));
    Ok(())
}

#[tokio::test]
async fn reservation_check_in_and_check_out() -> anyhow::Result<()> {
    let (state, _mailer) = common::setup_state().await?;
    let admin = common::create_user(&state, "admin", Role::Admin).await?;
    let user = common::create_user(&state, "driver", Role::User).await?;
    let other = common::create_user(&state, "other", Role::User).await?;
    let zone = create_zone(&state, &admin, "Station", 2).await?;
    let spots = zone_service::zone_spots(&state, &admin, zone.id)
        .await?
        .data
        .expect("spots")
        .items;

    let reservation = reservation_service::create_reservation(
        &state,
        &user,
        CreateReservationRequest {
            spot_id: spots[0].id,
        },
    )
    .await?
    .data
    .expect("reservation");
    assert_eq!(reservation.status, ReservationStatus::Pending);

    let err = reservation_service::check_out(&state, &user, reservation.id)
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::BadRequest(ref m) if m == "Check-out is only allowed for active reservations")
    );
    let current = reservation_service::get_reservation(&state, &user, reservation.id)
        .await?
        .data
        .expect("reservation");
    assert_eq!(current.status, ReservationStatus::Pending);

    // Someone else's reservation reads as missing.
    let err = reservation_service::check_in(&state, &other, reservation.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let active = reservation_service::check_in(&state, &user, reservation.id)
        .await?
        .data
        .expect("reservation");
    assert_eq!(active.status, ReservationStatus::Active);
    assert_eq!(active.start_time, reservation.start_time);
    assert!(active.end_time >= reservation.end_time);

    let err = reservation_service::check_in(&state, &user, reservation.id)
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::BadRequest(ref m) if m == "Check-in is only allowed for pending reservations")
    );

    let completed = reservation_service::check_out(&state, &user, reservation.id)
        .await?
        .data
        .expect("reservation");
    assert_eq!(completed.status, ReservationStatus::Completed);

    let moved = reservation_service::update_reservation(
        &state,
        &user,
        reservation.id,
        UpdateReservationRequest {
            spot_id: spots[1].id,
        },
    )
    .await?
    .data
    .expect("reservation");
    assert_eq!(moved.spot_id, spots[1].id);

    let listed = reservation_service::list_reservations(
        &state,
        &user,
        ReservationListQuery {
            status: Some(ReservationStatus::Completed),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(listed.data.expect("list").items.len(), 1);
    let listed = reservation_service::list_reservations(&state, &other, Default::default()).await?;
    assert!(listed.data.expect("list").items.is_empty());

    let err = reservation_service::delete_reservation(&state, &other, reservation.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    reservation_service::delete_reservation(&state, &user, reservation.id).await?;
    assert_eq!(Reservations::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn payments_are_scoped_to_owner_and_refund_is_acknowledged_only() -> anyhow::Result<()> {
    let (state, _mailer) = common::setup_state().await?;
    let admin = common::create_user(&state, "admin", Role::Admin).await?;
    let user = common::create_user(&state, "driver", Role::User).await?;
    let other = common::create_user(&state, "other", Role::User).await?;
    let zone = create_zone(&state, &admin, "Harbor", 0).await?;

    let bundle = spot_service::create_spot(&state, &user, spot_request(zone.id, "H001", None))
        .await?
        .data
        .expect("bundle");

    let err = payment_service::create_payment(
        &state,
        &other,
        CreatePaymentRequest {
            reservation_id: bundle.reservation.id,
            price: 1_000,
            payment_method: None,
            status: None,
            transaction_id: Some("tx-other".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Defaults to the reservation id, which the bundle payment already holds.
    let err = payment_service::create_payment(
        &state,
        &user,
        CreatePaymentRequest {
            reservation_id: bundle.reservation.id,
            price: 1_000,
            payment_method: None,
            status: None,
            transaction_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let extra = payment_service::create_payment(
        &state,
        &user,
        CreatePaymentRequest {
            reservation_id: bundle.reservation.id,
            price: 2_500,
            payment_method: Some(PaymentMethod::Cash),
            status: Some(PaymentStatus::Success),
            transaction_id: Some("tx-extra".into()),
        },
    )
    .await?
    .data
    .expect("payment");
    assert_eq!(extra.payment_method, PaymentMethod::Cash);

    let mine = payment_service::list_payments(&state, &user, Pagination::default()).await?;
    assert_eq!(mine.meta.and_then(|m| m.total), Some(2));
    let theirs = payment_service::list_payments(&state, &other, Pagination::default()).await?;
    assert_eq!(theirs.meta.and_then(|m| m.total), Some(0));

    let err = payment_service::get_payment(&state, &other, extra.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let refund = || RefundRequest {
        reservation_id: bundle.reservation.id,
        user_id: user.user_id,
        payment_method: PaymentMethod::Card,
        status: PaymentStatus::Failed,
        transaction_id: bundle.payment.transaction_id.clone(),
    };
    let err = payment_service::refund_payment(&state, &user, bundle.payment.id, refund())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let ack = payment_service::refund_payment(&state, &admin, bundle.payment.id, refund()).await?;
    assert_eq!(ack.message, "Refund accepted");

    let stored = payment_service::get_payment(&state, &user, bundle.payment.id)
        .await?
        .data
        .expect("payment");
    assert_eq!(stored.status, PaymentStatus::Pending);
    assert_eq!(stored.payment_method, PaymentMethod::Card);
    Ok(())
}
