use std::sync::Arc;

use chrono::Utc;
use parking_reservation_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::zones::CreateZoneRequest,
    entity::{
        parking_zones::{Column as ZoneCol, Entity as ParkingZones},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Role},
    },
    mailer::LogMailer,
    middleware::auth::AuthUser,
    otp::MokaOtpStore,
    services::{auth_service::hash_password, zone_service},
    state::AppState,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

const DEMO_ZONE: &str = "Demo zone";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let mailer = Arc::new(LogMailer::new(config.mail_from.clone()));
    let state = AppState::new(orm, config, Arc::new(MokaOtpStore::default()), mailer);

    let admin_id = ensure_user(
        &state,
        "admin",
        "admin@example.com",
        "998900000001",
        "admin123",
        Role::Admin,
    )
    .await?;
    let user_id = ensure_user(
        &state,
        "user",
        "user@example.com",
        "998900000002",
        "user123",
        Role::User,
    )
    .await?;
    seed_zone(&state, admin_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    state: &AppState,
    username: &str,
    email: &str,
    phone: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    // If user already exists, promote it to the wanted role
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(&state.orm)
        .await?
    {
        let id = existing.id;
        let mut active: UserActive = existing.into();
        active.role = Set(role);
        active.update(&state.orm).await?;
        return Ok(id);
    }

    let password_hash = hash_password(password)?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_owned()),
        email: Set(email.to_owned()),
        phone: Set(phone.to_owned()),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        password_hash: Set(password_hash),
        role: Set(role),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(user.id)
}

async fn seed_zone(state: &AppState, admin_id: Uuid) -> anyhow::Result<()> {
    let exists = ParkingZones::find()
        .filter(ZoneCol::Name.eq(DEMO_ZONE))
        .one(&state.orm)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    let admin = AuthUser {
        user_id: admin_id,
        role: Role::Admin,
    };
    let payload = CreateZoneRequest {
        name: DEMO_ZONE.to_string(),
        address: "1 Demo street".to_string(),
        coordinates: "41.311081,69.240562".to_string(),
        total_spots: 25,
        available_spots: None,
        hourly_rate: Some(5_000),
        daily_rate: Some(50_000),
        monthly_rate: Some(900_000),
        is_active: Some(true),
    };
    let created = zone_service::create_zone(state, &admin, payload).await?;
    if let Some(data) = created.data {
        println!("Created {} with {} spots", data.zone.name, data.spots_created);
    }
    Ok(())
}
