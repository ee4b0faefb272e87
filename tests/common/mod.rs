#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use parking_reservation_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::users::{ActiveModel as UserActive, Role},
    mailer::Mailer,
    middleware::auth::AuthUser,
    otp::MokaOtpStore,
    services::auth_service::hash_password,
    state::AppState,
};
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Keeps every message instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
    /// Body of the most recent mail addressed to `to`.
    pub fn last_body_for(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(recipient, _, _)| recipient == to)
            .map(|(_, _, body)| body.clone())
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_owned(), subject.to_owned(), body.to_owned()));
        Ok(())
    }
}

/// Rejects every message, like an unreachable relay.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> anyhow::Result<()> {
        anyhow::bail!("mail relay unavailable")
    }
}

pub async fn setup_state() -> anyhow::Result<(AppState, Arc<RecordingMailer>)> {
    let mailer = Arc::new(RecordingMailer::default());
    let state = setup_state_with_mailer(mailer.clone()).await?;
    Ok((state, mailer))
}

pub async fn setup_state_with_mailer(mailer: Arc<dyn Mailer>) -> anyhow::Result<AppState> {
    let config = AppConfig::for_database("sqlite::memory:", TEST_SECRET);
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    Ok(AppState::new(
        orm,
        config,
        Arc::new(MokaOtpStore::default()),
        mailer,
    ))
}

pub async fn create_user(state: &AppState, username: &str, role: Role) -> anyhow::Result<AuthUser> {
    let id = Uuid::new_v4();
    UserActive {
        id: Set(id),
        username: Set(username.to_owned()),
        email: Set(format!("{username}@example.com")),
        phone: Set(format!("99890{}", &id.as_u128().to_string()[..7])),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        password_hash: Set(hash_password("secret123")?),
        role: Set(role),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser { user_id: id, role })
}
