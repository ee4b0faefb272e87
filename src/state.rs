use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, mailer::Mailer, otp::OtpStore};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub otp: Arc<dyn OtpStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(
        orm: DatabaseConnection,
        config: AppConfig,
        otp: Arc<dyn OtpStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            orm,
            config: Arc::new(config),
            otp,
            mailer,
        }
    }
}
