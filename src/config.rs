use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub access_token_ttl: chrono::Duration,
    pub refresh_token_ttl: chrono::Duration,
    pub otp_ttl: Duration,
    pub otp_verified_ttl: Duration,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let mail_from =
            env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@parking.local".to_string());

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            access_token_ttl: chrono::Duration::minutes(env_number("JWT_ACCESS_TTL_MINUTES", 5)),
            refresh_token_ttl: chrono::Duration::minutes(env_number(
                "JWT_REFRESH_TTL_MINUTES",
                24 * 60,
            )),
            otp_ttl: Duration::from_secs(env_number("OTP_TTL_SECONDS", 60) as u64),
            otp_verified_ttl: Duration::from_secs(env_number("OTP_VERIFIED_TTL_SECONDS", 120) as u64),
            mail_from,
        })
    }

    /// Config for tests and tooling that never touch the environment.
    pub fn for_database(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            jwt_secret: jwt_secret.into(),
            access_token_ttl: chrono::Duration::minutes(5),
            refresh_token_ttl: chrono::Duration::minutes(24 * 60),
            otp_ttl: Duration::from_secs(60),
            otp_verified_ttl: Duration::from_secs(120),
            mail_from: "no-reply@parking.local".to_string(),
        }
    }
}

fn env_number(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}
