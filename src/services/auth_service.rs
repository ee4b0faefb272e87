use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, sea_query::Expr,
};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{
    audit,
    dto::auth::{
        AccessToken, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RefreshRequest,
        RegisterRequest, TokenKind, TokenPair, VerifyOtpRequest,
    },
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Role},
    error::{AppError, AppResult, field_error},
    middleware::auth::{decode_token, issue_token},
    models::UserProfile,
    otp::{OtpState, generate_code},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Strips phone formatting (spaces, dashes, dots, parentheses, one leading `+`).
/// Returns `None` when anything other than digits remains.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(cleaned)
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(password_hash)
}

fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    let RegisterRequest {
        username,
        email,
        password,
        phone,
        first_name,
        last_name,
    } = payload;
    let username = username.trim().to_owned();
    let email = email.trim().to_owned();

    let mut errors = ValidationErrors::new();
    if Users::find()
        .filter(UserCol::Username.eq(username.as_str()))
        .one(&state.orm)
        .await?
        .is_some()
    {
        errors.add("username", field_error("unique", "Username already exists"));
    }
    if Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
        .is_some()
    {
        errors.add("email", field_error("unique", "Email already exists"));
    }
    let phone = match normalize_phone(&phone) {
        Some(phone) => {
            if Users::find()
                .filter(UserCol::Phone.eq(phone.as_str()))
                .one(&state.orm)
                .await?
                .is_some()
            {
                errors.add("phone", field_error("unique", "Phone already exists"));
            }
            phone
        }
        None => {
            errors.add(
                "phone",
                field_error("digits", "Phone number must contain only digits"),
            );
            String::new()
        }
    };
    if !errors.errors().is_empty() {
        return Err(AppError::Validation(errors));
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        email: Set(email),
        phone: Set(phone),
        first_name: Set(first_name),
        last_name: Set(last_name),
        password_hash: Set(hash_password(&password)?),
        role: Set(Role::User),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "User created",
        UserProfile::from(user),
        Some(Meta::empty()),
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<TokenPair>> {
    let LoginRequest { username, password } = payload;
    let invalid = || AppError::Unauthorized("No active account found with the given credentials".into());

    let user = Users::find()
        .filter(UserCol::Username.eq(username.trim()))
        .one(&state.orm)
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active || !verify_password(&password, &user.password_hash)? {
        return Err(invalid());
    }

    let tokens = TokenPair {
        access: issue_token(&state.config, user.id, user.role, TokenKind::Access)?,
        refresh: issue_token(&state.config, user.id, user.role, TokenKind::Refresh)?,
    };

    audit::record(
        state,
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success("Logged in", tokens, Some(Meta::empty())))
}

pub async fn refresh_token(
    state: &AppState,
    payload: RefreshRequest,
) -> AppResult<ApiResponse<AccessToken>> {
    let claims = decode_token(&state.config, payload.refresh.trim(), TokenKind::Refresh)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

    let user = Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    let access = issue_token(&state.config, user.id, user.role, TokenKind::Access)?;
    Ok(ApiResponse::success(
        "Token refreshed",
        AccessToken { access },
        Some(Meta::empty()),
    ))
}

pub async fn forgot_password(
    state: &AppState,
    payload: ForgotPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let email = payload.email.trim();
    let exists = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(&state.orm)
        .await?
        .is_some();
    if !exists {
        return Err(AppError::BadRequest("Email not found".into()));
    }

    let code = generate_code();
    state
        .otp
        .put(email, OtpState::Pending { code: code.clone() }, state.config.otp_ttl)
        .await;

    state
        .mailer
        .send(email, "Verification Code", &code)
        .await
        .map_err(AppError::Internal)?;

    tracing::info!(email = %email, "password reset code issued");
    Ok(ApiResponse::ack("Verification code sent"))
}

pub async fn verify_otp(
    state: &AppState,
    payload: VerifyOtpRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let email = payload.email.trim();
    match state.otp.get(email).await {
        None => return Err(AppError::BadRequest("Code expired".into())),
        Some(OtpState::Pending { code }) if code == payload.code => {}
        Some(_) => return Err(AppError::BadRequest("Invalid code".into())),
    }

    state
        .otp
        .put(email, OtpState::Verified, state.config.otp_verified_ttl)
        .await;

    tracing::info!(email = %email, "password reset code verified");
    Ok(ApiResponse::ack("Code verified"))
}

pub async fn change_password(
    state: &AppState,
    payload: ChangePasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let email = payload.email.trim();
    match state.otp.get(email).await {
        None => return Err(AppError::BadRequest("Code expired".into())),
        Some(OtpState::Pending { .. }) => {
            return Err(AppError::BadRequest("Verify the email first".into()));
        }
        Some(OtpState::Verified) => {}
    }

    if payload.password != payload.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".into()));
    }

    // Plain column update, no model hooks run for the password write.
    let result = Users::update_many()
        .col_expr(UserCol::PasswordHash, Expr::value(hash_password(&payload.password)?))
        .filter(UserCol::Email.eq(email))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    state.otp.remove(email).await;

    audit::record(
        state,
        None,
        "password_change",
        "users",
        serde_json::json!({ "email": email }),
    )
    .await;

    Ok(ApiResponse::ack("Password changed"))
}

#[cfg(test)]
mod tests {
    use super::{hash_password, normalize_phone, verify_password};

    #[test]
    fn phone_formatting_is_removed() {
        assert_eq!(normalize_phone("+998 (90) 123-45-67").as_deref(), Some("998901234567"));
        assert_eq!(normalize_phone("  901234567 ").as_deref(), Some("901234567"));
        assert_eq!(normalize_phone("90.123.45.67").as_deref(), Some("901234567"));
    }

    #[test]
    fn phone_with_other_characters_is_rejected() {
        assert_eq!(normalize_phone("90-12a-4567"), None);
        assert_eq!(normalize_phone("++998901234567"), None);
        assert_eq!(normalize_phone("phone"), None);
        assert_eq!(normalize_phone(" - "), None);
        assert_eq!(normalize_phone(""), None);
    }

    #[test]
    fn password_hash_verifies_only_the_hashed_password() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert_ne!(hash, "s3cret-pass");
        assert!(verify_password("s3cret-pass", &hash).unwrap());
        assert!(!verify_password("other-pass", &hash).unwrap());
    }
}
