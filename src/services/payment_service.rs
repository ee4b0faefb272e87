use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::payments::{CreatePaymentRequest, PaymentList, RefundAck, RefundRequest},
    entity::{
        payments::{ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments},
        reservations::{Column as ReservationCol, Entity as Reservations},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Payment,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_payments(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<PaymentList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Payments::find()
        .filter(PaymentCol::UserId.eq(user.user_id))
        .order_by_desc(PaymentCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Payment::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        PaymentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn create_payment(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentRequest,
) -> AppResult<ApiResponse<Payment>> {
    let reservation = Reservations::find()
        .filter(
            Condition::all()
                .add(ReservationCol::Id.eq(payload.reservation_id))
                .add(ReservationCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::field("reservation_id", "exists", "Reservation does not exist"))?;

    let transaction_id = payload
        .transaction_id
        .unwrap_or_else(|| reservation.id.to_string());

    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        reservation_id: Set(reservation.id),
        user_id: Set(user.user_id),
        price: Set(payload.price),
        payment_method: Set(payload.payment_method.unwrap_or_default()),
        status: Set(payload.status.unwrap_or_default()),
        transaction_id: Set(transaction_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "payment_create",
        "payments",
        serde_json::json!({ "payment_id": payment.id, "reservation_id": reservation.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment created",
        Payment::from(payment),
        Some(Meta::empty()),
    ))
}

pub async fn get_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Payment>> {
    let payment = Payments::find()
        .filter(
            Condition::all()
                .add(PaymentCol::Id.eq(id))
                .add(PaymentCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?
        .map(Payment::from)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("OK", payment, Some(Meta::empty())))
}

/// Acknowledges a well-formed refund request. Stored payments are left untouched.
pub async fn refund_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RefundRequest,
) -> AppResult<ApiResponse<RefundAck>> {
    ensure_admin(user)?;
    let transaction_id = payload.transaction_id.clone();

    audit::record(
        state,
        Some(user.user_id),
        "payment_refund",
        "payments",
        serde_json::json!({ "payment_id": id, "request": payload }),
    )
    .await;

    Ok(ApiResponse::success(
        "Refund accepted",
        RefundAck {
            payment_id: id,
            transaction_id,
        },
        Some(Meta::empty()),
    ))
}
