use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entity::payments::{PaymentMethod, PaymentStatus},
    models::Payment,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentRequest {
    pub reservation_id: Uuid,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: i64,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<PaymentStatus>,
    /// Defaults to the reservation id.
    #[validate(length(min = 1, max = 64, message = "transaction_id must be 1-64 characters"))]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct RefundRequest {
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    #[validate(length(min = 1, max = 64, message = "transaction_id must be 1-64 characters"))]
    pub transaction_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefundAck {
    pub payment_id: Uuid,
    pub transaction_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentList {
    pub items: Vec<Payment>,
}
