use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entity::{
        parking_spots::{SpotStatus, SpotType},
        payments::PaymentMethod,
    },
    models::{ParkingSpot, Payment, Reservation},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSpotRequest {
    pub zone_id: Uuid,
    #[validate(length(min = 1, max = 20, message = "spot_number must be 1-20 characters"))]
    pub spot_number: String,
    pub spot_type: Option<SpotType>,
    pub payment_method: PaymentMethod,
    /// Defaults to the id of the reservation created alongside the spot.
    #[validate(length(min = 1, max = 64, message = "transaction_id must be 1-64 characters"))]
    pub transaction_id: Option<String>,
}

/// Everything written by a spot creation.
#[derive(Debug, Serialize, ToSchema)]
pub struct SpotBundle {
    pub spot: ParkingSpot,
    pub reservation: Reservation,
    pub payment: Payment,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSpotRequest {
    pub zone_id: Option<Uuid>,
    #[validate(length(min = 1, max = 20, message = "spot_number must be 1-20 characters"))]
    pub spot_number: Option<String>,
    pub spot_type: Option<SpotType>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SpotStatusRequest {
    pub status: Option<SpotStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SpotList {
    pub items: Vec<ParkingSpot>,
}
