use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    parking_spots::{self, SpotStatus, SpotType},
    parking_zones,
    payments::{self, PaymentMethod, PaymentStatus},
    reservations::{self, ReservationStatus},
    users::{self, Role},
};

/// Public view of a user; the password hash never leaves the service.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParkingZone {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub coordinates: String,
    pub total_spots: i32,
    pub available_spots: i32,
    pub hourly_rate: i64,
    pub daily_rate: i64,
    pub monthly_rate: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParkingSpot {
    pub id: Uuid,
    pub zone_id: Uuid,
    pub spot_number: String,
    pub status: SpotStatus,
    pub spot_type: SpotType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub spot_id: Uuid,
    pub start_time: DateTime<Utc>,
    /// Time of the last modification of the reservation.
    pub end_time: DateTime<Utc>,
    pub status: ReservationStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub price: i64,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for UserProfile {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            phone: model.phone,
            role: model.role,
        }
    }
}

impl From<parking_zones::Model> for ParkingZone {
    fn from(model: parking_zones::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            coordinates: model.coordinates,
            total_spots: model.total_spots,
            available_spots: model.available_spots,
            hourly_rate: model.hourly_rate,
            daily_rate: model.daily_rate,
            monthly_rate: model.monthly_rate,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<parking_spots::Model> for ParkingSpot {
    fn from(model: parking_spots::Model) -> Self {
        Self {
            id: model.id,
            zone_id: model.zone_id,
            spot_number: model.spot_number,
            status: model.status,
            spot_type: model.spot_type,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<reservations::Model> for Reservation {
    fn from(model: reservations::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            spot_id: model.spot_id,
            start_time: model.start_time.with_timezone(&Utc),
            end_time: model.end_time.with_timezone(&Utc),
            status: model.status,
        }
    }
}

impl From<payments::Model> for Payment {
    fn from(model: payments::Model) -> Self {
        Self {
            id: model.id,
            reservation_id: model.reservation_id,
            user_id: model.user_id,
            price: model.price,
            payment_method: model.payment_method,
            status: model.status,
            transaction_id: model.transaction_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
