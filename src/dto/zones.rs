use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{ParkingSpot, ParkingZone};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateZoneRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 1, max = 255, message = "coordinates must be 1-255 characters"))]
    pub coordinates: String,
    #[validate(range(min = 0, max = 10000, message = "total_spots must be between 0 and 10000"))]
    pub total_spots: i32,
    /// Defaults to `total_spots`.
    #[validate(range(min = 0, message = "available_spots must not be negative"))]
    pub available_spots: Option<i32>,
    #[validate(range(min = 0))]
    pub hourly_rate: Option<i64>,
    #[validate(range(min = 0))]
    pub daily_rate: Option<i64>,
    #[validate(range(min = 0))]
    pub monthly_rate: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateZoneRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 255, message = "coordinates must be 1-255 characters"))]
    pub coordinates: Option<String>,
    #[validate(range(min = 0, max = 10000, message = "total_spots must be between 0 and 10000"))]
    pub total_spots: Option<i32>,
    #[validate(range(min = 0, message = "available_spots must not be negative"))]
    pub available_spots: Option<i32>,
    #[validate(range(min = 0))]
    pub hourly_rate: Option<i64>,
    #[validate(range(min = 0))]
    pub daily_rate: Option<i64>,
    #[validate(range(min = 0))]
    pub monthly_rate: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneCreated {
    pub zone: ParkingZone,
    pub spots_created: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneList {
    pub items: Vec<ParkingZone>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneSpots {
    pub zone: ParkingZone,
    pub items: Vec<ParkingSpot>,
}
