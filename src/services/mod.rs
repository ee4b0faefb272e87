pub mod auth_service;
pub mod payment_service;
pub mod profile_service;
pub mod reservation_service;
pub mod spot_service;
pub mod zone_service;
