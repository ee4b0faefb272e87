pub mod auth;
pub mod payments;
pub mod profile;
pub mod reservations;
pub mod spots;
pub mod zones;
