pub mod audit_logs;
pub mod parking_spots;
pub mod parking_zones;
pub mod payments;
pub mod reservations;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use parking_spots::Entity as ParkingSpots;
pub use parking_zones::Entity as ParkingZones;
pub use payments::Entity as Payments;
pub use reservations::Entity as Reservations;
pub use users::Entity as Users;
