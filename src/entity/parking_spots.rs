use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum SpotStatus {
    #[default]
    #[sea_orm(string_value = "empty")]
    Empty,
    #[sea_orm(string_value = "occupied")]
    Occupied,
    #[sea_orm(string_value = "reserved")]
    Reserved,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum SpotType {
    #[default]
    #[sea_orm(string_value = "regular")]
    Regular,
    #[sea_orm(string_value = "handicapped")]
    Handicapped,
    #[sea_orm(string_value = "electric")]
    Electric,
    #[sea_orm(string_value = "vip")]
    Vip,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parking_spots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub zone_id: Uuid,
    pub spot_number: String,
    pub status: SpotStatus,
    pub spot_type: SpotType,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parking_zones::Entity",
        from = "Column::ZoneId",
        to = "super::parking_zones::Column::Id"
    )]
    ParkingZones,
    #[sea_orm(has_many = "super::reservations::Entity")]
    Reservations,
}

impl Related<super::parking_zones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingZones.def()
    }
}

impl Related<super::reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
