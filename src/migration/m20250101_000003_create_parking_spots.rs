use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_parking_zones::ParkingZones;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSpots::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ParkingSpots::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ParkingSpots::ZoneId).uuid().not_null())
                    .col(ColumnDef::new(ParkingSpots::SpotNumber).string_len(20).not_null())
                    .col(
                        ColumnDef::new(ParkingSpots::Status)
                            .string_len(20)
                            .not_null()
                            .default("empty"),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::SpotType)
                            .string_len(20)
                            .not_null()
                            .default("regular"),
                    )
                    .col(ColumnDef::new(ParkingSpots::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(ParkingSpots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_spots_zone")
                            .from(ParkingSpots::Table, ParkingSpots::ZoneId)
                            .to(ParkingZones::Table, ParkingZones::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_spots_zone_spot_number")
                    .table(ParkingSpots::Table)
                    .col(ParkingSpots::ZoneId)
                    .col(ParkingSpots::SpotNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingSpots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingSpots {
    Table,
    Id,
    ZoneId,
    SpotNumber,
    Status,
    SpotType,
    IsActive,
    CreatedAt,
}
