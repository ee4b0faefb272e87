use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingZones::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ParkingZones::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ParkingZones::Name).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(ParkingZones::Address).text().not_null())
                    .col(ColumnDef::new(ParkingZones::Coordinates).string_len(255).not_null())
                    .col(ColumnDef::new(ParkingZones::TotalSpots).integer().not_null())
                    .col(ColumnDef::new(ParkingZones::AvailableSpots).integer().not_null())
                    .col(ColumnDef::new(ParkingZones::HourlyRate).big_integer().not_null().default(0))
                    .col(ColumnDef::new(ParkingZones::DailyRate).big_integer().not_null().default(0))
                    .col(ColumnDef::new(ParkingZones::MonthlyRate).big_integer().not_null().default(0))
                    .col(ColumnDef::new(ParkingZones::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(ParkingZones::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingZones::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingZones {
    Table,
    Id,
    Name,
    Address,
    Coordinates,
    TotalSpots,
    AvailableSpots,
    HourlyRate,
    DailyRate,
    MonthlyRate,
    IsActive,
    CreatedAt,
}
