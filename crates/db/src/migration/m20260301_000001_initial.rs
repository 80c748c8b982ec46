//! Initial schema: accounts, flock records, ledger and storefront orders.
//!
//! Built with the portable schema builder so the same migration runs on
//! Postgres in production and SQLite in tests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Users::Role).string_len(16).not_null().default("customer"))
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Customers::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Customers::Email).string_len(255).null().unique_key())
                    .col(ColumnDef::new(Customers::Phone).string_len(32).null())
                    .col(ColumnDef::new(Customers::Address).text().null())
                    .col(
                        ColumnDef::new(Customers::CustomerType)
                            .string_len(16)
                            .not_null()
                            .default("individual"),
                    )
                    .col(
                        ColumnDef::new(Customers::TotalPurchases)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Customers::Notes).text().null())
                    .col(timestamp(Customers::CreatedAt))
                    .col(timestamp(Customers::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PoultryBatches::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PoultryBatches::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PoultryBatches::BatchName).string_len(255).not_null())
                    .col(ColumnDef::new(PoultryBatches::Breed).string_len(255).null())
                    .col(ColumnDef::new(PoultryBatches::BirdType).string_len(16).not_null())
                    .col(ColumnDef::new(PoultryBatches::InitialCount).integer().not_null())
                    .col(ColumnDef::new(PoultryBatches::CurrentCount).integer().not_null())
                    .col(ColumnDef::new(PoultryBatches::AcquisitionDate).date().not_null())
                    .col(
                        ColumnDef::new(PoultryBatches::AcquisitionCost)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PoultryBatches::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(PoultryBatches::Notes).text().null())
                    .col(ColumnDef::new(PoultryBatches::CreatedBy).uuid().null())
                    .col(timestamp(PoultryBatches::CreatedAt))
                    .col(timestamp(PoultryBatches::UpdatedAt))
                    .check(Expr::col(PoultryBatches::CurrentCount).gte(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EggProduction::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EggProduction::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(EggProduction::BatchId).uuid().not_null())
                    .col(ColumnDef::new(EggProduction::RecordDate).date().not_null())
                    .col(ColumnDef::new(EggProduction::EggsCollected).integer().not_null())
                    .col(
                        ColumnDef::new(EggProduction::BrokenEggs)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(EggProduction::Notes).text().null())
                    .col(ColumnDef::new(EggProduction::RecordedBy).uuid().null())
                    .col(timestamp(EggProduction::CreatedAt))
                    .foreign_key(&mut batch_fk(
                        "fk_egg_production_batch",
                        EggProduction::Table,
                        EggProduction::BatchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeedRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FeedRecords::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(FeedRecords::BatchId).uuid().not_null())
                    .col(ColumnDef::new(FeedRecords::RecordDate).date().not_null())
                    .col(ColumnDef::new(FeedRecords::FeedType).string_len(64).not_null())
                    .col(ColumnDef::new(FeedRecords::QuantityKg).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(FeedRecords::Cost).big_integer().not_null().default(0))
                    .col(ColumnDef::new(FeedRecords::Supplier).string_len(255).null())
                    .col(ColumnDef::new(FeedRecords::Notes).text().null())
                    .col(ColumnDef::new(FeedRecords::RecordedBy).uuid().null())
                    .col(timestamp(FeedRecords::CreatedAt))
                    .foreign_key(&mut batch_fk(
                        "fk_feed_records_batch",
                        FeedRecords::Table,
                        FeedRecords::BatchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HealthRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(HealthRecords::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(HealthRecords::BatchId).uuid().not_null())
                    .col(ColumnDef::new(HealthRecords::RecordDate).date().not_null())
                    .col(ColumnDef::new(HealthRecords::RecordType).string_len(16).not_null())
                    .col(ColumnDef::new(HealthRecords::Description).text().not_null())
                    .col(
                        ColumnDef::new(HealthRecords::MortalityCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(HealthRecords::Cost).big_integer().not_null().default(0))
                    .col(ColumnDef::new(HealthRecords::AdministeredBy).string_len(255).null())
                    .col(ColumnDef::new(HealthRecords::Notes).text().null())
                    .col(ColumnDef::new(HealthRecords::RecordedBy).uuid().null())
                    .col(timestamp(HealthRecords::CreatedAt))
                    .check(Expr::col(HealthRecords::MortalityCount).gte(0))
                    .foreign_key(&mut batch_fk(
                        "fk_health_records_batch",
                        HealthRecords::Table,
                        HealthRecords::BatchId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sales::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sales::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Sales::SaleDate).date().not_null())
                    .col(ColumnDef::new(Sales::SaleType).string_len(16).not_null())
                    .col(ColumnDef::new(Sales::Quantity).integer().not_null())
                    .col(ColumnDef::new(Sales::UnitPrice).big_integer().not_null())
                    .col(ColumnDef::new(Sales::TotalAmount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Sales::PaymentStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Sales::PaymentMethod).string_len(16).null())
                    .col(ColumnDef::new(Sales::Notes).text().null())
                    .col(ColumnDef::new(Sales::RecordedBy).uuid().null())
                    .col(timestamp(Sales::CreatedAt))
                    .col(timestamp(Sales::UpdatedAt))
                    .check(Expr::col(Sales::Quantity).gte(1))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_customer")
                            .from(Sales::Table, Sales::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Expenses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Expenses::ExpenseDate).date().not_null())
                    .col(ColumnDef::new(Expenses::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Expenses::Description).text().not_null())
                    .col(ColumnDef::new(Expenses::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::PaymentMethod).string_len(16).null())
                    .col(ColumnDef::new(Expenses::Vendor).string_len(255).null())
                    .col(ColumnDef::new(Expenses::RecordedBy).uuid().null())
                    .col(timestamp(Expenses::CreatedAt))
                    .col(timestamp(Expenses::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Orders::OrderNumber).string_len(32).not_null().unique_key())
                    .col(ColumnDef::new(Orders::CustomerName).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::CustomerPhone).string_len(32).not_null())
                    .col(ColumnDef::new(Orders::CustomerEmail).string_len(255).null())
                    .col(ColumnDef::new(Orders::DeliveryAddress).text().null())
                    .col(ColumnDef::new(Orders::Notes).text().null())
                    .col(ColumnDef::new(Orders::TotalAmount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(16)
                            .not_null()
                            .default("new"),
                    )
                    .col(timestamp(Orders::CreatedAt))
                    .col(timestamp(Orders::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrderItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                    .col(ColumnDef::new(OrderItems::Product).string_len(64).not_null())
                    .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                    .col(ColumnDef::new(OrderItems::Unit).string_len(32).not_null())
                    .col(ColumnDef::new(OrderItems::UnitPrice).big_integer().not_null())
                    .col(ColumnDef::new(OrderItems::LineTotal).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SiteSettings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SiteSettings::Key).string_len(128).not_null().primary_key())
                    .col(ColumnDef::new(SiteSettings::Value).text().not_null())
                    .col(timestamp(SiteSettings::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        let indexes = [
            index("idx_egg_production_batch_date", EggProduction::Table)
                .col(EggProduction::BatchId)
                .col(EggProduction::RecordDate)
                .to_owned(),
            index("idx_feed_records_batch_date", FeedRecords::Table)
                .col(FeedRecords::BatchId)
                .col(FeedRecords::RecordDate)
                .to_owned(),
            index("idx_health_records_batch_date", HealthRecords::Table)
                .col(HealthRecords::BatchId)
                .col(HealthRecords::RecordDate)
                .to_owned(),
            index("idx_sales_customer", Sales::Table)
                .col(Sales::CustomerId)
                .to_owned(),
            index("idx_sales_date", Sales::Table)
                .col(Sales::SaleDate)
                .to_owned(),
            index("idx_expenses_date", Expenses::Table)
                .col(Expenses::ExpenseDate)
                .to_owned(),
            index("idx_orders_status", Orders::Table)
                .col(Orders::Status)
                .to_owned(),
            index("idx_order_items_order", OrderItems::Table)
                .col(OrderItems::OrderId)
                .to_owned(),
        ];
        for statement in indexes {
            manager.create_index(statement).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            SiteSettings::Table.into_iden(),
            OrderItems::Table.into_iden(),
            Orders::Table.into_iden(),
            Expenses::Table.into_iden(),
            Sales::Table.into_iden(),
            HealthRecords::Table.into_iden(),
            FeedRecords::Table.into_iden(),
            EggProduction::Table.into_iden(),
            PoultryBatches::Table.into_iden(),
            Customers::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn index<T: IntoIden + 'static>(name: &str, table: T) -> IndexCreateStatement {
    Index::create()
        .name(name)
        .table(table)
        .if_not_exists()
        .to_owned()
}

fn batch_fk<T, C>(name: &str, table: T, column: C) -> ForeignKeyCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(PoultryBatches::Table, PoultryBatches::Id)
        .on_delete(ForeignKeyAction::Restrict)
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Address,
    CustomerType,
    TotalPurchases,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PoultryBatches {
    Table,
    Id,
    BatchName,
    Breed,
    BirdType,
    InitialCount,
    CurrentCount,
    AcquisitionDate,
    AcquisitionCost,
    Status,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EggProduction {
    Table,
    Id,
    BatchId,
    RecordDate,
    EggsCollected,
    BrokenEggs,
    Notes,
    RecordedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FeedRecords {
    Table,
    Id,
    BatchId,
    RecordDate,
    FeedType,
    QuantityKg,
    Cost,
    Supplier,
    Notes,
    RecordedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum HealthRecords {
    Table,
    Id,
    BatchId,
    RecordDate,
    RecordType,
    Description,
    MortalityCount,
    Cost,
    AdministeredBy,
    Notes,
    RecordedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Sales {
    Table,
    Id,
    CustomerId,
    SaleDate,
    SaleType,
    Quantity,
    UnitPrice,
    TotalAmount,
    PaymentStatus,
    PaymentMethod,
    Notes,
    RecordedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    ExpenseDate,
    Category,
    Description,
    Amount,
    PaymentMethod,
    Vendor,
    RecordedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderNumber,
    CustomerName,
    CustomerPhone,
    CustomerEmail,
    DeliveryAddress,
    Notes,
    TotalAmount,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    Product,
    Quantity,
    Unit,
    UnitPrice,
    LineTotal,
}

#[derive(DeriveIden)]
enum SiteSettings {
    Table,
    Key,
    Value,
    UpdatedAt,
}
