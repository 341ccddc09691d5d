use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create companies table
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Siren)
                            .string_len(9)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::Name).string().not_null())
                    .col(ColumnDef::new(Companies::ActivityStartedOn).date())
                    .col(
                        ColumnDef::new(Companies::Representatives)
                            .json()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Companies::LegalForm).string())
                    .col(
                        ColumnDef::new(Companies::EstablishmentCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Companies::PostalCode).string())
                    .col(ColumnDef::new(Companies::City).string())
                    .col(ColumnDef::new(Companies::Street).string())
                    .col(ColumnDef::new(Companies::Status).string().not_null())
                    .col(
                        ColumnDef::new(Companies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes
        manager
            .create_index(
                Index::create()
                    .name("idx_companies_postal_code")
                    .table(Companies::Table)
                    .col(Companies::PostalCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Siren,
    Name,
    ActivityStartedOn,
    Representatives,
    LegalForm,
    EstablishmentCount,
    PostalCode,
    City,
    Street,
    Status,
    UpdatedAt,
}
