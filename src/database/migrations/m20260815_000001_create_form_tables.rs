use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create salesforce_forms table
        manager
            .create_table(
                Table::create()
                    .table(SalesforceForms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalesforceForms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SalesforceForms::FormKey)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesforceForms::FormName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesforceForms::EndpointUrl)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SalesforceForms::Oid).string().not_null())
                    .col(ColumnDef::new(SalesforceForms::RetUrl).string())
                    .col(
                        ColumnDef::new(SalesforceForms::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SalesforceForms::Locale)
                            .string()
                            .not_null()
                            .default("en"),
                    )
                    .col(
                        ColumnDef::new(SalesforceForms::FieldConfigs)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesforceForms::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesforceForms::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Form names are unique within a locale. The service-level check gives
        // the friendly 400; this index closes the read-then-write race.
        manager
            .create_index(
                Index::create()
                    .name("idx_salesforce_forms_form_name_locale")
                    .table(SalesforceForms::Table)
                    .col(SalesforceForms::FormName)
                    .col(SalesforceForms::Locale)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create form_submissions table
        manager
            .create_table(
                Table::create()
                    .table(FormSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormSubmissions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FormSubmissions::FormId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FormSubmissions::Code).string().not_null())
                    .col(
                        ColumnDef::new(FormSubmissions::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FormSubmissions::SalesforceResponse).json_binary())
                    .col(
                        ColumnDef::new(FormSubmissions::SalesforceStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(FormSubmissions::ErrorMessage).string())
                    .col(
                        ColumnDef::new(FormSubmissions::Locale)
                            .string()
                            .not_null()
                            .default("en"),
                    )
                    .col(
                        ColumnDef::new(FormSubmissions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormSubmissions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_submissions_form_id")
                            .from(FormSubmissions::Table, FormSubmissions::FormId)
                            .to(SalesforceForms::Table, SalesforceForms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_form_submissions_code")
                    .table(FormSubmissions::Table)
                    .col(FormSubmissions::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FormSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SalesforceForms::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum SalesforceForms {
    Table,
    Id,
    FormKey,
    FormName,
    EndpointUrl,
    Oid,
    RetUrl,
    Active,
    Locale,
    FieldConfigs,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum FormSubmissions {
    Table,
    Id,
    FormId,
    Code,
    Payload,
    SalesforceResponse,
    SalesforceStatus,
    ErrorMessage,
    Locale,
    CreatedAt,
    UpdatedAt,
}
