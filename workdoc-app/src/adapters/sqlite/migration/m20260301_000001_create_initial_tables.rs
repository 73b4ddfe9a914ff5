use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // companies 表，slug 全局唯一
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Company::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Company::Name).string().not_null())
                    .col(ColumnDef::new(Company::Slug).string().null().unique_key())
                    .col(ColumnDef::new(Company::RequestedSlug).string().null())
                    .col(
                        ColumnDef::new(Company::ProvisioningStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Company::ProvisioningError).string().null())
                    .col(ColumnDef::new(Company::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Company::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // subdomain_candidates 表（候选池）
        manager
            .create_table(
                Table::create()
                    .table(SubdomainCandidate::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubdomainCandidate::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubdomainCandidate::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SubdomainCandidate::CompanyId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SubdomainCandidate::CreatedAt)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubdomainCandidate::AssignedAt)
                            .string()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // generated_documents 表
        manager
            .create_table(
                Table::create()
                    .table(GeneratedDocument::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeneratedDocument::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GeneratedDocument::CompanyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedDocument::DocumentType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GeneratedDocument::Title).string().not_null())
                    .col(ColumnDef::new(GeneratedDocument::Content).text().not_null())
                    .col(
                        ColumnDef::new(GeneratedDocument::ContentHash)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GeneratedDocument::Model).string().not_null())
                    .col(
                        ColumnDef::new(GeneratedDocument::CreatedAt)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_generated_documents_company_id")
                    .table(GeneratedDocument::Table)
                    .col(GeneratedDocument::CompanyId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GeneratedDocument::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubdomainCandidate::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Company::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Company {
    #[sea_orm(iden = "companies")]
    Table,
    Id,
    Name,
    Slug,
    RequestedSlug,
    ProvisioningStatus,
    ProvisioningError,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SubdomainCandidate {
    #[sea_orm(iden = "subdomain_candidates")]
    Table,
    Id,
    Name,
    CompanyId,
    CreatedAt,
    AssignedAt,
}

#[derive(DeriveIden)]
enum GeneratedDocument {
    #[sea_orm(iden = "generated_documents")]
    Table,
    Id,
    CompanyId,
    DocumentType,
    Title,
    Content,
    ContentHash,
    Model,
    CreatedAt,
}
