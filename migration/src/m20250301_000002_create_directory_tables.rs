use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create departments table
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Departments::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Departments::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Departments::Description).string().null())
                    .col(ColumnDef::new(Departments::Location).string().null())
                    .col(ColumnDef::new(Departments::Budget).double().null())
                    .col(ColumnDef::new(Departments::HeadCount).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Departments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Departments::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Departments::Version).big_integer().not_null().default(0))
                    .to_owned(),
            )
            .await?;

        // Create employees table
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Employees::Name).string().not_null())
                    .col(ColumnDef::new(Employees::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Employees::EmployeeCode).string().null().unique_key())
                    .col(ColumnDef::new(Employees::Status).string().not_null().default("ACTIVE"))
                    .col(ColumnDef::new(Employees::PhoneNumber).string().null())
                    .col(ColumnDef::new(Employees::Address).string().null())
                    .col(ColumnDef::new(Employees::HireDate).date().null())
                    .col(ColumnDef::new(Employees::Salary).double().null())
                    .col(ColumnDef::new(Employees::JobTitle).string().null())
                    .col(ColumnDef::new(Employees::DepartmentId).big_integer().null())
                    .col(ColumnDef::new(Employees::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Employees::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Employees::Version).big_integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_department_id")
                            .from(Employees::Table, Employees::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes for common lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_employees_department_id")
                    .table(Employees::Table)
                    .col(Employees::DepartmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_status")
                    .table(Employees::Table)
                    .col(Employees::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_created_at")
                    .table(Employees::Table)
                    .col(Employees::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Departments {
    Table,
    Id,
    Name,
    Description,
    Location,
    Budget,
    HeadCount,
    CreatedAt,
    UpdatedAt,
    Version,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    Name,
    Email,
    EmployeeCode,
    Status,
    PhoneNumber,
    Address,
    HireDate,
    Salary,
    JobTitle,
    DepartmentId,
    CreatedAt,
    UpdatedAt,
    Version,
}
