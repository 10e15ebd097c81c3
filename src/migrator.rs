use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_org_tables::Migration),
            Box::new(m20240101_000002_create_catalog_tables::Migration),
            Box::new(m20240101_000003_create_deployment_tables::Migration),
            Box::new(m20240101_000004_create_request_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_org_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_org_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Roles::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Roles::RoleId).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Roles::RoleName).string().not_null().unique_key())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Accounts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Accounts::AccountId).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Accounts::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Accounts::RoleId).uuid().not_null())
                        .col(
                            ColumnDef::new(Accounts::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Accounts::CreatedAt).timestamp_with_time_zone().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_accounts_role")
                                .from(Accounts::Table, Accounts::RoleId)
                                .to(Roles::Table, Roles::RoleId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Departments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Departments::DepartmentId)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Departments::DepartmentName)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Positions::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Positions::PositionId).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Positions::PositionName)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Employees::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Employees::EmployeeId).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Employees::EmployeeCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Employees::FullName).string().not_null())
                        .col(ColumnDef::new(Employees::DepartmentId).uuid().null())
                        .col(ColumnDef::new(Employees::PositionId).uuid().null())
                        .col(
                            ColumnDef::new(Employees::Status)
                                .string()
                                .not_null()
                                .default("active"),
                        )
                        .col(ColumnDef::new(Employees::DateDeployed).date().null())
                        .col(ColumnDef::new(Employees::DateLeft).date().null())
                        .col(
                            ColumnDef::new(Employees::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Employees::UpdatedAt).timestamp_with_time_zone().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_employees_department")
                                .from(Employees::Table, Employees::DepartmentId)
                                .to(Departments::Table, Departments::DepartmentId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_employees_position")
                                .from(Employees::Table, Employees::PositionId)
                                .to(Positions::Table, Positions::PositionId),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Employees::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Positions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Departments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Accounts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Roles::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum Roles {
        Table,
        RoleId,
        RoleName,
    }

    #[derive(DeriveIden)]
    enum Accounts {
        Table,
        AccountId,
        Email,
        PasswordHash,
        RoleId,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Departments {
        Table,
        DepartmentId,
        DepartmentName,
    }

    #[derive(DeriveIden)]
    enum Positions {
        Table,
        PositionId,
        PositionName,
    }

    #[derive(DeriveIden)]
    enum Employees {
        Table,
        EmployeeId,
        EmployeeCode,
        FullName,
        DepartmentId,
        PositionId,
        Status,
        DateDeployed,
        DateLeft,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Laptops::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Laptops::LaptopId).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Laptops::AssetId).string().not_null().unique_key())
                        .col(ColumnDef::new(Laptops::Brand).string().null())
                        .col(ColumnDef::new(Laptops::Model).string().null())
                        .col(ColumnDef::new(Laptops::SystemModel).string().null())
                        .col(ColumnDef::new(Laptops::SerialNumber).string().null())
                        .col(ColumnDef::new(Laptops::Cpu).string().null())
                        .col(ColumnDef::new(Laptops::Memory).string().null())
                        .col(ColumnDef::new(Laptops::Storage).string().null())
                        .col(ColumnDef::new(Laptops::StorageType).string().null())
                        .col(ColumnDef::new(Laptops::OperatingSystem).string().null())
                        .col(ColumnDef::new(Laptops::Distributor).string().null())
                        .col(ColumnDef::new(Laptops::Unit).string().null())
                        .col(ColumnDef::new(Laptops::WarrantyEnd).date().null())
                        .col(
                            ColumnDef::new(Laptops::Status)
                                .string()
                                .not_null()
                                .default("available"),
                        )
                        .col(
                            ColumnDef::new(Laptops::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Laptops::UpdatedAt).timestamp_with_time_zone().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Desktops::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Desktops::DesktopId).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Desktops::AssetId).string().not_null().unique_key())
                        .col(ColumnDef::new(Desktops::Processor).string().null())
                        .col(ColumnDef::new(Desktops::OperatingSystem).string().null())
                        .col(
                            ColumnDef::new(Desktops::Status)
                                .string()
                                .not_null()
                                .default("available"),
                        )
                        .col(
                            ColumnDef::new(Desktops::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Desktops::UpdatedAt).timestamp_with_time_zone().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DesktopMemory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DesktopMemory::MemoryId)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DesktopMemory::DesktopId).uuid().not_null())
                        .col(ColumnDef::new(DesktopMemory::SlotNumber).integer().not_null())
                        .col(ColumnDef::new(DesktopMemory::SizeGb).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_desktop_memory_desktop")
                                .from(DesktopMemory::Table, DesktopMemory::DesktopId)
                                .to(Desktops::Table, Desktops::DesktopId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DesktopStorage::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DesktopStorage::StorageId)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DesktopStorage::DesktopId).uuid().not_null())
                        .col(ColumnDef::new(DesktopStorage::StorageType).string().not_null())
                        .col(ColumnDef::new(DesktopStorage::CapacityGb).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_desktop_storage_desktop")
                                .from(DesktopStorage::Table, DesktopStorage::DesktopId)
                                .to(Desktops::Table, Desktops::DesktopId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Monitors::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Monitors::MonitorId).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Monitors::AssetId).string().not_null().unique_key())
                        .col(ColumnDef::new(Monitors::Brand).string().null())
                        .col(ColumnDef::new(Monitors::Model).string().null())
                        .col(ColumnDef::new(Monitors::ModelCode).string().null())
                        .col(ColumnDef::new(Monitors::SerialNumber).string().null())
                        .col(
                            ColumnDef::new(Monitors::Status)
                                .string()
                                .not_null()
                                .default("available"),
                        )
                        .col(
                            ColumnDef::new(Monitors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Monitors::UpdatedAt).timestamp_with_time_zone().null())
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Monitors::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(DesktopStorage::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(DesktopMemory::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Desktops::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Laptops::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum Laptops {
        Table,
        LaptopId,
        AssetId,
        Brand,
        Model,
        SystemModel,
        SerialNumber,
        Cpu,
        Memory,
        Storage,
        StorageType,
        OperatingSystem,
        Distributor,
        Unit,
        WarrantyEnd,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Desktops {
        Table,
        DesktopId,
        AssetId,
        Processor,
        OperatingSystem,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum DesktopMemory {
        Table,
        MemoryId,
        DesktopId,
        SlotNumber,
        SizeGb,
    }

    #[derive(DeriveIden)]
    enum DesktopStorage {
        Table,
        StorageId,
        DesktopId,
        StorageType,
        CapacityGb,
    }

    #[derive(DeriveIden)]
    enum Monitors {
        Table,
        MonitorId,
        AssetId,
        Brand,
        Model,
        ModelCode,
        SerialNumber,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_deployment_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_deployment_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(EmployeeDevices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(EmployeeDevices::EmployeeDeviceId)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(EmployeeDevices::EmployeeId).uuid().not_null())
                        .col(ColumnDef::new(EmployeeDevices::DeviceType).string().not_null())
                        .col(ColumnDef::new(EmployeeDevices::DeviceId).uuid().not_null())
                        .col(ColumnDef::new(EmployeeDevices::Status).string().not_null())
                        .col(ColumnDef::new(EmployeeDevices::DateIssued).date().not_null())
                        .col(ColumnDef::new(EmployeeDevices::DateReturned).date().null())
                        .col(
                            ColumnDef::new(EmployeeDevices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(EmployeeDevices::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_employee_devices_employee")
                                .from(EmployeeDevices::Table, EmployeeDevices::EmployeeId)
                                .to(Employees::Table, Employees::EmployeeId),
                        )
                        .to_owned(),
                )
                .await?;

            // At most one in_use assignment per device. Partial unique indexes
            // are not expressible through the schema builder, so raw SQL; the
            // statement is valid on both Postgres and SQLite.
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_employee_devices_active_device \
                     ON employee_devices (device_type, device_id) WHERE status = 'in_use'",
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(EmployeeMonitors::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(EmployeeMonitors::EmployeeMonitorId)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(EmployeeMonitors::EmployeeDeviceId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(EmployeeMonitors::MonitorId).uuid().not_null())
                        .col(
                            ColumnDef::new(EmployeeMonitors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_employee_monitors_assignment")
                                .from(EmployeeMonitors::Table, EmployeeMonitors::EmployeeDeviceId)
                                .to(EmployeeDevices::Table, EmployeeDevices::EmployeeDeviceId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_employee_monitors_monitor")
                                .from(EmployeeMonitors::Table, EmployeeMonitors::MonitorId)
                                .to(Monitors::Table, Monitors::MonitorId),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(EmployeeMonitors::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(EmployeeDevices::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum EmployeeDevices {
        Table,
        EmployeeDeviceId,
        EmployeeId,
        DeviceType,
        DeviceId,
        Status,
        DateIssued,
        DateReturned,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum EmployeeMonitors {
        Table,
        EmployeeMonitorId,
        EmployeeDeviceId,
        MonitorId,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Employees {
        Table,
        EmployeeId,
    }

    #[derive(DeriveIden)]
    enum Monitors {
        Table,
        MonitorId,
    }
}

mod m20240101_000004_create_request_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_request_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ServiceRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceRequests::RequestId)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ServiceRequests::EmployeeId).uuid().not_null())
                        .col(ColumnDef::new(ServiceRequests::DeviceType).string().null())
                        .col(ColumnDef::new(ServiceRequests::DeviceId).uuid().null())
                        .col(ColumnDef::new(ServiceRequests::RequestType).string().not_null())
                        .col(ColumnDef::new(ServiceRequests::Reason).text().null())
                        .col(
                            ColumnDef::new(ServiceRequests::Status)
                                .string()
                                .not_null()
                                .default("pending"),
                        )
                        .col(
                            ColumnDef::new(ServiceRequests::DateSubmitted)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceRequests::DateCompleted)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ServiceRequests::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceRequests::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_service_requests_employee")
                                .from(ServiceRequests::Table, ServiceRequests::EmployeeId)
                                .to(Employees::Table, Employees::EmployeeId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Bookings::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Bookings::BookingId).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Bookings::RequestId).uuid().not_null())
                        .col(ColumnDef::new(Bookings::BookingDate).date().not_null())
                        .col(ColumnDef::new(Bookings::BookingTime).string().not_null())
                        .col(ColumnDef::new(Bookings::Method).string().not_null())
                        .col(ColumnDef::new(Bookings::CourierName).string().null())
                        .col(
                            ColumnDef::new(Bookings::Status)
                                .string()
                                .not_null()
                                .default("scheduled"),
                        )
                        .col(
                            ColumnDef::new(Bookings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_bookings_request")
                                .from(Bookings::Table, Bookings::RequestId)
                                .to(ServiceRequests::Table, ServiceRequests::RequestId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Bookings::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ServiceRequests::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum ServiceRequests {
        Table,
        RequestId,
        EmployeeId,
        DeviceType,
        DeviceId,
        RequestType,
        Reason,
        Status,
        DateSubmitted,
        DateCompleted,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Bookings {
        Table,
        BookingId,
        RequestId,
        BookingDate,
        BookingTime,
        Method,
        CourierName,
        Status,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Employees {
        Table,
        EmployeeId,
    }
}
