use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_companies_table::Migration),
            Box::new(m20240101_000002_create_stock_locations_table::Migration),
            Box::new(m20240101_000003_create_stock_warehouses_table::Migration),
            Box::new(m20240101_000004_create_picking_sequences_table::Migration),
            Box::new(m20240101_000005_create_stock_picking_types_table::Migration),
            Box::new(m20240101_000006_create_stock_routes_table::Migration),
            Box::new(m20240101_000007_create_route_warehouses_table::Migration),
            Box::new(m20240101_000008_create_stock_rules_table::Migration),
            Box::new(m20240101_000009_create_stock_moves_table::Migration),
            Box::new(m20240101_000010_create_warehouse_resupply_table::Migration),
            Box::new(m20240101_000011_seed_reference_records::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_companies_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_companies_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Companies::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Companies::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Companies::Name).string().not_null())
                        .col(
                            ColumnDef::new(Companies::InternalTransitLocationId)
                                .integer()
                                .null(),
                        )
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
        Id,
        Name,
        InternalTransitLocationId,
    }
}

mod m20240101_000002_create_stock_locations_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_stock_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockLocations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockLocations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(StockLocations::Name).string().not_null())
                        .col(ColumnDef::new(StockLocations::ParentId).integer().null())
                        .col(ColumnDef::new(StockLocations::Usage).string().not_null())
                        .col(ColumnDef::new(StockLocations::CompanyId).integer().null())
                        .col(ColumnDef::new(StockLocations::Barcode).string().null())
                        .col(
                            ColumnDef::new(StockLocations::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(StockLocations::Reference).string().null())
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_locations_parent")
                        .table(StockLocations::Table)
                        .col(StockLocations::ParentId)
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_locations_reference")
                        .table(StockLocations::Table)
                        .col(StockLocations::Reference)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockLocations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockLocations {
        Table,
        Id,
        Name,
        ParentId,
        Usage,
        CompanyId,
        Barcode,
        Active,
        Reference,
    }
}

mod m20240101_000003_create_stock_warehouses_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_stock_warehouses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockWarehouses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockWarehouses::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(StockWarehouses::Name).string().not_null())
                        .col(ColumnDef::new(StockWarehouses::Code).string().not_null())
                        .col(
                            ColumnDef::new(StockWarehouses::CompanyId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockWarehouses::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(StockWarehouses::ReceptionSteps)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockWarehouses::DeliverySteps)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockWarehouses::ViewLocationId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockWarehouses::LotStockLocationId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockWarehouses::InputLocationId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(StockWarehouses::QcLocationId).integer().null())
                        .col(
                            ColumnDef::new(StockWarehouses::OutputLocationId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockWarehouses::PackLocationId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(StockWarehouses::InTypeId).integer().null())
                        .col(ColumnDef::new(StockWarehouses::IntTypeId).integer().null())
                        .col(ColumnDef::new(StockWarehouses::PickTypeId).integer().null())
                        .col(ColumnDef::new(StockWarehouses::PackTypeId).integer().null())
                        .col(ColumnDef::new(StockWarehouses::OutTypeId).integer().null())
                        .col(
                            ColumnDef::new(StockWarehouses::ReceptionRouteId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockWarehouses::DeliveryRouteId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockWarehouses::CrossdockRouteId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(StockWarehouses::MtoRuleId).integer().null())
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_warehouses_company_name")
                        .table(StockWarehouses::Table)
                        .col(StockWarehouses::CompanyId)
                        .col(StockWarehouses::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_warehouses_company_code")
                        .table(StockWarehouses::Table)
                        .col(StockWarehouses::CompanyId)
                        .col(StockWarehouses::Code)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockWarehouses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockWarehouses {
        Table,
        Id,
        Name,
        Code,
        CompanyId,
        Active,
        ReceptionSteps,
        DeliverySteps,
        ViewLocationId,
        LotStockLocationId,
        InputLocationId,
        QcLocationId,
        OutputLocationId,
        PackLocationId,
        InTypeId,
        IntTypeId,
        PickTypeId,
        PackTypeId,
        OutTypeId,
        ReceptionRouteId,
        DeliveryRouteId,
        CrossdockRouteId,
        MtoRuleId,
    }
}

mod m20240101_000004_create_picking_sequences_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_picking_sequences_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PickingSequences::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PickingSequences::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PickingSequences::Name).string().not_null())
                        .col(ColumnDef::new(PickingSequences::Prefix).string().not_null())
                        .col(
                            ColumnDef::new(PickingSequences::Padding)
                                .integer()
                                .not_null()
                                .default(5),
                        )
                        .col(
                            ColumnDef::new(PickingSequences::NextNumber)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(PickingSequences::CompanyId).integer().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PickingSequences::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PickingSequences {
        Table,
        Id,
        Name,
        Prefix,
        Padding,
        NextNumber,
        CompanyId,
    }
}

mod m20240101_000005_create_stock_picking_types_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_stock_picking_types_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockPickingTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockPickingTypes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(StockPickingTypes::Name).string().not_null())
                        .col(ColumnDef::new(StockPickingTypes::Code).string().not_null())
                        .col(
                            ColumnDef::new(StockPickingTypes::WarehouseId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockPickingTypes::Sequence)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockPickingTypes::SequenceId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockPickingTypes::DefaultLocationSrcId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockPickingTypes::DefaultLocationDestId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockPickingTypes::ReturnPickingTypeId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockPickingTypes::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_picking_types_warehouse")
                        .table(StockPickingTypes::Table)
                        .col(StockPickingTypes::WarehouseId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockPickingTypes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockPickingTypes {
        Table,
        Id,
        Name,
        Code,
        WarehouseId,
        Sequence,
        SequenceId,
        DefaultLocationSrcId,
        DefaultLocationDestId,
        ReturnPickingTypeId,
        Active,
    }
}

mod m20240101_000006_create_stock_routes_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_stock_routes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockRoutes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockRoutes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(StockRoutes::Name).string().not_null())
                        .col(
                            ColumnDef::new(StockRoutes::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(StockRoutes::Sequence)
                                .integer()
                                .not_null()
                                .default(10),
                        )
                        .col(
                            ColumnDef::new(StockRoutes::WarehouseSelectable)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(StockRoutes::ProductSelectable)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(StockRoutes::ProductCategSelectable)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(StockRoutes::CompanyId).integer().null())
                        .col(ColumnDef::new(StockRoutes::SuppliedWhId).integer().null())
                        .col(ColumnDef::new(StockRoutes::SupplierWhId).integer().null())
                        .col(ColumnDef::new(StockRoutes::Reference).string().null())
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_routes_resupply_pair")
                        .table(StockRoutes::Table)
                        .col(StockRoutes::SuppliedWhId)
                        .col(StockRoutes::SupplierWhId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockRoutes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockRoutes {
        Table,
        Id,
        Name,
        Active,
        Sequence,
        WarehouseSelectable,
        ProductSelectable,
        ProductCategSelectable,
        CompanyId,
        SuppliedWhId,
        SupplierWhId,
        Reference,
    }
}

mod m20240101_000007_create_route_warehouses_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_route_warehouses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RouteWarehouses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RouteWarehouses::RouteId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RouteWarehouses::WarehouseId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(RouteWarehouses::RouteId)
                                .col(RouteWarehouses::WarehouseId),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RouteWarehouses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum RouteWarehouses {
        Table,
        RouteId,
        WarehouseId,
    }
}

mod m20240101_000008_create_stock_rules_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_stock_rules_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockRules::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockRules::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(StockRules::Name).string().not_null())
                        .col(
                            ColumnDef::new(StockRules::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(StockRules::Action).string().not_null())
                        .col(
                            ColumnDef::new(StockRules::ProcureMethod)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockRules::RouteId).integer().not_null())
                        .col(
                            ColumnDef::new(StockRules::LocationSrcId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockRules::LocationDestId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockRules::PickingTypeId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockRules::WarehouseId).integer().null())
                        .col(ColumnDef::new(StockRules::CompanyId).integer().null())
                        .col(
                            ColumnDef::new(StockRules::PropagateCancel)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(StockRules::PropagateCarrier)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(StockRules::PropagateWarehouseId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(StockRules::Auto).string().not_null())
                        .col(
                            ColumnDef::new(StockRules::Sequence)
                                .integer()
                                .not_null()
                                .default(10),
                        )
                        .to_owned(),
                )
                .await?;
            // Natural matching key for the archive-reuse lookup.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_rules_matching_key")
                        .table(StockRules::Table)
                        .col(StockRules::RouteId)
                        .col(StockRules::PickingTypeId)
                        .col(StockRules::LocationSrcId)
                        .col(StockRules::LocationDestId)
                        .col(StockRules::Action)
                        .unique()
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_rules_warehouse")
                        .table(StockRules::Table)
                        .col(StockRules::WarehouseId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockRules::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockRules {
        Table,
        Id,
        Name,
        Active,
        Action,
        ProcureMethod,
        RouteId,
        LocationSrcId,
        LocationDestId,
        PickingTypeId,
        WarehouseId,
        CompanyId,
        PropagateCancel,
        PropagateCarrier,
        PropagateWarehouseId,
        Auto,
        Sequence,
    }
}

mod m20240101_000009_create_stock_moves_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000009_create_stock_moves_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockMoves::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockMoves::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(StockMoves::Reference).string().not_null())
                        .col(ColumnDef::new(StockMoves::Product).string().not_null())
                        .col(
                            ColumnDef::new(StockMoves::Quantity)
                                .double()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(StockMoves::PickingTypeId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMoves::LocationSrcId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMoves::LocationDestId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMoves::State).string().not_null())
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_moves_picking_type")
                        .table(StockMoves::Table)
                        .col(StockMoves::PickingTypeId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockMoves::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockMoves {
        Table,
        Id,
        Reference,
        Product,
        Quantity,
        PickingTypeId,
        LocationSrcId,
        LocationDestId,
        State,
    }
}

mod m20240101_000010_create_warehouse_resupply_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000010_create_warehouse_resupply_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(WarehouseResupply::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WarehouseResupply::SuppliedWhId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WarehouseResupply::SupplierWhId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(WarehouseResupply::SuppliedWhId)
                                .col(WarehouseResupply::SupplierWhId),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WarehouseResupply::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum WarehouseResupply {
        Table,
        SuppliedWhId,
        SupplierWhId,
    }
}

mod m20240101_000011_seed_reference_records {
    use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
    use sea_orm_migration::prelude::*;

    use crate::entities::stock_location::LocationUsage;
    use crate::entities::{company, stock_location, stock_route};
    use crate::services::refs;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000011_seed_reference_records"
        }
    }

    /// Seeds the process-wide singleton records: the location roots, the
    /// customer/supplier pseudo-locations, the shared inter-company transit
    /// location (inactive until first use), the global "Replenish on Order"
    /// route, and a default company with its own transit location.
    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let conn = manager.get_connection();

            let root = stock_location::ActiveModel {
                name: Set("Physical Locations".to_string()),
                parent_id: Set(None),
                usage: Set(LocationUsage::View),
                company_id: Set(None),
                barcode: Set(None),
                active: Set(true),
                reference: Set(Some(refs::LOCATION_ROOT.to_string())),
                ..Default::default()
            }
            .insert(conn)
            .await?;

            let partners = stock_location::ActiveModel {
                name: Set("Partner Locations".to_string()),
                parent_id: Set(None),
                usage: Set(LocationUsage::View),
                company_id: Set(None),
                barcode: Set(None),
                active: Set(true),
                reference: Set(Some(refs::PARTNER_LOCATIONS.to_string())),
                ..Default::default()
            }
            .insert(conn)
            .await?;

            stock_location::ActiveModel {
                name: Set("Customers".to_string()),
                parent_id: Set(Some(partners.id)),
                usage: Set(LocationUsage::Customer),
                company_id: Set(None),
                barcode: Set(None),
                active: Set(true),
                reference: Set(Some(refs::CUSTOMER_LOCATION.to_string())),
                ..Default::default()
            }
            .insert(conn)
            .await?;

            stock_location::ActiveModel {
                name: Set("Suppliers".to_string()),
                parent_id: Set(Some(partners.id)),
                usage: Set(LocationUsage::Supplier),
                company_id: Set(None),
                barcode: Set(None),
                active: Set(true),
                reference: Set(Some(refs::SUPPLIER_LOCATION.to_string())),
                ..Default::default()
            }
            .insert(conn)
            .await?;

            stock_location::ActiveModel {
                name: Set("Inter-warehouse transit".to_string()),
                parent_id: Set(Some(root.id)),
                usage: Set(LocationUsage::Transit),
                company_id: Set(None),
                barcode: Set(None),
                active: Set(false),
                reference: Set(Some(refs::INTER_COMPANY_TRANSIT.to_string())),
                ..Default::default()
            }
            .insert(conn)
            .await?;

            stock_route::ActiveModel {
                name: Set(refs::MTO_ROUTE_NAME.to_string()),
                active: Set(true),
                sequence: Set(5),
                warehouse_selectable: Set(false),
                product_selectable: Set(true),
                product_categ_selectable: Set(true),
                company_id: Set(None),
                supplied_wh_id: Set(None),
                supplier_wh_id: Set(None),
                reference: Set(Some(refs::MTO_ROUTE.to_string())),
                ..Default::default()
            }
            .insert(conn)
            .await?;

            let default_company = company::ActiveModel {
                name: Set("My Company".to_string()),
                internal_transit_location_id: Set(None),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            let transit = stock_location::ActiveModel {
                name: Set("My Company: Transit Location".to_string()),
                parent_id: Set(Some(partners.id)),
                usage: Set(LocationUsage::Transit),
                company_id: Set(Some(default_company.id)),
                barcode: Set(None),
                active: Set(false),
                reference: Set(None),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            let mut am: company::ActiveModel = default_company.into();
            am.internal_transit_location_id = Set(Some(transit.id));
            am.update(conn).await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let conn = manager.get_connection();
            stock_route::Entity::delete_many()
                .filter(stock_route::Column::Reference.eq(refs::MTO_ROUTE))
                .exec(conn)
                .await?;
            stock_location::Entity::delete_many()
                .filter(stock_location::Column::Reference.is_not_null())
                .exec(conn)
                .await?;
            company::Entity::delete_many()
                .filter(company::Column::Name.eq("My Company"))
                .exec(conn)
                .await?;
            Ok(())
        }
    }
}
