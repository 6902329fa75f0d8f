use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join table: which warehouses offer a warehouse-selectable route.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "route_warehouses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub route_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub warehouse_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock_route::Entity",
        from = "Column::RouteId",
        to = "super::stock_route::Column::Id"
    )]
    Route,
    #[sea_orm(
        belongs_to = "super::stock_warehouse::Entity",
        from = "Column::WarehouseId",
        to = "super::stock_warehouse::Column::Id"
    )]
    Warehouse,
}

impl Related<super::stock_route::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Route.def()
    }
}

impl Related<super::stock_warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
