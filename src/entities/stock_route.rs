use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An orderable container of rules. Either one of a warehouse's three
/// built-in routes (reception / delivery / crossdock), a resupply route
/// linking two warehouses (`supplied_wh_id` + `supplier_wh_id` set), or a
/// generic route such as the global "Replenish on Order" one.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_routes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub active: bool,
    pub sequence: i32,
    pub warehouse_selectable: bool,
    pub product_selectable: bool,
    pub product_categ_selectable: bool,
    pub company_id: Option<i32>,
    /// Set on resupply routes: the warehouse being resupplied.
    pub supplied_wh_id: Option<i32>,
    /// Set on resupply routes: the warehouse the goods come from.
    pub supplier_wh_id: Option<i32>,
    /// Well-known tag for system routes (see `services::refs`).
    pub reference: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_rule::Entity")]
    Rules,
    #[sea_orm(has_many = "super::route_warehouse::Entity")]
    WarehouseLinks,
}

impl Related<super::stock_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rules.def()
    }
}

impl Related<super::route_warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WarehouseLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
