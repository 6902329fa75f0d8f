use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    #[sea_orm(string_value = "pull")]
    Pull,
    #[sea_orm(string_value = "push")]
    Push,
    #[sea_orm(string_value = "pull_push")]
    PullPush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ProcureMethod {
    /// Take from the source location without propagating a need upstream.
    #[sea_orm(string_value = "make_to_stock")]
    MakeToStock,
    /// Propagate the need to the source location's own rules.
    #[sea_orm(string_value = "make_to_order")]
    MakeToOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum RuleAuto {
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "transparent")]
    Transparent,
}

/// A directed edge of the routing graph: move goods from `location_src_id`
/// to `location_dest_id` through `picking_type_id`. Rules made irrelevant by
/// a reconfiguration are archived, never deleted, so historical stock moves
/// keep valid references and a reverted configuration reactivates the same
/// rows. At most one row exists per (route, picking type, src, dest, action).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub active: bool,
    pub action: RuleAction,
    pub procure_method: ProcureMethod,
    pub route_id: i32,
    pub location_src_id: i32,
    pub location_dest_id: i32,
    pub picking_type_id: i32,
    pub warehouse_id: Option<i32>,
    pub company_id: Option<i32>,
    /// Cancelling the move created by this rule cancels the next one too.
    pub propagate_cancel: bool,
    pub propagate_carrier: bool,
    /// Resupply back-pointer: which warehouse fulfils demand through this rule.
    pub propagate_warehouse_id: Option<i32>,
    pub auto: RuleAuto,
    pub sequence: i32,
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
