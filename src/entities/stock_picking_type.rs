use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PickingCode {
    #[sea_orm(string_value = "incoming")]
    Incoming,
    #[sea_orm(string_value = "outgoing")]
    Outgoing,
    #[sea_orm(string_value = "internal")]
    Internal,
}

/// An operation type: one kind of stock movement a warehouse performs
/// (receipt, internal transfer, pick, pack, delivery). Its `active` flag
/// follows whether the step it belongs to is part of the warehouse's current
/// configuration.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_picking_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub code: PickingCode,
    pub warehouse_id: i32,
    /// UI ordering across all warehouses.
    pub sequence: i32,
    /// Numbering sequence backing this operation type's document references.
    pub sequence_id: Option<i32>,
    pub default_location_src_id: Option<i32>,
    pub default_location_dest_id: Option<i32>,
    pub return_picking_type_id: Option<i32>,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock_warehouse::Entity",
        from = "Column::WarehouseId",
        to = "super::stock_warehouse::Column::Id"
    )]
    Warehouse,
    #[sea_orm(has_many = "super::stock_move::Entity")]
    Moves,
}

impl Related<super::stock_warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl Related<super::stock_move::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Moves.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
