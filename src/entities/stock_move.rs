use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum MoveState {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "waiting")]
    Waiting,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "done")]
    Done,
    #[sea_orm(string_value = "cancel")]
    Cancelled,
}

impl MoveState {
    /// Terminal moves no longer block archiving the operation types they reference.
    pub fn is_terminal(self) -> bool {
        matches!(self, MoveState::Done | MoveState::Cancelled)
    }
}

/// A physical stock movement. Only the fields the archive guard needs are
/// modelled here; execution of moves belongs to the downstream replenishment
/// engine.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_moves")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub reference: String,
    pub product: String,
    pub quantity: f64,
    pub picking_type_id: i32,
    pub location_src_id: i32,
    pub location_dest_id: i32,
    pub state: MoveState,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock_picking_type::Entity",
        from = "Column::PickingTypeId",
        to = "super::stock_picking_type::Column::Id"
    )]
    PickingType,
}

impl Related<super::stock_picking_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PickingType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
