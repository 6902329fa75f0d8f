use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join table recording the configured resupply sources of a warehouse.
/// The routes derived from this set live in `stock_routes` with
/// `supplied_wh_id` / `supplier_wh_id` set; this table is the configuration
/// the reconfiguration coordinator diffs against.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warehouse_resupply")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub supplied_wh_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub supplier_wh_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
