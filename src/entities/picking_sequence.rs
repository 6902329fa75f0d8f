use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Numbering sequence for an operation type's documents, e.g. prefix
/// `WH/IN/` with padding 5 yields `WH/IN/00042`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "picking_sequences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub prefix: String,
    pub padding: i32,
    pub next_number: i32,
    pub company_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
