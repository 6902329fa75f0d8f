use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a location is for. `View` locations are purely organizational
/// parents; `Transit` locations buffer inter-warehouse moves; `Customer` and
/// `Supplier` are the process-wide pseudo-locations at the boundary of the
/// routing graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum LocationUsage {
    #[sea_orm(string_value = "view")]
    View,
    #[sea_orm(string_value = "internal")]
    Internal,
    #[sea_orm(string_value = "transit")]
    Transit,
    #[sea_orm(string_value = "customer")]
    Customer,
    #[sea_orm(string_value = "supplier")]
    Supplier,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub usage: LocationUsage,
    /// None for shared/global locations (customer, supplier, inter-company transit).
    pub company_id: Option<i32>,
    pub barcode: Option<String>,
    pub active: bool,
    /// Well-known tag for process-wide singletons (see `services::refs`).
    pub reference: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
