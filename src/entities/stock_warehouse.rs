use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How many hops an incoming shipment makes before reaching stock.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ReceptionSteps {
    /// supplier -> stock
    #[sea_orm(string_value = "one_step")]
    OneStep,
    /// supplier -> input -> stock
    #[sea_orm(string_value = "two_steps")]
    TwoSteps,
    /// supplier -> input -> quality control -> stock
    #[sea_orm(string_value = "three_steps")]
    ThreeSteps,
}

/// How many hops an outgoing shipment makes between stock and the customer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum DeliverySteps {
    /// stock -> customer
    #[sea_orm(string_value = "ship_only")]
    ShipOnly,
    /// stock -> output -> customer
    #[sea_orm(string_value = "pick_ship")]
    PickShip,
    /// stock -> packing -> output -> customer
    #[sea_orm(string_value = "pick_pack_ship")]
    PickPackShip,
}

/// A warehouse and the derived records the routing engine keeps in sync for
/// it. The five sub-locations and five operation types are created once, at
/// warehouse creation, sized for the maximum configuration; reconfiguration
/// only toggles their `active` flags. Routes and rules are created lazily and
/// archived, never deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_warehouses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Short code, at most 5 characters, unique per company.
    pub code: String,
    pub company_id: i32,
    pub active: bool,
    pub reception_steps: ReceptionSteps,
    pub delivery_steps: DeliverySteps,
    pub view_location_id: Option<i32>,
    pub lot_stock_location_id: Option<i32>,
    pub input_location_id: Option<i32>,
    pub qc_location_id: Option<i32>,
    pub output_location_id: Option<i32>,
    pub pack_location_id: Option<i32>,
    pub in_type_id: Option<i32>,
    pub int_type_id: Option<i32>,
    pub pick_type_id: Option<i32>,
    pub pack_type_id: Option<i32>,
    pub out_type_id: Option<i32>,
    pub reception_route_id: Option<i32>,
    pub delivery_route_id: Option<i32>,
    pub crossdock_route_id: Option<i32>,
    /// The warehouse's rule on the global "Replenish on Order" route, when
    /// that route exists.
    pub mto_rule_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    #[sea_orm(has_many = "super::stock_picking_type::Entity")]
    PickingTypes,
    #[sea_orm(has_many = "super::stock_rule::Entity")]
    Rules,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::stock_picking_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PickingTypes.def()
    }
}

impl Related<super::stock_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
