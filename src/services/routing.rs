//! Topology table and route/rule synthesizer.
//!
//! `WarehouseTopology` loads one warehouse's locations and operation types
//! and answers, for a routing key, the ordered chain of edges a good must
//! travel. `sync_builtin_routes` materializes those chains into the
//! warehouse's three built-in routes, reusing archived rule rows whenever the
//! matching tuple (route, operation type, source, destination, action)
//! already exists, so that a reverted configuration reactivates the exact
//! rows it deactivated earlier.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use tracing::warn;

use crate::entities::stock_rule::{ProcureMethod, RuleAction, RuleAuto};
use crate::entities::stock_warehouse::{DeliverySteps, ReceptionSteps};
use crate::entities::{
    route_warehouse, stock_location, stock_picking_type, stock_route, stock_rule, stock_warehouse,
};
use crate::errors::ServiceError;
use crate::services::refs;

/// Which chain of a warehouse is being synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingKey {
    Reception(ReceptionSteps),
    Delivery(DeliverySteps),
    Crossdock,
}

/// One edge to materialize into a rule.
#[derive(Debug, Clone, Copy)]
pub struct RoutingStep<'a> {
    pub from: &'a stock_location::Model,
    pub dest: &'a stock_location::Model,
    pub picking_type: &'a stock_picking_type::Model,
    pub action: RuleAction,
}

/// A warehouse's locations and operation types, loaded fresh for one
/// synthesis pass. The topology closes over record identities, so it must
/// not be cached across reconfigurations.
pub struct WarehouseTopology {
    pub warehouse: stock_warehouse::Model,
    pub lot_stock: stock_location::Model,
    pub input: stock_location::Model,
    pub qc: stock_location::Model,
    pub output: stock_location::Model,
    pub pack: stock_location::Model,
    pub customer: stock_location::Model,
    pub supplier: stock_location::Model,
    pub in_type: stock_picking_type::Model,
    pub int_type: stock_picking_type::Model,
    pub pick_type: stock_picking_type::Model,
    pub pack_type: stock_picking_type::Model,
    pub out_type: stock_picking_type::Model,
}

async fn require_location<C: ConnectionTrait>(
    conn: &C,
    id: Option<i32>,
    what: &str,
) -> Result<stock_location::Model, ServiceError> {
    let id = id.ok_or_else(|| {
        ServiceError::InternalError(format!("warehouse is missing its {} location", what))
    })?;
    stock_location::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::InternalError(format!("dangling {} location reference {}", what, id))
        })
}

async fn require_picking_type<C: ConnectionTrait>(
    conn: &C,
    id: Option<i32>,
    what: &str,
) -> Result<stock_picking_type::Model, ServiceError> {
    let id = id.ok_or_else(|| {
        ServiceError::InternalError(format!("warehouse is missing its {} operation type", what))
    })?;
    stock_picking_type::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::InternalError(format!("dangling {} operation type reference {}", what, id))
        })
}

impl WarehouseTopology {
    pub async fn load<C: ConnectionTrait>(
        conn: &C,
        warehouse: stock_warehouse::Model,
    ) -> Result<Self, ServiceError> {
        let (customer, supplier) = refs::partner_locations(conn).await?;
        let lot_stock = require_location(conn, warehouse.lot_stock_location_id, "stock").await?;
        let input = require_location(conn, warehouse.input_location_id, "input").await?;
        let qc = require_location(conn, warehouse.qc_location_id, "quality control").await?;
        let output = require_location(conn, warehouse.output_location_id, "output").await?;
        let pack = require_location(conn, warehouse.pack_location_id, "packing").await?;
        let in_type = require_picking_type(conn, warehouse.in_type_id, "incoming").await?;
        let int_type = require_picking_type(conn, warehouse.int_type_id, "internal").await?;
        let pick_type = require_picking_type(conn, warehouse.pick_type_id, "pick").await?;
        let pack_type = require_picking_type(conn, warehouse.pack_type_id, "pack").await?;
        let out_type = require_picking_type(conn, warehouse.out_type_id, "outgoing").await?;
        Ok(Self {
            warehouse,
            lot_stock,
            input,
            qc,
            output,
            pack,
            customer,
            supplier,
            in_type,
            int_type,
            pick_type,
            pack_type,
            out_type,
        })
    }

    /// Where goods enter the warehouse: the dedicated input location, or the
    /// stock location itself for single-step reception.
    pub fn input_location(&self) -> &stock_location::Model {
        match self.warehouse.reception_steps {
            ReceptionSteps::OneStep => &self.lot_stock,
            _ => &self.input,
        }
    }

    /// Where goods leave the warehouse: the dedicated output location, or the
    /// stock location itself for single-step delivery.
    pub fn output_location(&self) -> &stock_location::Model {
        match self.warehouse.delivery_steps {
            DeliverySteps::ShipOnly => &self.lot_stock,
            _ => &self.output,
        }
    }

    /// The ordered chain of edges for a routing key. Pure; recomputed fresh
    /// for every synthesis pass.
    pub fn routing_for(&self, key: RoutingKey) -> Vec<RoutingStep<'_>> {
        let step = |from, dest, picking_type, action| RoutingStep {
            from,
            dest,
            picking_type,
            action,
        };
        match key {
            RoutingKey::Reception(ReceptionSteps::OneStep) => vec![step(
                &self.supplier,
                &self.lot_stock,
                &self.in_type,
                RuleAction::Pull,
            )],
            RoutingKey::Reception(ReceptionSteps::TwoSteps) => vec![
                step(&self.supplier, &self.input, &self.in_type, RuleAction::Pull),
                step(
                    &self.input,
                    &self.lot_stock,
                    &self.int_type,
                    RuleAction::PullPush,
                ),
            ],
            RoutingKey::Reception(ReceptionSteps::ThreeSteps) => vec![
                step(&self.supplier, &self.input, &self.in_type, RuleAction::Pull),
                step(&self.input, &self.qc, &self.int_type, RuleAction::PullPush),
                step(
                    &self.qc,
                    &self.lot_stock,
                    &self.int_type,
                    RuleAction::PullPush,
                ),
            ],
            RoutingKey::Delivery(DeliverySteps::ShipOnly) => vec![step(
                &self.lot_stock,
                &self.customer,
                &self.out_type,
                RuleAction::Pull,
            )],
            RoutingKey::Delivery(DeliverySteps::PickShip) => vec![
                step(
                    &self.lot_stock,
                    &self.output,
                    &self.pick_type,
                    RuleAction::Pull,
                ),
                step(
                    &self.output,
                    &self.customer,
                    &self.out_type,
                    RuleAction::Pull,
                ),
            ],
            RoutingKey::Delivery(DeliverySteps::PickPackShip) => vec![
                step(
                    &self.lot_stock,
                    &self.pack,
                    &self.pick_type,
                    RuleAction::Pull,
                ),
                step(&self.pack, &self.output, &self.pack_type, RuleAction::Pull),
                step(
                    &self.output,
                    &self.customer,
                    &self.out_type,
                    RuleAction::Pull,
                ),
            ],
            RoutingKey::Crossdock => vec![
                step(&self.input, &self.output, &self.int_type, RuleAction::Pull),
                step(
                    &self.output,
                    &self.customer,
                    &self.out_type,
                    RuleAction::Pull,
                ),
            ],
        }
    }
}

/// Display name of a built-in route for a step configuration.
pub fn route_type_name(key: RoutingKey) -> &'static str {
    match key {
        RoutingKey::Reception(ReceptionSteps::OneStep) => "Receive in 1 step (stock)",
        RoutingKey::Reception(ReceptionSteps::TwoSteps) => "Receive in 2 steps (input + stock)",
        RoutingKey::Reception(ReceptionSteps::ThreeSteps) => {
            "Receive in 3 steps (input + quality + stock)"
        }
        RoutingKey::Delivery(DeliverySteps::ShipOnly) => "Deliver in 1 step (ship)",
        RoutingKey::Delivery(DeliverySteps::PickShip) => "Deliver in 2 steps (pick + ship)",
        RoutingKey::Delivery(DeliverySteps::PickPackShip) => {
            "Deliver in 3 steps (pick + pack + ship)"
        }
        RoutingKey::Crossdock => "Cross-Dock",
    }
}

pub fn format_route_name(warehouse_name: &str, key: RoutingKey) -> String {
    format!("{}: {}", warehouse_name, route_type_name(key))
}

pub fn format_rule_name(
    code: &str,
    from: &stock_location::Model,
    dest: &stock_location::Model,
    suffix: Option<&str>,
) -> String {
    let mut name = format!("{}: {} → {}", code, from.name, dest.name);
    if let Some(suffix) = suffix {
        name.push_str(" (");
        name.push_str(suffix);
        name.push(')');
    }
    name
}

/// Concrete values for one rule row, ready for the create-or-reuse lookup.
#[derive(Debug, Clone)]
pub struct RuleValues {
    pub name: String,
    pub action: RuleAction,
    pub procure_method: ProcureMethod,
    pub route_id: i32,
    pub location_src_id: i32,
    pub location_dest_id: i32,
    pub picking_type_id: i32,
    pub warehouse_id: i32,
    pub company_id: Option<i32>,
    pub propagate_cancel: bool,
    pub propagate_carrier: bool,
    pub propagate_warehouse_id: Option<i32>,
    pub active: bool,
}

/// Overrides applied to a whole chain of generated rule values.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleOverrides<'a> {
    pub procure_method: Option<ProcureMethod>,
    pub active: Option<bool>,
    pub name_suffix: Option<&'a str>,
    pub propagate_warehouse_id: Option<i32>,
}

/// Turn a chain of routing steps into rule values.
///
/// The first step of a chain procures make-to-stock, every subsequent step
/// make-to-order: only the edge leaving an uncontrolled boundary (supplier,
/// or the stock buffer itself) may pull without a downstream order signal.
/// Cancellation propagates forward on every step except the last, so a
/// cancelled early hop cascades but never ripples past the chain boundary.
pub fn rule_values(
    topo: &WarehouseTopology,
    steps: &[RoutingStep<'_>],
    route_id: i32,
    overrides: RuleOverrides<'_>,
) -> Vec<RuleValues> {
    let last = steps.len().saturating_sub(1);
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let default_method = if i == 0 {
                ProcureMethod::MakeToStock
            } else {
                ProcureMethod::MakeToOrder
            };
            RuleValues {
                name: format_rule_name(
                    &topo.warehouse.code,
                    step.from,
                    step.dest,
                    overrides.name_suffix,
                ),
                action: step.action,
                procure_method: overrides.procure_method.unwrap_or(default_method),
                route_id,
                location_src_id: step.from.id,
                location_dest_id: step.dest.id,
                picking_type_id: step.picking_type.id,
                warehouse_id: topo.warehouse.id,
                company_id: Some(topo.warehouse.company_id),
                propagate_cancel: i != last,
                propagate_carrier: step.picking_type.id == topo.out_type.id,
                propagate_warehouse_id: overrides.propagate_warehouse_id,
                active: overrides.active.unwrap_or(true),
            }
        })
        .collect()
}

/// Reuse the rule row matching the natural key when one exists (refreshing
/// its display and procurement fields), otherwise create a fresh one.
/// Reusing rather than recreating keeps historical stock moves pointing at
/// valid rule ids and makes the synthesis pass idempotent.
pub async fn find_existing_rule_or_create<C: ConnectionTrait>(
    conn: &C,
    vals: RuleValues,
) -> Result<stock_rule::Model, ServiceError> {
    let existing = stock_rule::Entity::find()
        .filter(stock_rule::Column::PickingTypeId.eq(vals.picking_type_id))
        .filter(stock_rule::Column::LocationSrcId.eq(vals.location_src_id))
        .filter(stock_rule::Column::LocationDestId.eq(vals.location_dest_id))
        .filter(stock_rule::Column::RouteId.eq(vals.route_id))
        .filter(stock_rule::Column::Action.eq(vals.action))
        .one(conn)
        .await?;

    match existing {
        Some(rule) => {
            let mut am: stock_rule::ActiveModel = rule.into();
            am.name = Set(vals.name);
            am.active = Set(vals.active);
            am.procure_method = Set(vals.procure_method);
            am.propagate_cancel = Set(vals.propagate_cancel);
            am.propagate_carrier = Set(vals.propagate_carrier);
            am.propagate_warehouse_id = Set(vals.propagate_warehouse_id);
            Ok(am.update(conn).await?)
        }
        None => {
            let am = stock_rule::ActiveModel {
                name: Set(vals.name),
                active: Set(vals.active),
                action: Set(vals.action),
                procure_method: Set(vals.procure_method),
                route_id: Set(vals.route_id),
                location_src_id: Set(vals.location_src_id),
                location_dest_id: Set(vals.location_dest_id),
                picking_type_id: Set(vals.picking_type_id),
                warehouse_id: Set(Some(vals.warehouse_id)),
                company_id: Set(vals.company_id),
                propagate_cancel: Set(vals.propagate_cancel),
                propagate_carrier: Set(vals.propagate_carrier),
                propagate_warehouse_id: Set(vals.propagate_warehouse_id),
                auto: Set(RuleAuto::Manual),
                sequence: Set(10),
                ..Default::default()
            };
            Ok(am.insert(conn).await?)
        }
    }
}

async fn deactivate_route_rules<C: ConnectionTrait>(
    conn: &C,
    route_id: i32,
) -> Result<(), ServiceError> {
    stock_rule::Entity::update_many()
        .col_expr(stock_rule::Column::Active, Expr::value(false))
        .filter(stock_rule::Column::RouteId.eq(route_id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn link_route_to_warehouse<C: ConnectionTrait>(
    conn: &C,
    route_id: i32,
    warehouse_id: i32,
) -> Result<(), ServiceError> {
    let exists = route_warehouse::Entity::find_by_id((route_id, warehouse_id))
        .one(conn)
        .await?;
    if exists.is_none() {
        route_warehouse::ActiveModel {
            route_id: Set(route_id),
            warehouse_id: Set(warehouse_id),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

struct RouteDefaults {
    sequence: i32,
    product_selectable: bool,
    active: bool,
}

/// Create the route for a slot, or rename/reactivate the one the warehouse
/// already owns, then rebuild its rule set from the given chain.
async fn create_or_update_route<C: ConnectionTrait>(
    conn: &C,
    topo: &WarehouseTopology,
    existing_route_id: Option<i32>,
    key: RoutingKey,
    defaults: RouteDefaults,
    overrides: RuleOverrides<'_>,
) -> Result<stock_route::Model, ServiceError> {
    let route = match existing_route_id {
        Some(id) => {
            let route = stock_route::Entity::find_by_id(id)
                .one(conn)
                .await?
                .ok_or_else(|| {
                    ServiceError::InternalError(format!("dangling route reference {}", id))
                })?;
            let mut am: stock_route::ActiveModel = route.into();
            am.name = Set(format_route_name(&topo.warehouse.name, key));
            am.active = Set(defaults.active);
            am.update(conn).await?
        }
        None => {
            let route = stock_route::ActiveModel {
                name: Set(format_route_name(&topo.warehouse.name, key)),
                active: Set(defaults.active),
                sequence: Set(defaults.sequence),
                warehouse_selectable: Set(true),
                product_selectable: Set(defaults.product_selectable),
                product_categ_selectable: Set(true),
                company_id: Set(Some(topo.warehouse.company_id)),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            link_route_to_warehouse(conn, route.id, topo.warehouse.id).await?;
            route
        }
    };

    deactivate_route_rules(conn, route.id).await?;
    let steps = topo.routing_for(key);
    for vals in rule_values(topo, &steps, route.id, overrides) {
        find_existing_rule_or_create(conn, vals).await?;
    }
    Ok(route)
}

/// Route ids of a warehouse's three built-in routes after a synthesis pass.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinRoutes {
    pub reception_route_id: i32,
    pub delivery_route_id: i32,
    pub crossdock_route_id: i32,
}

/// Whether the crossdock route applies to a step configuration: goods can
/// only cross-dock when both an input and an output staging area exist.
pub fn crossdock_applies(reception: ReceptionSteps, delivery: DeliverySteps) -> bool {
    reception != ReceptionSteps::OneStep && delivery != DeliverySteps::ShipOnly
}

/// Synchronize the three built-in routes with the warehouse's current step
/// configuration. Idempotent: a second pass with an unchanged configuration
/// touches no row counts.
pub async fn sync_builtin_routes<C: ConnectionTrait>(
    conn: &C,
    topo: &WarehouseTopology,
) -> Result<BuiltinRoutes, ServiceError> {
    let wh = &topo.warehouse;

    let reception = create_or_update_route(
        conn,
        topo,
        wh.reception_route_id,
        RoutingKey::Reception(wh.reception_steps),
        RouteDefaults {
            sequence: 9,
            product_selectable: false,
            active: true,
        },
        RuleOverrides {
            active: Some(true),
            ..Default::default()
        },
    )
    .await?;

    let delivery = create_or_update_route(
        conn,
        topo,
        wh.delivery_route_id,
        RoutingKey::Delivery(wh.delivery_steps),
        RouteDefaults {
            sequence: 10,
            product_selectable: false,
            active: true,
        },
        RuleOverrides {
            active: Some(true),
            ..Default::default()
        },
    )
    .await?;

    // Crossdock always exists once created, but is only live when the
    // configuration has both staging areas.
    let crossdock_active = crossdock_applies(wh.reception_steps, wh.delivery_steps);
    let crossdock = create_or_update_route(
        conn,
        topo,
        wh.crossdock_route_id,
        RoutingKey::Crossdock,
        RouteDefaults {
            sequence: 20,
            product_selectable: true,
            active: crossdock_active,
        },
        RuleOverrides {
            procure_method: Some(ProcureMethod::MakeToOrder),
            active: Some(crossdock_active),
            ..Default::default()
        },
    )
    .await?;

    Ok(BuiltinRoutes {
        reception_route_id: reception.id,
        delivery_route_id: delivery.id,
        crossdock_route_id: crossdock.id,
    })
}

/// Create or update the warehouse's rule on the global "Replenish on Order"
/// route: the delivery-chain segment that leaves the stock location, with
/// procurement forced to make-to-order. Returns the rule id, or the previous
/// one unchanged when the global route is not installed.
pub async fn sync_mto_rule<C: ConnectionTrait>(
    conn: &C,
    topo: &WarehouseTopology,
) -> Result<Option<i32>, ServiceError> {
    let Some(mto_route) = refs::mto_route(conn).await? else {
        warn!(
            warehouse_id = topo.warehouse.id,
            "no global Replenish on Order route found; skipping MTO rule update"
        );
        return Ok(topo.warehouse.mto_rule_id);
    };

    let steps = topo.routing_for(RoutingKey::Delivery(topo.warehouse.delivery_steps));
    let Some(step) = steps.iter().find(|s| s.from.id == topo.lot_stock.id) else {
        return Ok(topo.warehouse.mto_rule_id);
    };

    let vals = rule_values(
        topo,
        std::slice::from_ref(step),
        mto_route.id,
        RuleOverrides {
            procure_method: Some(ProcureMethod::MakeToOrder),
            active: Some(true),
            name_suffix: Some("MTO"),
            ..Default::default()
        },
    )
    .remove(0);

    // Keep the rule id stable across reconfigurations: the existing row is
    // rewritten in place rather than archived and replaced.
    if let Some(rule_id) = topo.warehouse.mto_rule_id {
        if let Some(rule) = stock_rule::Entity::find_by_id(rule_id).one(conn).await? {
            let mut am: stock_rule::ActiveModel = rule.into();
            am.name = Set(vals.name);
            am.active = Set(true);
            am.action = Set(vals.action);
            am.procure_method = Set(ProcureMethod::MakeToOrder);
            am.location_src_id = Set(vals.location_src_id);
            am.location_dest_id = Set(vals.location_dest_id);
            am.picking_type_id = Set(vals.picking_type_id);
            am.propagate_cancel = Set(vals.propagate_cancel);
            am.propagate_carrier = Set(vals.propagate_carrier);
            let updated = am.update(conn).await?;
            return Ok(Some(updated.id));
        }
    }

    let rule = find_existing_rule_or_create(conn, vals).await?;
    Ok(Some(rule.id))
}

/// Push the current step configuration into the operation types: default
/// source/destination locations and the active flags of the steps in use.
pub async fn update_picking_types<C: ConnectionTrait>(
    conn: &C,
    topo: &WarehouseTopology,
) -> Result<(), ServiceError> {
    let wh = &topo.warehouse;
    let input_loc = topo.input_location().id;
    let output_loc = topo.output_location().id;

    let mut in_am: stock_picking_type::ActiveModel = topo.in_type.clone().into();
    in_am.default_location_dest_id = Set(Some(input_loc));
    in_am.active = Set(true);
    in_am.update(conn).await?;

    let mut out_am: stock_picking_type::ActiveModel = topo.out_type.clone().into();
    out_am.default_location_src_id = Set(Some(output_loc));
    out_am.active = Set(true);
    out_am.update(conn).await?;

    let mut pick_am: stock_picking_type::ActiveModel = topo.pick_type.clone().into();
    pick_am.active = Set(wh.delivery_steps != DeliverySteps::ShipOnly);
    pick_am.default_location_src_id = Set(Some(topo.lot_stock.id));
    pick_am.default_location_dest_id = Set(Some(match wh.delivery_steps {
        DeliverySteps::PickShip => topo.output.id,
        _ => topo.pack.id,
    }));
    pick_am.update(conn).await?;

    let mut pack_am: stock_picking_type::ActiveModel = topo.pack_type.clone().into();
    pack_am.active = Set(wh.delivery_steps == DeliverySteps::PickPackShip);
    pack_am.default_location_src_id = Set(Some(topo.pack.id));
    pack_am.default_location_dest_id = Set(Some(output_loc));
    pack_am.update(conn).await?;

    let mut int_am: stock_picking_type::ActiveModel = topo.int_type.clone().into();
    int_am.active = Set(wh.reception_steps != ReceptionSteps::OneStep
        || wh.delivery_steps != DeliverySteps::ShipOnly);
    int_am.update(conn).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::stock_location::LocationUsage;
    use crate::entities::stock_picking_type::PickingCode;
    use test_case::test_case;

    fn loc(id: i32, name: &str, usage: LocationUsage) -> stock_location::Model {
        stock_location::Model {
            id,
            name: name.to_string(),
            parent_id: None,
            usage,
            company_id: Some(1),
            barcode: None,
            active: true,
            reference: None,
        }
    }

    fn picking_type(id: i32, name: &str, code: PickingCode) -> stock_picking_type::Model {
        stock_picking_type::Model {
            id,
            name: name.to_string(),
            code,
            warehouse_id: 1,
            sequence: id,
            sequence_id: None,
            default_location_src_id: None,
            default_location_dest_id: None,
            return_picking_type_id: None,
            active: true,
        }
    }

    fn topology(reception: ReceptionSteps, delivery: DeliverySteps) -> WarehouseTopology {
        WarehouseTopology {
            warehouse: stock_warehouse::Model {
                id: 1,
                name: "Main Warehouse".to_string(),
                code: "WH".to_string(),
                company_id: 1,
                active: true,
                reception_steps: reception,
                delivery_steps: delivery,
                view_location_id: Some(10),
                lot_stock_location_id: Some(11),
                input_location_id: Some(12),
                qc_location_id: Some(13),
                output_location_id: Some(14),
                pack_location_id: Some(15),
                in_type_id: Some(21),
                int_type_id: Some(22),
                pick_type_id: Some(23),
                pack_type_id: Some(24),
                out_type_id: Some(25),
                reception_route_id: None,
                delivery_route_id: None,
                crossdock_route_id: None,
                mto_rule_id: None,
            },
            lot_stock: loc(11, "Stock", LocationUsage::Internal),
            input: loc(12, "Input", LocationUsage::Internal),
            qc: loc(13, "Quality Control", LocationUsage::Internal),
            output: loc(14, "Output", LocationUsage::Internal),
            pack: loc(15, "Packing Zone", LocationUsage::Internal),
            customer: loc(16, "Customers", LocationUsage::Customer),
            supplier: loc(17, "Suppliers", LocationUsage::Supplier),
            in_type: picking_type(21, "Receipts", PickingCode::Incoming),
            int_type: picking_type(22, "Internal Transfers", PickingCode::Internal),
            pick_type: picking_type(23, "Pick", PickingCode::Internal),
            pack_type: picking_type(24, "Pack", PickingCode::Internal),
            out_type: picking_type(25, "Delivery Orders", PickingCode::Outgoing),
        }
    }

    #[test]
    fn reception_chains_have_expected_shape() {
        let topo = topology(ReceptionSteps::ThreeSteps, DeliverySteps::ShipOnly);
        let steps = topo.routing_for(RoutingKey::Reception(ReceptionSteps::ThreeSteps));
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].from.id, topo.supplier.id);
        assert_eq!(steps[0].dest.id, topo.input.id);
        assert_eq!(steps[1].dest.id, topo.qc.id);
        assert_eq!(steps[2].dest.id, topo.lot_stock.id);
        assert_eq!(steps[0].action, RuleAction::Pull);
        assert_eq!(steps[1].action, RuleAction::PullPush);
        assert_eq!(steps[2].action, RuleAction::PullPush);
    }

    #[test]
    fn delivery_chains_end_at_customer() {
        let topo = topology(ReceptionSteps::OneStep, DeliverySteps::PickPackShip);
        let steps = topo.routing_for(RoutingKey::Delivery(DeliverySteps::PickPackShip));
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].from.id, topo.lot_stock.id);
        assert_eq!(steps[1].from.id, topo.pack.id);
        assert_eq!(steps[2].dest.id, topo.customer.id);
        assert!(steps.iter().all(|s| s.action == RuleAction::Pull));
    }

    #[test]
    fn first_step_procures_to_stock_and_the_rest_to_order() {
        let topo = topology(ReceptionSteps::ThreeSteps, DeliverySteps::PickPackShip);
        let steps = topo.routing_for(RoutingKey::Reception(ReceptionSteps::ThreeSteps));
        let vals = rule_values(&topo, &steps, 1, RuleOverrides::default());
        assert_eq!(vals[0].procure_method, ProcureMethod::MakeToStock);
        assert!(vals[1..]
            .iter()
            .all(|v| v.procure_method == ProcureMethod::MakeToOrder));
    }

    #[test]
    fn cancellation_propagates_everywhere_but_the_last_step() {
        let topo = topology(ReceptionSteps::OneStep, DeliverySteps::PickPackShip);
        let steps = topo.routing_for(RoutingKey::Delivery(DeliverySteps::PickPackShip));
        let vals = rule_values(&topo, &steps, 1, RuleOverrides::default());
        assert_eq!(
            vals.iter().map(|v| v.propagate_cancel).collect::<Vec<_>>(),
            vec![true, true, false]
        );
    }

    #[test]
    fn single_step_chain_does_not_propagate_cancellation() {
        let topo = topology(ReceptionSteps::OneStep, DeliverySteps::ShipOnly);
        let steps = topo.routing_for(RoutingKey::Delivery(DeliverySteps::ShipOnly));
        let vals = rule_values(&topo, &steps, 1, RuleOverrides::default());
        assert_eq!(vals.len(), 1);
        assert!(!vals[0].propagate_cancel);
    }

    #[test]
    fn carrier_propagates_only_on_outgoing_steps() {
        let topo = topology(ReceptionSteps::OneStep, DeliverySteps::PickShip);
        let steps = topo.routing_for(RoutingKey::Delivery(DeliverySteps::PickShip));
        let vals = rule_values(&topo, &steps, 1, RuleOverrides::default());
        assert_eq!(
            vals.iter().map(|v| v.propagate_carrier).collect::<Vec<_>>(),
            vec![false, true]
        );
    }

    #[test_case(ReceptionSteps::OneStep, DeliverySteps::ShipOnly => false)]
    #[test_case(ReceptionSteps::OneStep, DeliverySteps::PickShip => false)]
    #[test_case(ReceptionSteps::TwoSteps, DeliverySteps::ShipOnly => false)]
    #[test_case(ReceptionSteps::TwoSteps, DeliverySteps::PickShip => true)]
    #[test_case(ReceptionSteps::ThreeSteps, DeliverySteps::PickPackShip => true)]
    fn crossdock_gating(reception: ReceptionSteps, delivery: DeliverySteps) -> bool {
        crossdock_applies(reception, delivery)
    }

    #[test]
    fn boundary_locations_follow_step_configuration() {
        let topo = topology(ReceptionSteps::OneStep, DeliverySteps::ShipOnly);
        assert_eq!(topo.input_location().id, topo.lot_stock.id);
        assert_eq!(topo.output_location().id, topo.lot_stock.id);

        let topo = topology(ReceptionSteps::TwoSteps, DeliverySteps::PickShip);
        assert_eq!(topo.input_location().id, topo.input.id);
        assert_eq!(topo.output_location().id, topo.output.id);
    }

    #[test]
    fn rule_names_carry_code_and_endpoints() {
        let topo = topology(ReceptionSteps::OneStep, DeliverySteps::ShipOnly);
        let name = format_rule_name(&topo.warehouse.code, &topo.lot_stock, &topo.customer, None);
        assert_eq!(name, "WH: Stock → Customers");
        let mto = format_rule_name(
            &topo.warehouse.code,
            &topo.lot_stock,
            &topo.customer,
            Some("MTO"),
        );
        assert_eq!(mto, "WH: Stock → Customers (MTO)");
    }
}
