//! Inter-warehouse resupply routes.
//!
//! A resupply route lets one warehouse replenish from another through a
//! transit location: the supplier's outbound edge ends at transit instead of
//! the customer location, and the supplied warehouse pulls from transit into
//! its own inbound boundary. Routes are archived on removal and reactivated
//! (same rows, same ids) when the pairing is configured again.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use tracing::warn;

use crate::entities::stock_location::LocationUsage;
use crate::entities::stock_rule::{ProcureMethod, RuleAction};
use crate::entities::{stock_location, stock_route, stock_rule};
use crate::errors::ServiceError;
use crate::services::refs;
use crate::services::routing::{
    find_existing_rule_or_create, rule_values, RoutingStep, RuleOverrides, WarehouseTopology,
};

/// Outcome of configuring one supplier pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResupplyOutcome {
    Created(i32),
    Reactivated(i32),
    /// No usable transit location between the two companies.
    Skipped,
}

/// The transit location goods travel through between the two warehouses:
/// the supplied company's internal transit when both warehouses share a
/// company, the shared inter-company transit otherwise. Activated on first
/// use; transit locations are seeded inactive.
async fn transit_location<C: ConnectionTrait>(
    conn: &C,
    supplied: &WarehouseTopology,
    supplier: &WarehouseTopology,
) -> Result<Option<stock_location::Model>, ServiceError> {
    let (internal, external) = refs::transit_locations(conn, supplied.warehouse.company_id).await?;
    let chosen = if supplier.warehouse.company_id == supplied.warehouse.company_id {
        internal
    } else {
        external
    };
    match chosen {
        Some(loc) if !loc.active => {
            let mut am: stock_location::ActiveModel = loc.into();
            am.active = Set(true);
            Ok(Some(am.update(conn).await?))
        }
        other => Ok(other),
    }
}

fn resupply_route_name(supplied: &WarehouseTopology, supplier: &WarehouseTopology) -> String {
    format!(
        "{}: Supply Product from {}",
        supplied.warehouse.name, supplier.warehouse.name
    )
}

async fn find_resupply_route<C: ConnectionTrait>(
    conn: &C,
    supplied_wh_id: i32,
    supplier_wh_id: i32,
) -> Result<Option<stock_route::Model>, ServiceError> {
    Ok(stock_route::Entity::find()
        .filter(stock_route::Column::SuppliedWhId.eq(supplied_wh_id))
        .filter(stock_route::Column::SupplierWhId.eq(supplier_wh_id))
        .one(conn)
        .await?)
}

/// Create the resupply route from `supplier` to `supplied`, or reactivate the
/// archived one, and (re)build its two pull rules. A supplier shipping in a
/// single step also gets a make-to-order rule on the global replenish route,
/// since its stock location has no multi-step MTO rule ending at transit.
pub async fn create_resupply_route<C: ConnectionTrait>(
    conn: &C,
    supplied: &WarehouseTopology,
    supplier: &WarehouseTopology,
) -> Result<ResupplyOutcome, ServiceError> {
    let Some(transit) = transit_location(conn, supplied, supplier).await? else {
        warn!(
            supplied_wh_id = supplied.warehouse.id,
            supplier_wh_id = supplier.warehouse.id,
            "no transit location between companies; skipping resupply route"
        );
        return Ok(ResupplyOutcome::Skipped);
    };

    let existing = find_resupply_route(conn, supplied.warehouse.id, supplier.warehouse.id).await?;
    let reactivated = existing.is_some();
    let route = match existing {
        Some(route) => {
            let mut am: stock_route::ActiveModel = route.into();
            am.name = Set(resupply_route_name(supplied, supplier));
            am.active = Set(true);
            am.update(conn).await?
        }
        None => {
            stock_route::ActiveModel {
                name: Set(resupply_route_name(supplied, supplier)),
                active: Set(true),
                sequence: Set(10),
                warehouse_selectable: Set(true),
                product_selectable: Set(true),
                product_categ_selectable: Set(true),
                company_id: Set(Some(supplied.warehouse.company_id)),
                supplied_wh_id: Set(Some(supplied.warehouse.id)),
                supplier_wh_id: Set(Some(supplier.warehouse.id)),
                ..Default::default()
            }
            .insert(conn)
            .await?
        }
    };

    let ship_from = supplier.output_location();
    let single_step_supplier = ship_from.id == supplier.lot_stock.id;

    // Multi-step suppliers already carry an MTO rule out of stock; a
    // single-step supplier needs one ending at transit.
    if single_step_supplier {
        if let Some(mto_route) = refs::mto_route(conn).await? {
            let step = RoutingStep {
                from: &supplier.lot_stock,
                dest: &transit,
                picking_type: &supplier.out_type,
                action: RuleAction::Pull,
            };
            let vals = rule_values(
                supplier,
                std::slice::from_ref(&step),
                mto_route.id,
                RuleOverrides {
                    procure_method: Some(ProcureMethod::MakeToOrder),
                    active: Some(true),
                    name_suffix: Some("MTO"),
                    ..Default::default()
                },
            )
            .remove(0);
            find_existing_rule_or_create(conn, vals).await?;
        }
    }

    // Supplier side: ship-out location to transit, stocked only when the
    // goods leave the supplier's stock buffer directly.
    let supplier_step = RoutingStep {
        from: ship_from,
        dest: &transit,
        picking_type: &supplier.out_type,
        action: RuleAction::Pull,
    };
    let supplier_method = if single_step_supplier {
        ProcureMethod::MakeToStock
    } else {
        ProcureMethod::MakeToOrder
    };
    let vals = rule_values(
        supplier,
        std::slice::from_ref(&supplier_step),
        route.id,
        RuleOverrides {
            procure_method: Some(supplier_method),
            active: Some(true),
            ..Default::default()
        },
    )
    .remove(0);
    find_existing_rule_or_create(conn, vals).await?;

    // Supplied side: transit into the inbound boundary, ordered on demand,
    // with the upstream procurement routed to the supplier warehouse.
    let supplied_step = RoutingStep {
        from: &transit,
        dest: supplied.input_location(),
        picking_type: &supplied.in_type,
        action: RuleAction::Pull,
    };
    let vals = rule_values(
        supplied,
        std::slice::from_ref(&supplied_step),
        route.id,
        RuleOverrides {
            procure_method: Some(ProcureMethod::MakeToOrder),
            active: Some(true),
            propagate_warehouse_id: Some(supplier.warehouse.id),
            ..Default::default()
        },
    )
    .remove(0);
    find_existing_rule_or_create(conn, vals).await?;

    if reactivated {
        Ok(ResupplyOutcome::Reactivated(route.id))
    } else {
        Ok(ResupplyOutcome::Created(route.id))
    }
}

/// Archive the resupply route between the pair, along with its rules, so a
/// later re-pairing can reactivate the same rows. Returns the archived route
/// id when a route existed.
pub async fn archive_resupply_route<C: ConnectionTrait>(
    conn: &C,
    supplied_wh_id: i32,
    supplier_wh_id: i32,
) -> Result<Option<i32>, ServiceError> {
    let Some(route) = find_resupply_route(conn, supplied_wh_id, supplier_wh_id).await? else {
        return Ok(None);
    };
    let route_id = route.id;
    let mut am: stock_route::ActiveModel = route.into();
    am.active = Set(false);
    am.update(conn).await?;
    stock_rule::Entity::update_many()
        .col_expr(stock_rule::Column::Active, Expr::value(false))
        .filter(stock_rule::Column::RouteId.eq(route_id))
        .exec(conn)
        .await?;
    Ok(Some(route_id))
}

async fn routes_supplying_from<C: ConnectionTrait>(
    conn: &C,
    supplier_wh_id: i32,
) -> Result<Vec<i32>, ServiceError> {
    Ok(stock_route::Entity::find()
        .filter(stock_route::Column::SupplierWhId.eq(supplier_wh_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect())
}

async fn routes_supplied_to<C: ConnectionTrait>(
    conn: &C,
    supplied_wh_id: i32,
) -> Result<Vec<i32>, ServiceError> {
    Ok(stock_route::Entity::find()
        .filter(stock_route::Column::SuppliedWhId.eq(supplied_wh_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect())
}

async fn location_usage<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Option<LocationUsage>, ServiceError> {
    Ok(stock_location::Entity::find_by_id(id)
        .one(conn)
        .await?
        .map(|l| l.usage))
}

/// After the warehouse's delivery depth crosses the single-step boundary,
/// rewrite the outbound edges of every route it supplies: they must leave
/// from the new ship-out location, stocked when that location is the stock
/// buffer itself and ordered otherwise.
pub async fn sync_delivery_resupply<C: ConnectionTrait>(
    conn: &C,
    supplier: &WarehouseTopology,
    change_to_multiple: bool,
) -> Result<(), ServiceError> {
    let route_ids = routes_supplying_from(conn, supplier.warehouse.id).await?;
    if route_ids.is_empty() {
        return Ok(());
    }
    let new_src = supplier.output_location();

    let rules = stock_rule::Entity::find()
        .filter(stock_rule::Column::RouteId.is_in(route_ids))
        .filter(stock_rule::Column::Action.ne(RuleAction::Push))
        .all(conn)
        .await?;

    let mut transit_dests: Vec<i32> = Vec::new();
    for rule in rules {
        if location_usage(conn, rule.location_dest_id).await? != Some(LocationUsage::Transit) {
            continue;
        }
        if !transit_dests.contains(&rule.location_dest_id) {
            transit_dests.push(rule.location_dest_id);
        }
        let mut am: stock_rule::ActiveModel = rule.into();
        am.location_src_id = Set(new_src.id);
        am.procure_method = Set(if change_to_multiple {
            ProcureMethod::MakeToOrder
        } else {
            ProcureMethod::MakeToStock
        });
        am.update(conn).await?;
    }

    let Some(mto_route) = refs::mto_route(conn).await? else {
        return Ok(());
    };

    if change_to_multiple {
        // The generic delivery MTO rule now covers the transit edges; the
        // dedicated stock-to-transit ones would double-pull.
        for dest in transit_dests {
            stock_rule::Entity::update_many()
                .col_expr(stock_rule::Column::Active, Expr::value(false))
                .filter(stock_rule::Column::RouteId.eq(mto_route.id))
                .filter(stock_rule::Column::Action.ne(RuleAction::Push))
                .filter(stock_rule::Column::LocationSrcId.eq(supplier.lot_stock.id))
                .filter(stock_rule::Column::LocationDestId.eq(dest))
                .exec(conn)
                .await?;
        }
    } else {
        // Back to single-step: the transit edges leave stock directly and
        // need their own on-order rules again.
        for dest in transit_dests {
            let Some(dest_loc) = stock_location::Entity::find_by_id(dest).one(conn).await? else {
                continue;
            };
            let step = RoutingStep {
                from: &supplier.lot_stock,
                dest: &dest_loc,
                picking_type: &supplier.out_type,
                action: RuleAction::Pull,
            };
            let vals = rule_values(
                supplier,
                std::slice::from_ref(&step),
                mto_route.id,
                RuleOverrides {
                    procure_method: Some(ProcureMethod::MakeToOrder),
                    active: Some(true),
                    name_suffix: Some("MTO"),
                    ..Default::default()
                },
            )
            .remove(0);
            find_existing_rule_or_create(conn, vals).await?;
        }
    }
    Ok(())
}

/// After the warehouse's reception depth crosses the single-step boundary,
/// repoint the inbound edge of every route supplying it at the new inbound
/// boundary location.
pub async fn sync_reception_resupply<C: ConnectionTrait>(
    conn: &C,
    supplied: &WarehouseTopology,
) -> Result<(), ServiceError> {
    let route_ids = routes_supplied_to(conn, supplied.warehouse.id).await?;
    if route_ids.is_empty() {
        return Ok(());
    }
    let new_dest = supplied.input_location();

    let rules = stock_rule::Entity::find()
        .filter(stock_rule::Column::RouteId.is_in(route_ids))
        .filter(stock_rule::Column::Action.ne(RuleAction::Push))
        .all(conn)
        .await?;
    for rule in rules {
        if location_usage(conn, rule.location_src_id).await? != Some(LocationUsage::Transit) {
            continue;
        }
        let mut am: stock_rule::ActiveModel = rule.into();
        am.location_dest_id = Set(new_dest.id);
        am.update(conn).await?;
    }
    Ok(())
}
