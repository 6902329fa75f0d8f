//! Built-in route synthesis: idempotence, archive-reuse round trips, chain
//! connectivity over every step combination, and crossdock gating.

mod common;

use std::collections::BTreeSet;

use common::TestApp;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use stockflow_api::entities::stock_location::LocationUsage;
use stockflow_api::entities::stock_rule::{ProcureMethod, RuleAction};
use stockflow_api::entities::stock_warehouse::{DeliverySteps, ReceptionSteps};
use stockflow_api::entities::{stock_location, stock_route, stock_rule};
use stockflow_api::services::routing::{self, WarehouseTopology};
use stockflow_api::services::warehouses::UpdateWarehouse;

async fn location(app: &TestApp, id: i32) -> stock_location::Model {
    stock_location::Entity::find_by_id(id)
        .one(app.db())
        .await
        .expect("location query")
        .expect("location exists")
}

/// Order a rule set into a chain by walking src -> dest from `start`.
fn chain_from(start: i32, rules: &[stock_rule::Model]) -> Vec<stock_rule::Model> {
    let mut ordered = Vec::new();
    let mut current = start;
    loop {
        let Some(next) = rules.iter().find(|r| r.location_src_id == current) else {
            break;
        };
        current = next.location_dest_id;
        ordered.push(next.clone());
        if ordered.len() > rules.len() {
            panic!("rule set contains a cycle");
        }
    }
    ordered
}

#[tokio::test]
async fn synthesizer_is_idempotent() {
    let app = TestApp::new().await;
    let warehouse = app
        .create_warehouse(
            "Main Warehouse",
            "WH",
            ReceptionSteps::TwoSteps,
            DeliverySteps::PickShip,
        )
        .await;

    let all_rules = |route_id: i32| app.rules_of_route(route_id);
    let reception_route = warehouse.reception_route_id.expect("reception route");
    let delivery_route = warehouse.delivery_route_id.expect("delivery route");
    let crossdock_route = warehouse.crossdock_route_id.expect("crossdock route");

    let snapshot = |rules: Vec<stock_rule::Model>| -> BTreeSet<(i32, bool)> {
        rules.iter().map(|r| (r.id, r.active)).collect()
    };
    let before_reception = snapshot(all_rules(reception_route).await);
    let before_delivery = snapshot(all_rules(delivery_route).await);
    let before_crossdock = snapshot(all_rules(crossdock_route).await);
    let route_count_before = stock_route::Entity::find()
        .all(app.db())
        .await
        .expect("route query")
        .len();

    // Second pass with an unchanged configuration.
    let topo = WarehouseTopology::load(app.db(), warehouse.clone())
        .await
        .expect("topology");
    let builtin = routing::sync_builtin_routes(app.db(), &topo)
        .await
        .expect("second synthesis pass");

    assert_eq!(builtin.reception_route_id, reception_route);
    assert_eq!(builtin.delivery_route_id, delivery_route);
    assert_eq!(builtin.crossdock_route_id, crossdock_route);
    assert_eq!(snapshot(all_rules(reception_route).await), before_reception);
    assert_eq!(snapshot(all_rules(delivery_route).await), before_delivery);
    assert_eq!(snapshot(all_rules(crossdock_route).await), before_crossdock);

    let route_count_after = stock_route::Entity::find()
        .all(app.db())
        .await
        .expect("route query")
        .len();
    assert_eq!(route_count_before, route_count_after);
}

#[tokio::test]
async fn step_round_trip_reactivates_original_rule_rows() {
    let app = TestApp::new().await;
    let warehouse = app
        .create_warehouse(
            "Main Warehouse",
            "WH",
            ReceptionSteps::OneStep,
            DeliverySteps::PickPackShip,
        )
        .await;
    let delivery_route = warehouse.delivery_route_id.expect("delivery route");

    let original: BTreeSet<i32> = app
        .active_rules_of_route(delivery_route)
        .await
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(original.len(), 3);

    let svc = &app.state.services.warehouses;
    svc.update(
        warehouse.id,
        UpdateWarehouse {
            delivery_steps: Some(DeliverySteps::ShipOnly),
            ..Default::default()
        },
    )
    .await
    .expect("switch to ship_only");

    let active_now: BTreeSet<i32> = app
        .active_rules_of_route(delivery_route)
        .await
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(active_now.len(), 1);
    assert!(active_now.is_disjoint(&original));
    let rows_after_switch = app.rules_of_route(delivery_route).await.len();

    svc.update(
        warehouse.id,
        UpdateWarehouse {
            delivery_steps: Some(DeliverySteps::PickPackShip),
            ..Default::default()
        },
    )
    .await
    .expect("switch back to pick_pack_ship");

    let reactivated: BTreeSet<i32> = app
        .active_rules_of_route(delivery_route)
        .await
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(reactivated, original);
    // No new rows: the round trip reuses archived ones.
    assert_eq!(app.rules_of_route(delivery_route).await.len(), rows_after_switch);
}

#[tokio::test]
async fn every_step_combination_yields_a_connected_path() {
    let app = TestApp::new().await;
    let receptions = [
        (ReceptionSteps::OneStep, 1usize),
        (ReceptionSteps::TwoSteps, 2),
        (ReceptionSteps::ThreeSteps, 3),
    ];
    let deliveries = [
        (DeliverySteps::ShipOnly, 1usize),
        (DeliverySteps::PickShip, 2),
        (DeliverySteps::PickPackShip, 3),
    ];

    for (i, (reception, r_len)) in receptions.iter().enumerate() {
        for (j, (delivery, d_len)) in deliveries.iter().enumerate() {
            let code = format!("W{}{}", i, j);
            let warehouse = app
                .create_warehouse(&format!("Warehouse {}{}", i, j), &code, *reception, *delivery)
                .await;

            let supplier = stock_location::Entity::find()
                .filter(stock_location::Column::Usage.eq(LocationUsage::Supplier))
                .one(app.db())
                .await
                .expect("query")
                .expect("supplier location");
            let customer = stock_location::Entity::find()
                .filter(stock_location::Column::Usage.eq(LocationUsage::Customer))
                .one(app.db())
                .await
                .expect("query")
                .expect("customer location");
            let lot_stock = warehouse.lot_stock_location_id.expect("stock location");

            let reception_rules = app
                .active_rules_of_route(warehouse.reception_route_id.expect("route"))
                .await;
            let delivery_rules = app
                .active_rules_of_route(warehouse.delivery_route_id.expect("route"))
                .await;

            let reception_chain = chain_from(supplier.id, &reception_rules);
            assert_eq!(reception_chain.len(), *r_len, "{:?}", reception);
            assert_eq!(
                reception_chain.last().map(|r| r.location_dest_id),
                Some(lot_stock)
            );

            let delivery_chain = chain_from(lot_stock, &delivery_rules);
            assert_eq!(delivery_chain.len(), *d_len, "{:?}", delivery);
            assert_eq!(
                delivery_chain.last().map(|r| r.location_dest_id),
                Some(customer.id)
            );

            // Connected path supplier -> ... -> stock -> ... -> customer with
            // one more node than edges, and no stray edges.
            let mut nodes = BTreeSet::new();
            for rule in reception_chain.iter().chain(delivery_chain.iter()) {
                nodes.insert(rule.location_src_id);
                nodes.insert(rule.location_dest_id);
            }
            assert_eq!(nodes.len(), r_len + d_len + 1);
            assert_eq!(reception_rules.len(), *r_len);
            assert_eq!(delivery_rules.len(), *d_len);

            // Each chain pulls to stock on its first edge and on order after.
            for (chain, desc) in [(&reception_chain, "reception"), (&delivery_chain, "delivery")] {
                assert_eq!(
                    chain[0].procure_method,
                    ProcureMethod::MakeToStock,
                    "first {} edge",
                    desc
                );
                for rule in &chain[1..] {
                    assert_eq!(rule.procure_method, ProcureMethod::MakeToOrder);
                }
                for (k, rule) in chain.iter().enumerate() {
                    assert_eq!(rule.propagate_cancel, k + 1 != chain.len());
                }
            }
        }
    }
}

#[tokio::test]
async fn crossdock_route_is_gated_by_both_step_counts() {
    let app = TestApp::new().await;
    let warehouse = app
        .create_warehouse(
            "Main Warehouse",
            "WH",
            ReceptionSteps::TwoSteps,
            DeliverySteps::PickShip,
        )
        .await;
    let crossdock_route = warehouse.crossdock_route_id.expect("crossdock route");

    let route = stock_route::Entity::find_by_id(crossdock_route)
        .one(app.db())
        .await
        .expect("query")
        .expect("route");
    assert!(route.active);
    let rules = app.active_rules_of_route(crossdock_route).await;
    assert_eq!(rules.len(), 2);
    assert!(rules
        .iter()
        .all(|r| r.procure_method == ProcureMethod::MakeToOrder));
    assert!(rules.iter().all(|r| r.action == RuleAction::Pull));

    // Dropping either side below two steps archives the route and its rules.
    app.state
        .services
        .warehouses
        .update(
            warehouse.id,
            UpdateWarehouse {
                delivery_steps: Some(DeliverySteps::ShipOnly),
                ..Default::default()
            },
        )
        .await
        .expect("reconfigure");

    let route = stock_route::Entity::find_by_id(crossdock_route)
        .one(app.db())
        .await
        .expect("query")
        .expect("route");
    assert!(!route.active);
    assert!(app.active_rules_of_route(crossdock_route).await.is_empty());
}

#[tokio::test]
async fn default_configuration_scenario() {
    let app = TestApp::new().await;
    let warehouse = app
        .create_warehouse(
            "Main Warehouse",
            "WH",
            ReceptionSteps::OneStep,
            DeliverySteps::ShipOnly,
        )
        .await;

    let reception = app
        .active_rules_of_route(warehouse.reception_route_id.expect("route"))
        .await;
    let delivery = app
        .active_rules_of_route(warehouse.delivery_route_id.expect("route"))
        .await;
    assert_eq!(reception.len(), 1);
    assert_eq!(delivery.len(), 1);

    let supplier_to_stock = &reception[0];
    assert_eq!(
        Some(supplier_to_stock.location_dest_id),
        warehouse.lot_stock_location_id
    );
    let stock_to_customer = &delivery[0];
    assert_eq!(
        Some(stock_to_customer.location_src_id),
        warehouse.lot_stock_location_id
    );

    // One make-to-order copy of the stock-leaving segment on the global route.
    let mto_rule_id = warehouse.mto_rule_id.expect("mto rule");
    let mto_rule = stock_rule::Entity::find_by_id(mto_rule_id)
        .one(app.db())
        .await
        .expect("query")
        .expect("mto rule");
    assert!(mto_rule.active);
    assert_eq!(mto_rule.procure_method, ProcureMethod::MakeToOrder);
    assert_eq!(mto_rule.location_src_id, stock_to_customer.location_src_id);
    assert_eq!(mto_rule.location_dest_id, stock_to_customer.location_dest_id);

    // Switching to pick_ship archives the single-step rule, activates the
    // two new segments, and rewrites the MTO copy in place.
    let updated = app
        .state
        .services
        .warehouses
        .update(
            warehouse.id,
            UpdateWarehouse {
                delivery_steps: Some(DeliverySteps::PickShip),
                ..Default::default()
            },
        )
        .await
        .expect("reconfigure");

    let old_rule = stock_rule::Entity::find_by_id(stock_to_customer.id)
        .one(app.db())
        .await
        .expect("query")
        .expect("rule");
    assert!(!old_rule.active);

    let delivery = app
        .active_rules_of_route(updated.delivery_route_id.expect("route"))
        .await;
    assert_eq!(delivery.len(), 2);
    let output_id = updated.output_location_id.expect("output location");
    let lot_stock = updated.lot_stock_location_id.expect("stock location");
    assert!(delivery
        .iter()
        .any(|r| r.location_src_id == lot_stock && r.location_dest_id == output_id));
    assert!(delivery.iter().any(|r| r.location_src_id == output_id));

    // Same rule row, new endpoints: the stock-leaving segment is now
    // stock -> output via the pick operation type.
    assert_eq!(updated.mto_rule_id, Some(mto_rule_id));
    let mto_rule = stock_rule::Entity::find_by_id(mto_rule_id)
        .one(app.db())
        .await
        .expect("query")
        .expect("mto rule");
    assert!(mto_rule.active);
    assert_eq!(mto_rule.location_src_id, lot_stock);
    assert_eq!(mto_rule.location_dest_id, output_id);
    assert_eq!(mto_rule.picking_type_id, updated.pick_type_id.expect("pick type"));
    let output = location(&app, output_id).await;
    assert!(output.active);
}
