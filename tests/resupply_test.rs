//! Inter-warehouse resupply: route and rule shapes, archive/reactivate round
//! trips, and the rewrites triggered when either side changes step depth.

mod common;

use common::TestApp;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use stockflow_api::entities::stock_location::LocationUsage;
use stockflow_api::entities::stock_rule::ProcureMethod;
use stockflow_api::entities::stock_warehouse::{DeliverySteps, ReceptionSteps};
use stockflow_api::entities::{company, stock_location, stock_route, stock_warehouse};
use stockflow_api::services::warehouses::{CreateWarehouse, UpdateWarehouse};

async fn resupply_route(
    app: &TestApp,
    supplied_wh_id: i32,
    supplier_wh_id: i32,
) -> stock_route::Model {
    stock_route::Entity::find()
        .filter(stock_route::Column::SuppliedWhId.eq(supplied_wh_id))
        .filter(stock_route::Column::SupplierWhId.eq(supplier_wh_id))
        .one(app.db())
        .await
        .expect("route query")
        .expect("resupply route exists")
}

async fn internal_transit(app: &TestApp) -> stock_location::Model {
    let company = company::Entity::find_by_id(common::DEFAULT_COMPANY_ID)
        .one(app.db())
        .await
        .expect("company query")
        .expect("seeded company");
    stock_location::Entity::find_by_id(company.internal_transit_location_id.expect("transit"))
        .one(app.db())
        .await
        .expect("location query")
        .expect("transit location")
}

async fn mto_route_id(app: &TestApp) -> i32 {
    stock_route::Entity::find()
        .filter(stock_route::Column::Reference.eq("mto"))
        .one(app.db())
        .await
        .expect("route query")
        .expect("replenish-on-order route")
        .id
}

async fn paired_warehouses(
    app: &TestApp,
    supplier_delivery: DeliverySteps,
) -> (stock_warehouse::Model, stock_warehouse::Model) {
    let hub = app
        .create_warehouse("Hub", "HUB", ReceptionSteps::OneStep, supplier_delivery)
        .await;
    let satellite = app
        .state
        .services
        .warehouses
        .create(CreateWarehouse {
            name: "Satellite".to_string(),
            code: "SAT".to_string(),
            company_id: common::DEFAULT_COMPANY_ID,
            reception_steps: ReceptionSteps::OneStep,
            delivery_steps: DeliverySteps::ShipOnly,
            resupply_wh_ids: vec![hub.id],
        })
        .await
        .expect("supplied warehouse creation");
    (hub, satellite)
}

#[tokio::test]
async fn pairing_builds_route_through_transit() {
    let app = TestApp::new().await;
    let (hub, satellite) = paired_warehouses(&app, DeliverySteps::ShipOnly).await;

    let route = resupply_route(&app, satellite.id, hub.id).await;
    assert_eq!(route.name, "Satellite: Supply Product from Hub");
    assert!(route.active);
    assert_eq!(route.sequence, 10);
    assert!(route.warehouse_selectable);
    assert!(route.product_selectable);
    assert!(route.product_categ_selectable);

    // Both warehouses share a company, so the company transit location is
    // used and woken from its seeded inactive state.
    let transit = internal_transit(&app).await;
    assert_eq!(transit.usage, LocationUsage::Transit);
    assert!(transit.active);

    let rules = app.active_rules_of_route(route.id).await;
    assert_eq!(rules.len(), 2);

    let outbound = rules
        .iter()
        .find(|r| r.location_dest_id == transit.id)
        .expect("supplier-side rule");
    assert_eq!(Some(outbound.location_src_id), hub.lot_stock_location_id);
    assert_eq!(outbound.procure_method, ProcureMethod::MakeToStock);
    assert_eq!(Some(outbound.picking_type_id), hub.out_type_id);

    let inbound = rules
        .iter()
        .find(|r| r.location_src_id == transit.id)
        .expect("supplied-side rule");
    assert_eq!(
        Some(inbound.location_dest_id),
        satellite.lot_stock_location_id
    );
    assert_eq!(inbound.procure_method, ProcureMethod::MakeToOrder);
    assert_eq!(Some(inbound.picking_type_id), satellite.in_type_id);
    assert_eq!(inbound.propagate_warehouse_id, Some(hub.id));

    // A single-step supplier also gets an on-order edge out of stock on the
    // global replenish route.
    let mto_route = mto_route_id(&app).await;
    let extra = app
        .active_rules_of_route(mto_route)
        .await
        .into_iter()
        .find(|r| r.location_dest_id == transit.id)
        .expect("stock-to-transit rule");
    assert_eq!(Some(extra.location_src_id), hub.lot_stock_location_id);
    assert_eq!(extra.procure_method, ProcureMethod::MakeToOrder);
}

#[tokio::test]
async fn multi_step_supplier_ships_on_order_from_output() {
    let app = TestApp::new().await;
    let (hub, satellite) = paired_warehouses(&app, DeliverySteps::PickShip).await;

    let route = resupply_route(&app, satellite.id, hub.id).await;
    let transit = internal_transit(&app).await;
    let rules = app.active_rules_of_route(route.id).await;

    let outbound = rules
        .iter()
        .find(|r| r.location_dest_id == transit.id)
        .expect("supplier-side rule");
    assert_eq!(Some(outbound.location_src_id), hub.output_location_id);
    assert_eq!(outbound.procure_method, ProcureMethod::MakeToOrder);

    // The supplier's delivery chain already has an on-order edge out of
    // stock, so the global route gets no stock-to-transit addition.
    let mto_route = mto_route_id(&app).await;
    assert!(!app
        .active_rules_of_route(mto_route)
        .await
        .iter()
        .any(|r| r.location_dest_id == transit.id));
}

#[tokio::test]
async fn unpairing_archives_and_repairing_reuses_the_route() {
    let app = TestApp::new().await;
    let (hub, satellite) = paired_warehouses(&app, DeliverySteps::ShipOnly).await;
    let route = resupply_route(&app, satellite.id, hub.id).await;
    let rule_count = app.active_rules_of_route(route.id).await.len();
    assert_eq!(rule_count, 2);

    let svc = &app.state.services.warehouses;
    svc.update(
        satellite.id,
        UpdateWarehouse {
            resupply_wh_ids: Some(Vec::new()),
            ..Default::default()
        },
    )
    .await
    .expect("unpairing");

    let archived = resupply_route(&app, satellite.id, hub.id).await;
    assert_eq!(archived.id, route.id);
    assert!(!archived.active);
    assert!(app.active_rules_of_route(route.id).await.is_empty());

    svc.update(
        satellite.id,
        UpdateWarehouse {
            resupply_wh_ids: Some(vec![hub.id]),
            ..Default::default()
        },
    )
    .await
    .expect("re-pairing");

    let reactivated = resupply_route(&app, satellite.id, hub.id).await;
    assert_eq!(reactivated.id, route.id);
    assert!(reactivated.active);
    assert_eq!(app.active_rules_of_route(route.id).await.len(), rule_count);
}

#[tokio::test]
async fn self_resupply_is_rejected() {
    let app = TestApp::new().await;
    let wh = app
        .create_warehouse(
            "Hub",
            "HUB",
            ReceptionSteps::OneStep,
            DeliverySteps::ShipOnly,
        )
        .await;
    let result = app
        .state
        .services
        .warehouses
        .update(
            wh.id,
            UpdateWarehouse {
                resupply_wh_ids: Some(vec![wh.id]),
                ..Default::default()
            },
        )
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn supplier_depth_change_rewrites_outbound_edges() {
    let app = TestApp::new().await;
    let (hub, satellite) = paired_warehouses(&app, DeliverySteps::ShipOnly).await;
    let route = resupply_route(&app, satellite.id, hub.id).await;
    let transit = internal_transit(&app).await;
    let mto_route = mto_route_id(&app).await;
    let svc = &app.state.services.warehouses;

    let hub = svc
        .update(
            hub.id,
            UpdateWarehouse {
                delivery_steps: Some(DeliverySteps::PickShip),
                ..Default::default()
            },
        )
        .await
        .expect("deepen supplier delivery");

    // Outbound edge now leaves the ship-out buffer on order, and the
    // dedicated stock-to-transit rule steps aside for the generic one.
    let outbound = app
        .active_rules_of_route(route.id)
        .await
        .into_iter()
        .find(|r| r.location_dest_id == transit.id)
        .expect("supplier-side rule");
    assert_eq!(Some(outbound.location_src_id), hub.output_location_id);
    assert_eq!(outbound.procure_method, ProcureMethod::MakeToOrder);
    assert!(!app
        .active_rules_of_route(mto_route)
        .await
        .iter()
        .any(|r| r.location_src_id == hub.lot_stock_location_id.unwrap()
            && r.location_dest_id == transit.id));

    let hub = svc
        .update(
            hub.id,
            UpdateWarehouse {
                delivery_steps: Some(DeliverySteps::ShipOnly),
                ..Default::default()
            },
        )
        .await
        .expect("flatten supplier delivery");

    let outbound = app
        .active_rules_of_route(route.id)
        .await
        .into_iter()
        .find(|r| r.location_dest_id == transit.id)
        .expect("supplier-side rule");
    assert_eq!(Some(outbound.location_src_id), hub.lot_stock_location_id);
    assert_eq!(outbound.procure_method, ProcureMethod::MakeToStock);
    let extra = app
        .active_rules_of_route(mto_route)
        .await
        .into_iter()
        .find(|r| r.location_dest_id == transit.id)
        .expect("stock-to-transit rule restored");
    assert_eq!(Some(extra.location_src_id), hub.lot_stock_location_id);
}

#[tokio::test]
async fn supplied_depth_change_repoints_inbound_edge() {
    let app = TestApp::new().await;
    let (hub, satellite) = paired_warehouses(&app, DeliverySteps::ShipOnly).await;
    let route = resupply_route(&app, satellite.id, hub.id).await;
    let transit = internal_transit(&app).await;
    let svc = &app.state.services.warehouses;

    let satellite = svc
        .update(
            satellite.id,
            UpdateWarehouse {
                reception_steps: Some(ReceptionSteps::TwoSteps),
                ..Default::default()
            },
        )
        .await
        .expect("deepen supplied reception");

    let inbound = app
        .active_rules_of_route(route.id)
        .await
        .into_iter()
        .find(|r| r.location_src_id == transit.id)
        .expect("supplied-side rule");
    assert_eq!(Some(inbound.location_dest_id), satellite.input_location_id);

    let satellite = svc
        .update(
            satellite.id,
            UpdateWarehouse {
                reception_steps: Some(ReceptionSteps::OneStep),
                ..Default::default()
            },
        )
        .await
        .expect("flatten supplied reception");

    let inbound = app
        .active_rules_of_route(route.id)
        .await
        .into_iter()
        .find(|r| r.location_src_id == transit.id)
        .expect("supplied-side rule");
    assert_eq!(
        Some(inbound.location_dest_id),
        satellite.lot_stock_location_id
    );
}
