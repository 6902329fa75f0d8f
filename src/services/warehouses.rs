//! Warehouse lifecycle: creation, reconfiguration, archive, unarchive.
//!
//! Every public method runs inside one transaction and either applies the
//! whole cascade (locations, operation types, routes, rules, resupply) or
//! rolls back. Lifecycle events are collected during the transaction and
//! published only after commit.

use std::sync::Arc;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, instrument};

use crate::entities::stock_location::LocationUsage;
use crate::entities::stock_move::MoveState;
use crate::entities::stock_picking_type::PickingCode;
use crate::entities::stock_warehouse::{DeliverySteps, ReceptionSteps};
use crate::entities::{
    picking_sequence, route_warehouse, stock_location, stock_move, stock_picking_type,
    stock_route, stock_rule, stock_warehouse, warehouse_resupply,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::resupply::{self, ResupplyOutcome};
use crate::services::routing::{self, WarehouseTopology};
use crate::services::refs;

pub const MAX_CODE_LEN: usize = 5;

#[derive(Debug, Clone)]
pub struct CreateWarehouse {
    pub name: String,
    pub code: String,
    pub company_id: i32,
    pub reception_steps: ReceptionSteps,
    pub delivery_steps: DeliverySteps,
    pub resupply_wh_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateWarehouse {
    pub name: Option<String>,
    pub code: Option<String>,
    pub reception_steps: Option<ReceptionSteps>,
    pub delivery_steps: Option<DeliverySteps>,
    pub resupply_wh_ids: Option<Vec<i32>>,
}

/// A route together with its rules, for the routes listing endpoint.
#[derive(Debug, Clone)]
pub struct RouteWithRules {
    pub route: stock_route::Model,
    pub rules: Vec<stock_rule::Model>,
}

#[derive(Clone)]
pub struct WarehouseService {
    db: Arc<DatabaseConnection>,
    events: Arc<EventSender>,
}

fn validate_name_and_code(name: &str, code: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "warehouse name must not be empty".to_string(),
        ));
    }
    let len = code.chars().count();
    if len == 0 || len > MAX_CODE_LEN {
        return Err(ServiceError::ValidationError(format!(
            "warehouse code must be 1 to {} characters",
            MAX_CODE_LEN
        )));
    }
    Ok(())
}

async fn check_unique<C: ConnectionTrait>(
    conn: &C,
    company_id: i32,
    name: &str,
    code: &str,
    exclude_id: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = stock_warehouse::Entity::find()
        .filter(stock_warehouse::Column::CompanyId.eq(company_id))
        .filter(
            stock_warehouse::Column::Name
                .eq(name)
                .or(stock_warehouse::Column::Code.eq(code)),
        );
    if let Some(id) = exclude_id {
        query = query.filter(stock_warehouse::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(ServiceError::Conflict(
            "warehouse name and code must be unique per company".to_string(),
        ));
    }
    Ok(())
}

async fn create_location<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    parent_id: Option<i32>,
    usage: LocationUsage,
    company_id: Option<i32>,
    active: bool,
) -> Result<stock_location::Model, ServiceError> {
    Ok(stock_location::ActiveModel {
        name: Set(name.to_string()),
        parent_id: Set(parent_id),
        usage: Set(usage),
        company_id: Set(company_id),
        barcode: Set(None),
        active: Set(active),
        reference: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

struct SequenceSpec {
    name_part: &'static str,
    prefix_part: &'static str,
}

const SEQUENCE_SPECS: [(PickingSlot, SequenceSpec); 5] = [
    (
        PickingSlot::In,
        SequenceSpec {
            name_part: "Sequence in",
            prefix_part: "IN",
        },
    ),
    (
        PickingSlot::Int,
        SequenceSpec {
            name_part: "Sequence internal",
            prefix_part: "INT",
        },
    ),
    (
        PickingSlot::Pick,
        SequenceSpec {
            name_part: "Sequence picking",
            prefix_part: "PICK",
        },
    ),
    (
        PickingSlot::Pack,
        SequenceSpec {
            name_part: "Sequence packing",
            prefix_part: "PACK",
        },
    ),
    (
        PickingSlot::Out,
        SequenceSpec {
            name_part: "Sequence out",
            prefix_part: "OUT",
        },
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickingSlot {
    In,
    Int,
    Pick,
    Pack,
    Out,
}

impl PickingSlot {
    /// Deterministic per-warehouse UI ordering, replacing a global
    /// max-plus-one scan that races under concurrent creation.
    fn ui_sequence(self, warehouse_id: i32) -> i32 {
        let offset = match self {
            PickingSlot::In => 1,
            PickingSlot::Int => 2,
            PickingSlot::Pick => 3,
            PickingSlot::Pack => 4,
            PickingSlot::Out => 5,
        };
        warehouse_id * 10 + offset
    }
}

fn sequence_name(warehouse_name: &str, spec: &SequenceSpec) -> String {
    format!("{} {}", warehouse_name, spec.name_part)
}

fn sequence_prefix(code: &str, spec: &SequenceSpec) -> String {
    format!("{}/{}/", code, spec.prefix_part)
}

impl WarehouseService {
    pub fn new(db: Arc<DatabaseConnection>, events: Arc<EventSender>) -> Self {
        Self { db, events }
    }

    pub async fn list(
        &self,
        include_archived: bool,
    ) -> Result<Vec<stock_warehouse::Model>, ServiceError> {
        let mut query = stock_warehouse::Entity::find();
        if !include_archived {
            query = query.filter(stock_warehouse::Column::Active.eq(true));
        }
        Ok(query
            .order_by_asc(stock_warehouse::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<stock_warehouse::Model, ServiceError> {
        stock_warehouse::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("warehouse {} not found", id)))
    }

    /// All routes a warehouse takes part in: its linked selectable routes,
    /// the routes resupplying it, and the global replenish route when the
    /// warehouse carries a rule on it.
    pub async fn warehouse_routes(&self, id: i32) -> Result<Vec<RouteWithRules>, ServiceError> {
        let conn = self.db.as_ref();
        let warehouse = self.get(id).await?;

        let mut route_ids: Vec<i32> = route_warehouse::Entity::find()
            .filter(route_warehouse::Column::WarehouseId.eq(id))
            .all(conn)
            .await?
            .into_iter()
            .map(|link| link.route_id)
            .collect();
        for route in stock_route::Entity::find()
            .filter(stock_route::Column::SuppliedWhId.eq(id))
            .all(conn)
            .await?
        {
            if !route_ids.contains(&route.id) {
                route_ids.push(route.id);
            }
        }
        if let Some(rule_id) = warehouse.mto_rule_id {
            if let Some(rule) = stock_rule::Entity::find_by_id(rule_id).one(conn).await? {
                if !route_ids.contains(&rule.route_id) {
                    route_ids.push(rule.route_id);
                }
            }
        }

        let mut out = Vec::with_capacity(route_ids.len());
        for route_id in route_ids {
            let Some(route) = stock_route::Entity::find_by_id(route_id).one(conn).await? else {
                continue;
            };
            let rules = stock_rule::Entity::find()
                .filter(stock_rule::Column::RouteId.eq(route_id))
                .order_by_asc(stock_rule::Column::Id)
                .all(conn)
                .await?;
            out.push(RouteWithRules { route, rules });
        }
        Ok(out)
    }

    #[instrument(skip(self, req), fields(code = %req.code))]
    pub async fn create(
        &self,
        req: CreateWarehouse,
    ) -> Result<stock_warehouse::Model, ServiceError> {
        validate_name_and_code(&req.name, &req.code)?;
        if req.resupply_wh_ids.iter().any(|&id| id < 1) {
            return Err(ServiceError::InvalidInput(
                "resupply warehouse ids must be positive".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        check_unique(&txn, req.company_id, &req.name, &req.code, None).await?;

        let root = refs::location_by_reference(&txn, refs::LOCATION_ROOT)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError("physical locations root is missing".to_string())
            })?;

        // View parent plus the five sub-locations, sized for the maximum
        // configuration; unused intermediates start archived.
        let view = create_location(
            &txn,
            &req.code,
            Some(root.id),
            LocationUsage::View,
            Some(req.company_id),
            true,
        )
        .await?;
        let lot_stock = create_location(
            &txn,
            "Stock",
            Some(view.id),
            LocationUsage::Internal,
            Some(req.company_id),
            true,
        )
        .await?;
        let input = create_location(
            &txn,
            "Input",
            Some(view.id),
            LocationUsage::Internal,
            Some(req.company_id),
            req.reception_steps != ReceptionSteps::OneStep,
        )
        .await?;
        let qc = create_location(
            &txn,
            "Quality Control",
            Some(view.id),
            LocationUsage::Internal,
            Some(req.company_id),
            req.reception_steps == ReceptionSteps::ThreeSteps,
        )
        .await?;
        let output = create_location(
            &txn,
            "Output",
            Some(view.id),
            LocationUsage::Internal,
            Some(req.company_id),
            req.delivery_steps != DeliverySteps::ShipOnly,
        )
        .await?;
        let pack = create_location(
            &txn,
            "Packing Zone",
            Some(view.id),
            LocationUsage::Internal,
            Some(req.company_id),
            req.delivery_steps == DeliverySteps::PickPackShip,
        )
        .await?;

        let warehouse = stock_warehouse::ActiveModel {
            name: Set(req.name.clone()),
            code: Set(req.code.clone()),
            company_id: Set(req.company_id),
            active: Set(true),
            reception_steps: Set(req.reception_steps),
            delivery_steps: Set(req.delivery_steps),
            view_location_id: Set(Some(view.id)),
            lot_stock_location_id: Set(Some(lot_stock.id)),
            input_location_id: Set(Some(input.id)),
            qc_location_id: Set(Some(qc.id)),
            output_location_id: Set(Some(output.id)),
            pack_location_id: Set(Some(pack.id)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let warehouse = self
            .create_sequences_and_picking_types(&txn, warehouse, &lot_stock, &input, &output, &pack)
            .await?;

        let mut topo = WarehouseTopology::load(&txn, warehouse).await?;
        routing::update_picking_types(&txn, &topo).await?;
        let builtin = routing::sync_builtin_routes(&txn, &topo).await?;
        let mut am: stock_warehouse::ActiveModel = topo.warehouse.clone().into();
        am.reception_route_id = Set(Some(builtin.reception_route_id));
        am.delivery_route_id = Set(Some(builtin.delivery_route_id));
        am.crossdock_route_id = Set(Some(builtin.crossdock_route_id));
        topo.warehouse = am.update(&txn).await?;
        let mto_rule_id = routing::sync_mto_rule(&txn, &topo).await?;
        let mut am: stock_warehouse::ActiveModel = topo.warehouse.clone().into();
        am.mto_rule_id = Set(mto_rule_id);
        topo.warehouse = am.update(&txn).await?;

        let mut events = vec![Event::WarehouseCreated(topo.warehouse.id)];
        for supplier_id in &req.resupply_wh_ids {
            self.add_resupply_supplier(&txn, &topo, *supplier_id, &mut events)
                .await?;
        }

        let warehouse = topo.warehouse;
        txn.commit().await?;
        info!(warehouse_id = warehouse.id, code = %warehouse.code, "warehouse created");
        for event in events {
            self.events.send_or_log(event).await;
        }
        Ok(warehouse)
    }

    async fn create_sequences_and_picking_types(
        &self,
        txn: &impl ConnectionTrait,
        warehouse: stock_warehouse::Model,
        lot_stock: &stock_location::Model,
        input: &stock_location::Model,
        output: &stock_location::Model,
        pack: &stock_location::Model,
    ) -> Result<stock_warehouse::Model, ServiceError> {
        let input_loc = match warehouse.reception_steps {
            ReceptionSteps::OneStep => lot_stock.id,
            _ => input.id,
        };
        let output_loc = match warehouse.delivery_steps {
            DeliverySteps::ShipOnly => lot_stock.id,
            _ => output.id,
        };

        let mut type_ids = Vec::with_capacity(5);
        for (slot, spec) in &SEQUENCE_SPECS {
            let sequence = picking_sequence::ActiveModel {
                name: Set(sequence_name(&warehouse.name, spec)),
                prefix: Set(sequence_prefix(&warehouse.code, spec)),
                padding: Set(5),
                next_number: Set(1),
                company_id: Set(Some(warehouse.company_id)),
                ..Default::default()
            }
            .insert(txn)
            .await?;

            let (name, code, src, dest, active) = match slot {
                PickingSlot::In => ("Receipts", PickingCode::Incoming, None, Some(input_loc), true),
                PickingSlot::Int => (
                    "Internal Transfers",
                    PickingCode::Internal,
                    Some(lot_stock.id),
                    Some(lot_stock.id),
                    warehouse.reception_steps != ReceptionSteps::OneStep
                        || warehouse.delivery_steps != DeliverySteps::ShipOnly,
                ),
                PickingSlot::Pick => (
                    "Pick",
                    PickingCode::Internal,
                    Some(lot_stock.id),
                    Some(match warehouse.delivery_steps {
                        DeliverySteps::PickShip => output.id,
                        _ => pack.id,
                    }),
                    warehouse.delivery_steps != DeliverySteps::ShipOnly,
                ),
                PickingSlot::Pack => (
                    "Pack",
                    PickingCode::Internal,
                    Some(pack.id),
                    Some(output_loc),
                    warehouse.delivery_steps == DeliverySteps::PickPackShip,
                ),
                PickingSlot::Out => (
                    "Delivery Orders",
                    PickingCode::Outgoing,
                    Some(output_loc),
                    None,
                    true,
                ),
            };

            let picking_type = stock_picking_type::ActiveModel {
                name: Set(name.to_string()),
                code: Set(code),
                warehouse_id: Set(warehouse.id),
                sequence: Set(slot.ui_sequence(warehouse.id)),
                sequence_id: Set(Some(sequence.id)),
                default_location_src_id: Set(src),
                default_location_dest_id: Set(dest),
                return_picking_type_id: Set(None),
                active: Set(active),
                ..Default::default()
            }
            .insert(txn)
            .await?;
            type_ids.push((*slot, picking_type.id));
        }

        let type_id = |slot: PickingSlot| -> i32 {
            type_ids
                .iter()
                .find(|(s, _)| *s == slot)
                .map(|(_, id)| *id)
                .unwrap_or_default()
        };

        // Incoming and outgoing are each other's return types.
        let in_id = type_id(PickingSlot::In);
        let out_id = type_id(PickingSlot::Out);
        stock_picking_type::Entity::update_many()
            .col_expr(
                stock_picking_type::Column::ReturnPickingTypeId,
                Expr::value(out_id),
            )
            .filter(stock_picking_type::Column::Id.eq(in_id))
            .exec(txn)
            .await?;
        stock_picking_type::Entity::update_many()
            .col_expr(
                stock_picking_type::Column::ReturnPickingTypeId,
                Expr::value(in_id),
            )
            .filter(stock_picking_type::Column::Id.eq(out_id))
            .exec(txn)
            .await?;

        let mut am: stock_warehouse::ActiveModel = warehouse.into();
        am.in_type_id = Set(Some(in_id));
        am.int_type_id = Set(Some(type_id(PickingSlot::Int)));
        am.pick_type_id = Set(Some(type_id(PickingSlot::Pick)));
        am.pack_type_id = Set(Some(type_id(PickingSlot::Pack)));
        am.out_type_id = Set(Some(out_id));
        Ok(am.update(txn).await?)
    }

    async fn add_resupply_supplier(
        &self,
        txn: &impl ConnectionTrait,
        supplied: &WarehouseTopology,
        supplier_id: i32,
        events: &mut Vec<Event>,
    ) -> Result<(), ServiceError> {
        if supplier_id == supplied.warehouse.id {
            return Err(ServiceError::ValidationError(
                "a warehouse cannot resupply itself".to_string(),
            ));
        }
        let supplier = stock_warehouse::Entity::find_by_id(supplier_id)
            .one(txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("resupply warehouse {} not found", supplier_id))
            })?;
        let supplier_topo = WarehouseTopology::load(txn, supplier).await?;

        match resupply::create_resupply_route(txn, supplied, &supplier_topo).await? {
            ResupplyOutcome::Created(route_id) => events.push(Event::ResupplyRouteCreated {
                supplied_wh_id: supplied.warehouse.id,
                supplier_wh_id: supplier_id,
                route_id,
            }),
            ResupplyOutcome::Reactivated(route_id) => {
                events.push(Event::ResupplyRouteReactivated {
                    supplied_wh_id: supplied.warehouse.id,
                    supplier_wh_id: supplier_id,
                    route_id,
                })
            }
            ResupplyOutcome::Skipped => {}
        }

        let link = warehouse_resupply::Entity::find_by_id((supplied.warehouse.id, supplier_id))
            .one(txn)
            .await?;
        if link.is_none() {
            warehouse_resupply::ActiveModel {
                supplied_wh_id: Set(supplied.warehouse.id),
                supplier_wh_id: Set(supplier_id),
            }
            .insert(txn)
            .await?;
        }
        Ok(())
    }

    #[instrument(skip(self, req))]
    pub async fn update(
        &self,
        id: i32,
        req: UpdateWarehouse,
    ) -> Result<stock_warehouse::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let warehouse = stock_warehouse::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("warehouse {} not found", id)))?;

        let new_name = req.name.clone().unwrap_or_else(|| warehouse.name.clone());
        let new_code = req.code.clone().unwrap_or_else(|| warehouse.code.clone());
        validate_name_and_code(&new_name, &new_code)?;
        if req.name.is_some() || req.code.is_some() {
            check_unique(&txn, warehouse.company_id, &new_name, &new_code, Some(id)).await?;
        }

        let old_reception = warehouse.reception_steps;
        let old_delivery = warehouse.delivery_steps;
        let new_reception = req.reception_steps.unwrap_or(old_reception);
        let new_delivery = req.delivery_steps.unwrap_or(old_delivery);
        let reception_changed = new_reception != old_reception;
        let delivery_changed = new_delivery != old_delivery;

        if req.name.is_some() || req.code.is_some() {
            self.rename_cascade(&txn, &warehouse, &new_name, &new_code)
                .await?;
        }

        let warehouse = if reception_changed || delivery_changed {
            let warehouse = self.ensure_intermediate_locations(&txn, warehouse).await?;
            if reception_changed {
                self.toggle_reception_locations(&txn, &warehouse, new_reception)
                    .await?;
            }
            if delivery_changed {
                self.toggle_delivery_locations(&txn, &warehouse, new_delivery)
                    .await?;
            }
            warehouse
        } else {
            warehouse
        };

        let mut am: stock_warehouse::ActiveModel = warehouse.clone().into();
        am.name = Set(new_name);
        am.code = Set(new_code);
        am.reception_steps = Set(new_reception);
        am.delivery_steps = Set(new_delivery);
        let warehouse = am.update(&txn).await?;

        let mut events = vec![Event::WarehouseUpdated(id)];
        let mut topo = WarehouseTopology::load(&txn, warehouse).await?;

        if reception_changed || delivery_changed {
            routing::update_picking_types(&txn, &topo).await?;
            let builtin = routing::sync_builtin_routes(&txn, &topo).await?;
            let mut am: stock_warehouse::ActiveModel = topo.warehouse.clone().into();
            am.reception_route_id = Set(Some(builtin.reception_route_id));
            am.delivery_route_id = Set(Some(builtin.delivery_route_id));
            am.crossdock_route_id = Set(Some(builtin.crossdock_route_id));
            topo.warehouse = am.update(&txn).await?;
            let mto_rule_id = routing::sync_mto_rule(&txn, &topo).await?;
            let mut am: stock_warehouse::ActiveModel = topo.warehouse.clone().into();
            am.mto_rule_id = Set(mto_rule_id);
            topo.warehouse = am.update(&txn).await?;
            events.push(Event::RoutesSynchronized { warehouse_id: id });

            // Resupply rules terminate at the transit location and must
            // follow the warehouse's boundary location when the step count
            // crosses the single-step line.
            if reception_changed
                && (old_reception == ReceptionSteps::OneStep
                    || new_reception == ReceptionSteps::OneStep)
            {
                resupply::sync_reception_resupply(&txn, &topo).await?;
            }
            if delivery_changed
                && (old_delivery == DeliverySteps::ShipOnly
                    || new_delivery == DeliverySteps::ShipOnly)
            {
                let change_to_multiple = old_delivery == DeliverySteps::ShipOnly;
                resupply::sync_delivery_resupply(&txn, &topo, change_to_multiple).await?;
            }
        }

        if let Some(new_set) = &req.resupply_wh_ids {
            self.diff_resupply_set(&txn, &topo, new_set, &mut events)
                .await?;
        }

        let warehouse = topo.warehouse;
        txn.commit().await?;
        for event in events {
            self.events.send_or_log(event).await;
        }
        Ok(warehouse)
    }

    /// Warehouses predating the full location set get their missing
    /// intermediates created on demand, archived until a step needs them.
    async fn ensure_intermediate_locations(
        &self,
        txn: &impl ConnectionTrait,
        warehouse: stock_warehouse::Model,
    ) -> Result<stock_warehouse::Model, ServiceError> {
        let needed = [
            warehouse.input_location_id,
            warehouse.qc_location_id,
            warehouse.output_location_id,
            warehouse.pack_location_id,
        ];
        if needed.iter().all(Option::is_some) {
            return Ok(warehouse);
        }
        let parent = warehouse.view_location_id;
        let company = Some(warehouse.company_id);
        let mut am: stock_warehouse::ActiveModel = warehouse.clone().into();
        if warehouse.input_location_id.is_none() {
            let loc =
                create_location(txn, "Input", parent, LocationUsage::Internal, company, false)
                    .await?;
            am.input_location_id = Set(Some(loc.id));
        }
        if warehouse.qc_location_id.is_none() {
            let loc = create_location(
                txn,
                "Quality Control",
                parent,
                LocationUsage::Internal,
                company,
                false,
            )
            .await?;
            am.qc_location_id = Set(Some(loc.id));
        }
        if warehouse.output_location_id.is_none() {
            let loc =
                create_location(txn, "Output", parent, LocationUsage::Internal, company, false)
                    .await?;
            am.output_location_id = Set(Some(loc.id));
        }
        if warehouse.pack_location_id.is_none() {
            let loc = create_location(
                txn,
                "Packing Zone",
                parent,
                LocationUsage::Internal,
                company,
                false,
            )
            .await?;
            am.pack_location_id = Set(Some(loc.id));
        }
        Ok(am.update(txn).await?)
    }

    /// Cosmetic cascade: route and rule display names get a first-occurrence
    /// substitution of the old warehouse name, the view location is renamed
    /// after the code, and the numbering sequences are rebuilt from the new
    /// name and code. Identifiers and relationships are untouched.
    async fn rename_cascade(
        &self,
        txn: &impl ConnectionTrait,
        warehouse: &stock_warehouse::Model,
        new_name: &str,
        new_code: &str,
    ) -> Result<(), ServiceError> {
        if new_code != warehouse.code {
            if let Some(view_id) = warehouse.view_location_id {
                if let Some(view) = stock_location::Entity::find_by_id(view_id).one(txn).await? {
                    let mut am: stock_location::ActiveModel = view.into();
                    am.name = Set(new_code.to_string());
                    am.update(txn).await?;
                }
            }
        }

        if new_name != warehouse.name {
            let mut route_ids: Vec<i32> = route_warehouse::Entity::find()
                .filter(route_warehouse::Column::WarehouseId.eq(warehouse.id))
                .all(txn)
                .await?
                .into_iter()
                .map(|link| link.route_id)
                .collect();
            for route in stock_route::Entity::find()
                .filter(stock_route::Column::SuppliedWhId.eq(warehouse.id))
                .all(txn)
                .await?
            {
                if !route_ids.contains(&route.id) {
                    route_ids.push(route.id);
                }
            }
            for route_id in route_ids {
                let Some(route) = stock_route::Entity::find_by_id(route_id).one(txn).await? else {
                    continue;
                };
                let renamed = route.name.replacen(&warehouse.name, new_name, 1);
                if renamed != route.name {
                    let mut am: stock_route::ActiveModel = route.into();
                    am.name = Set(renamed);
                    am.update(txn).await?;
                }
                for rule in stock_rule::Entity::find()
                    .filter(stock_rule::Column::RouteId.eq(route_id))
                    .all(txn)
                    .await?
                {
                    let renamed = rule.name.replacen(&warehouse.name, new_name, 1);
                    if renamed != rule.name {
                        let mut am: stock_rule::ActiveModel = rule.into();
                        am.name = Set(renamed);
                        am.update(txn).await?;
                    }
                }
            }
        }

        let type_ids = [
            warehouse.in_type_id,
            warehouse.int_type_id,
            warehouse.pick_type_id,
            warehouse.pack_type_id,
            warehouse.out_type_id,
        ];
        for ((_, spec), type_id) in SEQUENCE_SPECS.iter().zip(type_ids) {
            let Some(type_id) = type_id else { continue };
            let Some(picking_type) = stock_picking_type::Entity::find_by_id(type_id)
                .one(txn)
                .await?
            else {
                continue;
            };
            let Some(sequence_id) = picking_type.sequence_id else {
                continue;
            };
            if let Some(sequence) = picking_sequence::Entity::find_by_id(sequence_id)
                .one(txn)
                .await?
            {
                let mut am: picking_sequence::ActiveModel = sequence.into();
                am.name = Set(sequence_name(new_name, spec));
                am.prefix = Set(sequence_prefix(new_code, spec));
                am.update(txn).await?;
            }
        }
        Ok(())
    }

    /// A location referenced by rules outside the warehouse's own routing
    /// (built-in routes, the global replenish route, resupply routes it takes
    /// part in) must stay active when steps change.
    async fn location_used_elsewhere(
        &self,
        txn: &impl ConnectionTrait,
        warehouse: &stock_warehouse::Model,
        location_id: Option<i32>,
    ) -> Result<bool, ServiceError> {
        let Some(location_id) = location_id else {
            return Ok(false);
        };
        let mut own_routes: Vec<i32> = [
            warehouse.reception_route_id,
            warehouse.delivery_route_id,
            warehouse.crossdock_route_id,
        ]
        .into_iter()
        .flatten()
        .collect();
        if let Some(route) = refs::mto_route(txn).await? {
            own_routes.push(route.id);
        }
        for route in stock_route::Entity::find()
            .filter(
                stock_route::Column::SuppliedWhId
                    .eq(warehouse.id)
                    .or(stock_route::Column::SupplierWhId.eq(warehouse.id)),
            )
            .all(txn)
            .await?
        {
            own_routes.push(route.id);
        }

        let count = stock_rule::Entity::find()
            .filter(stock_rule::Column::RouteId.is_not_in(own_routes))
            .filter(
                stock_rule::Column::LocationSrcId
                    .eq(location_id)
                    .or(stock_rule::Column::LocationDestId.eq(location_id)),
            )
            .count(txn)
            .await?;
        Ok(count > 0)
    }

    async fn set_location_active(
        &self,
        txn: &impl ConnectionTrait,
        location_id: Option<i32>,
        active: bool,
    ) -> Result<(), ServiceError> {
        let Some(location_id) = location_id else {
            return Ok(());
        };
        stock_location::Entity::update_many()
            .col_expr(stock_location::Column::Active, Expr::value(active))
            .filter(stock_location::Column::Id.eq(location_id))
            .exec(txn)
            .await?;
        Ok(())
    }

    async fn toggle_reception_locations(
        &self,
        txn: &impl ConnectionTrait,
        warehouse: &stock_warehouse::Model,
        new_steps: ReceptionSteps,
    ) -> Result<(), ServiceError> {
        if !self
            .location_used_elsewhere(txn, warehouse, warehouse.input_location_id)
            .await?
        {
            self.set_location_active(txn, warehouse.input_location_id, false)
                .await?;
            self.set_location_active(txn, warehouse.qc_location_id, false)
                .await?;
        }
        if new_steps == ReceptionSteps::ThreeSteps {
            self.set_location_active(txn, warehouse.qc_location_id, true)
                .await?;
        }
        if new_steps != ReceptionSteps::OneStep {
            self.set_location_active(txn, warehouse.input_location_id, true)
                .await?;
        }
        Ok(())
    }

    async fn toggle_delivery_locations(
        &self,
        txn: &impl ConnectionTrait,
        warehouse: &stock_warehouse::Model,
        new_steps: DeliverySteps,
    ) -> Result<(), ServiceError> {
        if !self
            .location_used_elsewhere(txn, warehouse, warehouse.output_location_id)
            .await?
        {
            self.set_location_active(txn, warehouse.output_location_id, false)
                .await?;
        }
        if !self
            .location_used_elsewhere(txn, warehouse, warehouse.pack_location_id)
            .await?
        {
            self.set_location_active(txn, warehouse.pack_location_id, false)
                .await?;
        }
        if new_steps == DeliverySteps::PickPackShip {
            self.set_location_active(txn, warehouse.pack_location_id, true)
                .await?;
        }
        if new_steps != DeliverySteps::ShipOnly {
            self.set_location_active(txn, warehouse.output_location_id, true)
                .await?;
        }
        Ok(())
    }

    async fn diff_resupply_set(
        &self,
        txn: &impl ConnectionTrait,
        topo: &WarehouseTopology,
        new_set: &[i32],
        events: &mut Vec<Event>,
    ) -> Result<(), ServiceError> {
        let old_set: Vec<i32> = warehouse_resupply::Entity::find()
            .filter(warehouse_resupply::Column::SuppliedWhId.eq(topo.warehouse.id))
            .all(txn)
            .await?
            .into_iter()
            .map(|link| link.supplier_wh_id)
            .collect();

        for supplier_id in new_set {
            if !old_set.contains(supplier_id) {
                self.add_resupply_supplier(txn, topo, *supplier_id, events)
                    .await?;
            }
        }
        for supplier_id in &old_set {
            if !new_set.contains(supplier_id) {
                if let Some(route_id) =
                    resupply::archive_resupply_route(txn, topo.warehouse.id, *supplier_id).await?
                {
                    events.push(Event::ResupplyRouteArchived {
                        supplied_wh_id: topo.warehouse.id,
                        supplier_wh_id: *supplier_id,
                        route_id,
                    });
                }
                warehouse_resupply::Entity::delete_by_id((topo.warehouse.id, *supplier_id))
                    .exec(txn)
                    .await?;
            }
        }
        Ok(())
    }

    /// Archive a warehouse and everything derived from it. Refused while any
    /// in-flight stock move still references one of its operation types.
    #[instrument(skip(self))]
    pub async fn archive(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        let warehouse = stock_warehouse::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("warehouse {} not found", id)))?;
        if !warehouse.active {
            return Ok(());
        }

        let type_ids: Vec<i32> = stock_picking_type::Entity::find()
            .filter(stock_picking_type::Column::WarehouseId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        let in_flight = stock_move::Entity::find()
            .filter(stock_move::Column::PickingTypeId.is_in(type_ids.clone()))
            .filter(
                stock_move::Column::State
                    .ne(MoveState::Done)
                    .and(stock_move::Column::State.ne(MoveState::Cancelled)),
            )
            .count(&txn)
            .await?;
        if in_flight > 0 {
            return Err(ServiceError::ValidationError(format!(
                "cannot archive warehouse {}: {} stock moves are still in progress",
                warehouse.code, in_flight
            )));
        }

        if let Some(view_id) = warehouse.view_location_id {
            self.archive_location_subtree(&txn, view_id).await?;
        }

        stock_picking_type::Entity::update_many()
            .col_expr(stock_picking_type::Column::Active, Expr::value(false))
            .filter(stock_picking_type::Column::WarehouseId.eq(id))
            .exec(&txn)
            .await?;
        stock_rule::Entity::update_many()
            .col_expr(stock_rule::Column::Active, Expr::value(false))
            .filter(stock_rule::Column::WarehouseId.eq(id))
            .exec(&txn)
            .await?;

        // Selectable routes offered by this warehouse alone, plus the routes
        // resupplying it.
        for link in route_warehouse::Entity::find()
            .filter(route_warehouse::Column::WarehouseId.eq(id))
            .all(&txn)
            .await?
        {
            let other_offers = route_warehouse::Entity::find()
                .filter(route_warehouse::Column::RouteId.eq(link.route_id))
                .filter(route_warehouse::Column::WarehouseId.ne(id))
                .count(&txn)
                .await?;
            if other_offers == 0 {
                stock_route::Entity::update_many()
                    .col_expr(stock_route::Column::Active, Expr::value(false))
                    .filter(stock_route::Column::Id.eq(link.route_id))
                    .exec(&txn)
                    .await?;
            }
        }
        for link in warehouse_resupply::Entity::find()
            .filter(warehouse_resupply::Column::SuppliedWhId.eq(id))
            .all(&txn)
            .await?
        {
            resupply::archive_resupply_route(&txn, id, link.supplier_wh_id).await?;
        }

        let mut am: stock_warehouse::ActiveModel = warehouse.into();
        am.active = Set(false);
        am.update(&txn).await?;

        txn.commit().await?;
        self.events.send_or_log(Event::WarehouseArchived(id)).await;
        Ok(())
    }

    async fn archive_location_subtree(
        &self,
        txn: &impl ConnectionTrait,
        root_id: i32,
    ) -> Result<(), ServiceError> {
        let mut frontier = vec![root_id];
        while let Some(parent) = frontier.pop() {
            stock_location::Entity::update_many()
                .col_expr(stock_location::Column::Active, Expr::value(false))
                .filter(stock_location::Column::Id.eq(parent))
                .exec(txn)
                .await?;
            for child in stock_location::Entity::find()
                .filter(stock_location::Column::ParentId.eq(parent))
                .all(txn)
                .await?
            {
                frontier.push(child.id);
            }
        }
        Ok(())
    }

    /// Reverse an archive by re-deriving everything the current step
    /// configuration controls.
    #[instrument(skip(self))]
    pub async fn unarchive(&self, id: i32) -> Result<stock_warehouse::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let warehouse = stock_warehouse::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("warehouse {} not found", id)))?;

        let mut am: stock_warehouse::ActiveModel = warehouse.clone().into();
        am.active = Set(true);
        let warehouse = am.update(&txn).await?;

        self.set_location_active(&txn, warehouse.view_location_id, true)
            .await?;
        self.set_location_active(&txn, warehouse.lot_stock_location_id, true)
            .await?;
        self.set_location_active(
            &txn,
            warehouse.input_location_id,
            warehouse.reception_steps != ReceptionSteps::OneStep,
        )
        .await?;
        self.set_location_active(
            &txn,
            warehouse.qc_location_id,
            warehouse.reception_steps == ReceptionSteps::ThreeSteps,
        )
        .await?;
        self.set_location_active(
            &txn,
            warehouse.output_location_id,
            warehouse.delivery_steps != DeliverySteps::ShipOnly,
        )
        .await?;
        self.set_location_active(
            &txn,
            warehouse.pack_location_id,
            warehouse.delivery_steps == DeliverySteps::PickPackShip,
        )
        .await?;

        let mut topo = WarehouseTopology::load(&txn, warehouse).await?;
        routing::update_picking_types(&txn, &topo).await?;
        let builtin = routing::sync_builtin_routes(&txn, &topo).await?;
        let mut am: stock_warehouse::ActiveModel = topo.warehouse.clone().into();
        am.reception_route_id = Set(Some(builtin.reception_route_id));
        am.delivery_route_id = Set(Some(builtin.delivery_route_id));
        am.crossdock_route_id = Set(Some(builtin.crossdock_route_id));
        topo.warehouse = am.update(&txn).await?;
        let mto_rule_id = routing::sync_mto_rule(&txn, &topo).await?;
        let mut am: stock_warehouse::ActiveModel = topo.warehouse.clone().into();
        am.mto_rule_id = Set(mto_rule_id);
        topo.warehouse = am.update(&txn).await?;

        let mut events = vec![Event::WarehouseUnarchived(id)];
        let supplier_ids: Vec<i32> = warehouse_resupply::Entity::find()
            .filter(warehouse_resupply::Column::SuppliedWhId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|link| link.supplier_wh_id)
            .collect();
        for supplier_id in supplier_ids {
            self.add_resupply_supplier(&txn, &topo, supplier_id, &mut events)
                .await?;
        }

        let warehouse = topo.warehouse;
        txn.commit().await?;
        for event in events {
            self.events.send_or_log(event).await;
        }
        Ok(warehouse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_length_is_bounded() {
        assert!(validate_name_and_code("Main", "WH").is_ok());
        assert!(validate_name_and_code("Main", "WHOUSE").is_err());
        assert!(validate_name_and_code("Main", "").is_err());
        assert!(validate_name_and_code("  ", "WH").is_err());
    }

    #[test]
    fn ui_sequence_is_deterministic_per_warehouse() {
        assert_eq!(PickingSlot::In.ui_sequence(3), 31);
        assert_eq!(PickingSlot::Out.ui_sequence(3), 35);
        assert!(PickingSlot::Out.ui_sequence(3) < PickingSlot::In.ui_sequence(4));
    }

    #[test]
    fn sequence_values_carry_name_and_code() {
        let (_, spec) = &SEQUENCE_SPECS[0];
        assert_eq!(sequence_name("Main Warehouse", spec), "Main Warehouse Sequence in");
        assert_eq!(sequence_prefix("WH", spec), "WH/IN/");
    }
}
