use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::stock_warehouse::{DeliverySteps, ReceptionSteps};
use crate::entities::{stock_route, stock_rule, stock_warehouse};
use crate::errors::ServiceError;
use crate::services::warehouses::{CreateWarehouse, RouteWithRules, UpdateWarehouse};
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct WarehouseListQuery {
    /// Include archived warehouses in the listing.
    pub include_archived: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WarehouseSummary {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub company_id: i32,
    pub active: bool,
    #[schema(value_type = String)]
    pub reception_steps: ReceptionSteps,
    #[schema(value_type = String)]
    pub delivery_steps: DeliverySteps,
    pub lot_stock_location_id: Option<i32>,
    pub reception_route_id: Option<i32>,
    pub delivery_route_id: Option<i32>,
    pub crossdock_route_id: Option<i32>,
    pub mto_rule_id: Option<i32>,
}

impl From<stock_warehouse::Model> for WarehouseSummary {
    fn from(model: stock_warehouse::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            company_id: model.company_id,
            active: model.active,
            reception_steps: model.reception_steps,
            delivery_steps: model.delivery_steps,
            lot_stock_location_id: model.lot_stock_location_id,
            reception_route_id: model.reception_route_id,
            delivery_route_id: model.delivery_route_id,
            crossdock_route_id: model.crossdock_route_id,
            mto_rule_id: model.mto_rule_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RuleSummary {
    pub id: i32,
    pub name: String,
    pub active: bool,
    pub action: String,
    pub procure_method: String,
    pub location_src_id: i32,
    pub location_dest_id: i32,
    pub picking_type_id: i32,
    pub propagate_cancel: bool,
}

impl From<stock_rule::Model> for RuleSummary {
    fn from(model: stock_rule::Model) -> Self {
        use sea_orm::ActiveEnum;
        Self {
            id: model.id,
            name: model.name,
            active: model.active,
            action: model.action.to_value(),
            procure_method: model.procure_method.to_value(),
            location_src_id: model.location_src_id,
            location_dest_id: model.location_dest_id,
            picking_type_id: model.picking_type_id,
            propagate_cancel: model.propagate_cancel,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RouteSummary {
    pub id: i32,
    pub name: String,
    pub active: bool,
    pub sequence: i32,
    pub supplied_wh_id: Option<i32>,
    pub supplier_wh_id: Option<i32>,
    pub rules: Vec<RuleSummary>,
}

impl From<RouteWithRules> for RouteSummary {
    fn from(item: RouteWithRules) -> Self {
        let stock_route::Model {
            id,
            name,
            active,
            sequence,
            supplied_wh_id,
            supplier_wh_id,
            ..
        } = item.route;
        Self {
            id,
            name,
            active,
            sequence,
            supplied_wh_id,
            supplier_wh_id,
            rules: item.rules.into_iter().map(RuleSummary::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWarehouseRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, max = 5, message = "Code must be 1 to 5 characters"))]
    pub code: String,
    pub company_id: i32,
    #[schema(value_type = Option<String>)]
    pub reception_steps: Option<ReceptionSteps>,
    #[schema(value_type = Option<String>)]
    pub delivery_steps: Option<DeliverySteps>,
    pub resupply_warehouse_ids: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateWarehouseRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 5, message = "Code must be 1 to 5 characters"))]
    pub code: Option<String>,
    #[schema(value_type = Option<String>)]
    pub reception_steps: Option<ReceptionSteps>,
    #[schema(value_type = Option<String>)]
    pub delivery_steps: Option<DeliverySteps>,
    pub resupply_warehouse_ids: Option<Vec<i32>>,
}

pub async fn list_warehouses(
    State(state): State<AppState>,
    Query(query): Query<WarehouseListQuery>,
) -> ApiResult<Vec<WarehouseSummary>> {
    let warehouses = state
        .services
        .warehouses
        .list(query.include_archived.unwrap_or(false))
        .await?;
    Ok(Json(ApiResponse::success(
        warehouses.into_iter().map(WarehouseSummary::from).collect(),
    )))
}

pub async fn get_warehouse(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<WarehouseSummary> {
    let warehouse = state.services.warehouses.get(id).await?;
    Ok(Json(ApiResponse::success(WarehouseSummary::from(warehouse))))
}

pub async fn create_warehouse(
    State(state): State<AppState>,
    Json(payload): Json<CreateWarehouseRequest>,
) -> ApiResult<WarehouseSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let warehouse = state
        .services
        .warehouses
        .create(CreateWarehouse {
            name: payload.name,
            code: payload.code,
            company_id: payload.company_id,
            reception_steps: payload.reception_steps.unwrap_or(ReceptionSteps::OneStep),
            delivery_steps: payload.delivery_steps.unwrap_or(DeliverySteps::ShipOnly),
            resupply_wh_ids: payload.resupply_warehouse_ids.unwrap_or_default(),
        })
        .await?;
    Ok(Json(ApiResponse::success(WarehouseSummary::from(warehouse))))
}

pub async fn update_warehouse(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateWarehouseRequest>,
) -> ApiResult<WarehouseSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let warehouse = state
        .services
        .warehouses
        .update(
            id,
            UpdateWarehouse {
                name: payload.name,
                code: payload.code,
                reception_steps: payload.reception_steps,
                delivery_steps: payload.delivery_steps,
                resupply_wh_ids: payload.resupply_warehouse_ids,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(WarehouseSummary::from(warehouse))))
}

pub async fn archive_warehouse(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    state.services.warehouses.archive(id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "archived": id }),
    )))
}

pub async fn unarchive_warehouse(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<WarehouseSummary> {
    let warehouse = state.services.warehouses.unarchive(id).await?;
    Ok(Json(ApiResponse::success(WarehouseSummary::from(warehouse))))
}

pub async fn get_warehouse_routes(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<RouteSummary>> {
    let routes = state.services.warehouses.warehouse_routes(id).await?;
    Ok(Json(ApiResponse::success(
        routes.into_iter().map(RouteSummary::from).collect(),
    )))
}
