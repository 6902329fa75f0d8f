use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use stockflow_api::config::AppConfig;
use stockflow_api::entities::stock_move::MoveState;
use stockflow_api::entities::stock_warehouse::{DeliverySteps, ReceptionSteps};
use stockflow_api::entities::{stock_move, stock_rule, stock_warehouse};
use stockflow_api::events::{Event, EventSender};
use stockflow_api::services::warehouses::CreateWarehouse;
use stockflow_api::{app_router, db, AppState};

/// Id of the company seeded by the migrations.
#[allow(dead_code)]
pub const DEFAULT_COMPANY_ID: i32 = 1;

/// Application harness backed by a file-based SQLite database that lives in
/// a per-test temporary directory.
pub struct TestApp {
    pub state: AppState,
    router: axum::Router,
    _tmp: tempfile::TempDir,
    _event_rx: mpsc::Receiver<Event>,
}

impl TestApp {
    pub async fn new() -> Self {
        let tmp = tempfile::tempdir().expect("temp dir for test database");
        let db_path = tmp.path().join("stockflow_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = Arc::new(EventSender::new(event_tx));
        let state = AppState::new(Arc::new(pool), cfg, event_sender);
        let router = app_router(state.clone());

        Self {
            state,
            router,
            _tmp: tmp,
            _event_rx: event_rx,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.state.db.as_ref()
    }

    #[allow(dead_code)]
    pub async fn create_warehouse(
        &self,
        name: &str,
        code: &str,
        reception_steps: ReceptionSteps,
        delivery_steps: DeliverySteps,
    ) -> stock_warehouse::Model {
        self.state
            .services
            .warehouses
            .create(CreateWarehouse {
                name: name.to_string(),
                code: code.to_string(),
                company_id: DEFAULT_COMPANY_ID,
                reception_steps,
                delivery_steps,
                resupply_wh_ids: Vec::new(),
            })
            .await
            .expect("warehouse creation should succeed")
    }

    #[allow(dead_code)]
    pub async fn rules_of_route(&self, route_id: i32) -> Vec<stock_rule::Model> {
        stock_rule::Entity::find()
            .filter(stock_rule::Column::RouteId.eq(route_id))
            .all(self.db())
            .await
            .expect("rule query")
    }

    #[allow(dead_code)]
    pub async fn active_rules_of_route(&self, route_id: i32) -> Vec<stock_rule::Model> {
        stock_rule::Entity::find()
            .filter(stock_rule::Column::RouteId.eq(route_id))
            .filter(stock_rule::Column::Active.eq(true))
            .all(self.db())
            .await
            .expect("rule query")
    }

    #[allow(dead_code)]
    pub async fn insert_stock_move(
        &self,
        picking_type_id: i32,
        location_src_id: i32,
        location_dest_id: i32,
        state: MoveState,
    ) -> stock_move::Model {
        stock_move::ActiveModel {
            reference: Set("MOVE/TEST".to_string()),
            product: Set("WIDGET".to_string()),
            quantity: Set(1.0),
            picking_type_id: Set(picking_type_id),
            location_src_id: Set(location_src_id),
            location_dest_id: Set(location_dest_id),
            state: Set(state),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .expect("stock move insert")
    }

    #[allow(dead_code)]
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response<Body> {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("request build"),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("request build"),
        };
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }
}

#[allow(dead_code)]
pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

#[allow(dead_code)]
pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
