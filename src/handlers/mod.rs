use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::events::EventSender;
use crate::services::companies::CompanyService;
use crate::services::warehouses::WarehouseService;

pub mod companies;
pub mod warehouses;

/// Service instances shared through the application state.
#[derive(Clone)]
pub struct AppServices {
    pub warehouses: Arc<WarehouseService>,
    pub companies: Arc<CompanyService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, events: Arc<EventSender>) -> Self {
        Self {
            warehouses: Arc::new(WarehouseService::new(db.clone(), events.clone())),
            companies: Arc::new(CompanyService::new(db, events)),
        }
    }
}
