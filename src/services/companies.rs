//! Company provisioning.
//!
//! Each company owns one internal transit location, created inactive and
//! activated the first time an intra-company resupply route needs it.

use std::sync::Arc;

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait};
use tracing::{info, instrument};

use crate::entities::stock_location::LocationUsage;
use crate::entities::{company, stock_location};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::refs;

#[derive(Clone)]
pub struct CompanyService {
    db: Arc<DatabaseConnection>,
    events: Arc<EventSender>,
}

impl CompanyService {
    pub fn new(db: Arc<DatabaseConnection>, events: Arc<EventSender>) -> Self {
        Self { db, events }
    }

    pub async fn list(&self) -> Result<Vec<company::Model>, ServiceError> {
        Ok(company::Entity::find()
            .order_by_asc(company::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<company::Model, ServiceError> {
        company::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("company {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<company::Model, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "company name must not be empty".to_string(),
            ));
        }
        let txn = self.db.begin().await?;

        let created = company::ActiveModel {
            name: Set(name.to_string()),
            internal_transit_location_id: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let parent = refs::location_by_reference(&txn, refs::PARTNER_LOCATIONS)
            .await?
            .map(|loc| loc.id);
        let transit = stock_location::ActiveModel {
            name: Set(format!("{}: Transit Location", name)),
            parent_id: Set(parent),
            usage: Set(LocationUsage::Transit),
            company_id: Set(Some(created.id)),
            barcode: Set(None),
            active: Set(false),
            reference: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut am: company::ActiveModel = created.into();
        am.internal_transit_location_id = Set(Some(transit.id));
        let created = am.update(&txn).await?;

        txn.commit().await?;
        info!(company_id = created.id, "company created");
        self.events
            .send_or_log(Event::CompanyCreated(created.id))
            .await;
        Ok(created)
    }
}
