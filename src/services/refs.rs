//! Lookups for the process-wide singleton records the routing engine depends
//! on: the location roots, the customer/supplier pseudo-locations, transit
//! locations and the global "Replenish on Order" route.
//!
//! All lookups deliberately include archived rows; several singletons (the
//! transit locations in particular) are seeded inactive and only activated on
//! first use.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::stock_location::{self, LocationUsage};
use crate::entities::{company, stock_route};
use crate::errors::ServiceError;

/// Root "Physical Locations" view under which warehouse view locations live.
pub const LOCATION_ROOT: &str = "location_root";
/// Root "Partner Locations" view for the customer/supplier pseudo-locations.
pub const PARTNER_LOCATIONS: &str = "partner_locations";
pub const CUSTOMER_LOCATION: &str = "customers";
pub const SUPPLIER_LOCATION: &str = "suppliers";
/// Shared transit location for resupply between warehouses of different companies.
pub const INTER_COMPANY_TRANSIT: &str = "inter_company_transit";
/// The global make-to-order route every warehouse's MTO rule belongs to.
pub const MTO_ROUTE: &str = "mto";
pub const MTO_ROUTE_NAME: &str = "Replenish on Order (MTO)";

pub async fn location_by_reference<C: ConnectionTrait>(
    conn: &C,
    reference: &str,
) -> Result<Option<stock_location::Model>, ServiceError> {
    Ok(stock_location::Entity::find()
        .filter(stock_location::Column::Reference.eq(reference))
        .one(conn)
        .await?)
}

async fn location_by_usage<C: ConnectionTrait>(
    conn: &C,
    usage: LocationUsage,
) -> Result<Option<stock_location::Model>, ServiceError> {
    Ok(stock_location::Entity::find()
        .filter(stock_location::Column::Usage.eq(usage))
        .order_by_asc(stock_location::Column::Id)
        .one(conn)
        .await?)
}

/// The customer and supplier pseudo-locations bounding every routing chain.
/// Seeded by the migrator; the usage-based fallback covers databases that
/// were provisioned without the seed references.
pub async fn partner_locations<C: ConnectionTrait>(
    conn: &C,
) -> Result<(stock_location::Model, stock_location::Model), ServiceError> {
    let customer = match location_by_reference(conn, CUSTOMER_LOCATION).await? {
        Some(loc) => Some(loc),
        None => location_by_usage(conn, LocationUsage::Customer).await?,
    };
    let supplier = match location_by_reference(conn, SUPPLIER_LOCATION).await? {
        Some(loc) => Some(loc),
        None => location_by_usage(conn, LocationUsage::Supplier).await?,
    };
    match (customer, supplier) {
        (Some(c), Some(s)) => Ok((c, s)),
        _ => Err(ServiceError::ValidationError(
            "Cannot find any customer or supplier location".to_string(),
        )),
    }
}

/// Transit locations usable for a resupply pair: the company's own internal
/// transit location and the shared inter-company one. Either may be absent.
pub async fn transit_locations<C: ConnectionTrait>(
    conn: &C,
    company_id: i32,
) -> Result<(Option<stock_location::Model>, Option<stock_location::Model>), ServiceError> {
    let internal = match company::Entity::find_by_id(company_id).one(conn).await? {
        Some(company) => match company.internal_transit_location_id {
            Some(loc_id) => stock_location::Entity::find_by_id(loc_id).one(conn).await?,
            None => None,
        },
        None => None,
    };
    let external = location_by_reference(conn, INTER_COMPANY_TRANSIT).await?;
    Ok((internal, external))
}

/// The global "Replenish on Order" route, when the replenishment feature is
/// present. Looked up by well-known reference first, then by name. A missing
/// route is not an error: callers degrade gracefully.
pub async fn mto_route<C: ConnectionTrait>(
    conn: &C,
) -> Result<Option<stock_route::Model>, ServiceError> {
    let by_ref = stock_route::Entity::find()
        .filter(stock_route::Column::Reference.eq(MTO_ROUTE))
        .one(conn)
        .await?;
    if by_ref.is_some() {
        return Ok(by_ref);
    }
    Ok(stock_route::Entity::find()
        .filter(stock_route::Column::Name.contains("Replenish on Order"))
        .order_by_asc(stock_route::Column::Id)
        .one(conn)
        .await?)
}
