pub mod companies;
pub mod refs;
pub mod resupply;
pub mod routing;
pub mod warehouses;
