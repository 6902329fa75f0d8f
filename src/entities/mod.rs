pub mod company;
pub mod picking_sequence;
pub mod route_warehouse;
pub mod stock_location;
pub mod stock_move;
pub mod stock_picking_type;
pub mod stock_route;
pub mod stock_rule;
pub mod stock_warehouse;
pub mod warehouse_resupply;
