pub mod availability_routes;
pub mod operator_routes;
pub mod trailer_routes;
pub mod trip_routes;
pub mod vehicle_routes;
