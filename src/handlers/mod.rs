pub mod health;
pub mod parse_trip;
pub mod probe;
pub mod trips;
