pub mod fuel_log;
pub mod reservation;
pub mod rule;
pub mod user;
