pub mod fuel_log;
pub mod health;
pub mod reservation;
pub mod rule;
pub mod user;
pub mod v1;
pub mod ws;
