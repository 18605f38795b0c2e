pub mod auth;
pub mod event;
pub mod fuel_log;
pub mod id;
pub mod reservation;
pub mod rule;
pub mod user;
