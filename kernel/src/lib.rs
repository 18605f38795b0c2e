pub mod broadcast;
pub mod model;
pub mod repository;
