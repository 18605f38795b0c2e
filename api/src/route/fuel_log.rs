use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::fuel_log::{register_fuel_log, show_fuel_log_list, show_fuel_summary};

pub fn build_fuel_log_routers() -> Router<AppRegistry> {
    let fuel_log_routers = Router::new()
        .route("/", post(register_fuel_log))
        .route("/", get(show_fuel_log_list))
        .route("/summary", get(show_fuel_summary));

    Router::new().nest("/fuel-logs", fuel_log_routers)
}
