use axum::Router;
use registry::AppRegistry;

use super::{
    fuel_log::build_fuel_log_routers, health::build_health_check_routers,
    reservation::build_reservation_routers, rule::build_rule_routers, user::build_user_routers,
    ws::build_ws_routers,
};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_reservation_routers())
        .merge(build_rule_routers())
        .merge(build_user_routers())
        .merge(build_fuel_log_routers())
        .merge(build_ws_routers());
    Router::new().nest("/api/v1", router)
}
