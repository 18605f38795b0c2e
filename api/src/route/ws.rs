use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::ws::connect_ws;

pub fn build_ws_routers() -> Router<AppRegistry> {
    Router::new().route("/ws", get(connect_ws))
}
