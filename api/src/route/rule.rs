use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::rule::{
    delete_rule, register_rule, show_active_rule_list, show_rule_list, update_rule,
};

pub fn build_rule_routers() -> Router<AppRegistry> {
    let rule_routers = Router::new()
        .route("/", post(register_rule))
        .route("/", get(show_rule_list))
        .route("/active", get(show_active_rule_list))
        .route("/:rule_id", put(update_rule))
        .route("/:rule_id", delete(delete_rule));

    Router::new().nest("/rules", rule_routers)
}
