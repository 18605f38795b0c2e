use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::user::{show_current_user, show_user, show_user_list};

pub fn build_user_routers() -> Router<AppRegistry> {
    let user_routers = Router::new()
        .route("/", get(show_user_list))
        .route("/me", get(show_current_user))
        .route("/:user_id", get(show_user));

    Router::new().nest("/users", user_routers)
}
