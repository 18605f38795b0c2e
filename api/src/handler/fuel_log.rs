use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;

use kernel::model::event::GroupEvent;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    handler::publish_to_group,
    model::fuel_log::{
        CreateFuelLogRequest, CreateFuelLogRequestWithPrincipal, FuelLogListQuery,
        FuelLogResponse, FuelLogsResponse, UserFuelSummaryResponse,
    },
};

pub async fn register_fuel_log(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateFuelLogRequest>,
) -> AppResult<(StatusCode, Json<FuelLogResponse>)> {
    req.validate(&())?;

    let fuel_log = registry
        .fuel_log_repository()
        .create(CreateFuelLogRequestWithPrincipal::new(user.principal(), req).into())
        .await?;

    let res = FuelLogResponse::from(fuel_log);
    publish_to_group(
        &registry.broadcast_hub(),
        user.group_id(),
        GroupEvent::FuelLogCreated,
        &res,
    );

    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn show_fuel_log_list(
    user: AuthorizedUser,
    Query(query): Query<FuelLogListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<FuelLogsResponse>> {
    registry
        .fuel_log_repository()
        .find_all(user.group_id(), query.into())
        .await
        .map(FuelLogsResponse::from)
        .map(Json)
}

pub async fn show_fuel_summary(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserFuelSummaryResponse>> {
    registry
        .fuel_log_repository()
        .user_summary(user.id(), user.group_id())
        .await
        .map(UserFuelSummaryResponse::from)
        .map(Json)
}
