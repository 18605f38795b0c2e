use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;

use kernel::model::{event::GroupEvent, id::ReservationId};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    handler::publish_to_group,
    model::reservation::{
        CancelReservationRequestWithIds, CreateReservationRequest,
        CreateReservationRequestWithPrincipal, ReservationListQuery, ReservationResponse,
        ReservationsResponse, UpdateReservationRequest, UpdateReservationRequestWithIds,
    },
};

pub async fn register_reservation(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate(&())?;

    let reservation = registry
        .reservation_repository()
        .create(CreateReservationRequestWithPrincipal::new(user.principal(), req).into())
        .await?;

    let res = ReservationResponse::from(reservation);
    publish_to_group(
        &registry.broadcast_hub(),
        user.group_id(),
        GroupEvent::ReservationCreated,
        &res,
    );

    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn show_reservation_list(
    user: AuthorizedUser,
    Query(query): Query<ReservationListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_all(user.group_id(), query.into())
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_repository()
        .find_by_id(reservation_id, user.group_id())
        .await
        .and_then(|reservation| match reservation {
            Some(r) => Ok(Json(r.into())),
            None => Err(AppError::EntityNotFound("reservation not found".into())),
        })
}

pub async fn update_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;

    let reservation = registry
        .reservation_repository()
        .update(UpdateReservationRequestWithIds::new(reservation_id, user.principal(), req).into())
        .await?;

    let res = ReservationResponse::from(reservation);
    publish_to_group(
        &registry.broadcast_hub(),
        user.group_id(),
        GroupEvent::ReservationUpdated,
        &res,
    );

    Ok(Json(res))
}

pub async fn delete_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let outcome = registry
        .reservation_repository()
        .cancel(CancelReservationRequestWithIds::new(reservation_id, user.principal()).into())
        .await?;

    // 冪等な再取消では状態が変わらないため通知しない
    if outcome.newly_cancelled {
        registry.broadcast_hub().publish(
            user.group_id(),
            &GroupEvent::ReservationDeleted { id: reservation_id },
        );
    }

    Ok(StatusCode::NO_CONTENT)
}
