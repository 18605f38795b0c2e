use axum::{
    extract::{Path, State},
    Json,
};

use kernel::model::id::UserId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::user::{UserResponse, UsersResponse},
};

pub async fn show_current_user(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserResponse>> {
    registry
        .user_repository()
        .find_by_id(user.id(), user.group_id())
        .await
        .and_then(|found| match found {
            Some(u) => Ok(Json(u.into())),
            None => Err(AppError::EntityNotFound("user not found".into())),
        })
}

pub async fn show_user_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UsersResponse>> {
    registry
        .user_repository()
        .find_all_in_group(user.group_id())
        .await
        .map(UsersResponse::from)
        .map(Json)
}

// 同じグループのユーザーのみ参照できる
pub async fn show_user(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserResponse>> {
    registry
        .user_repository()
        .find_by_id(user_id, user.group_id())
        .await
        .and_then(|found| match found {
            Some(u) => Ok(Json(u.into())),
            None => Err(AppError::EntityNotFound("user not found".into())),
        })
}
