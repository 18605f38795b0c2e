use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;

use kernel::model::{id::RuleId, rule::event::DeleteRule};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::rule::{
        CreateRuleRequest, CreateRuleRequestWithGroupId, RuleResponse, RulesResponse,
        UpdateRuleRequest, UpdateRuleRequestWithIds,
    },
};

// ルールの作成・変更・削除は管理者のみが行える
fn require_admin(user: &AuthorizedUser) -> AppResult<()> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "admin privilege is required".into(),
        ));
    }
    Ok(())
}

pub async fn register_rule(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateRuleRequest>,
) -> AppResult<(StatusCode, Json<RuleResponse>)> {
    require_admin(&user)?;
    req.validate(&())?;

    registry
        .rule_repository()
        .create(CreateRuleRequestWithGroupId::new(user.group_id(), req).into())
        .await
        .map(RuleResponse::from)
        .map(|res| (StatusCode::CREATED, Json(res)))
}

pub async fn show_rule_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RulesResponse>> {
    registry
        .rule_repository()
        .find_all(user.group_id())
        .await
        .map(RulesResponse::from)
        .map(Json)
}

pub async fn show_active_rule_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RulesResponse>> {
    registry
        .rule_repository()
        .find_active(user.group_id())
        .await
        .map(RulesResponse::from)
        .map(Json)
}

pub async fn update_rule(
    user: AuthorizedUser,
    Path(rule_id): Path<RuleId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateRuleRequest>,
) -> AppResult<Json<RuleResponse>> {
    require_admin(&user)?;
    req.validate(&())?;

    registry
        .rule_repository()
        .update(UpdateRuleRequestWithIds::new(rule_id, user.group_id(), req).into())
        .await
        .map(RuleResponse::from)
        .map(Json)
}

pub async fn delete_rule(
    user: AuthorizedUser,
    Path(rule_id): Path<RuleId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    require_admin(&user)?;

    registry
        .rule_repository()
        .delete(DeleteRule::new(rule_id, user.group_id()))
        .await
        .map(|_| StatusCode::NO_CONTENT)
}
