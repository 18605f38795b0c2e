use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use kernel::model::{
    auth::{AccessToken, Principal},
    id::{GroupId, UserId},
};
use registry::AppRegistry;
use shared::error::AppError;

/// Bearer トークンを検証済みの Principal に解決するエクストラクタ。
/// トークンの発行・失効の管理は外部のアイデンティティレイヤーの責務。
pub struct AuthorizedUser {
    principal: Principal,
}

impl AuthorizedUser {
    pub fn principal(&self) -> Principal {
        self.principal
    }

    pub fn id(&self) -> UserId {
        self.principal.user_id
    }

    pub fn group_id(&self) -> GroupId {
        self.principal.group_id
    }

    pub fn is_admin(&self) -> bool {
        self.principal.is_admin
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::UnauthenticatedError)?;
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AppError::UnauthenticatedError)?;

        let principal = registry
            .auth_repository()
            .fetch_principal(AccessToken(token.to_string()))
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        Ok(Self { principal })
    }
}
