use async_trait::async_trait;
use derive_new::new;

use kernel::model::auth::{AccessToken, Principal};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};

use crate::database::ConnectionPool;

/// アイデンティティプロバイダが発行したアクセストークンを
/// Principal に解決する。発行そのものはこのプロセスの外で行われる。
#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    ttl: u64,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_principal(&self, token: AccessToken) -> AppResult<Option<Principal>> {
        let row: Option<(i64, i64, bool)> = sqlx::query_as(
            r#"
            SELECT u.id, u.group_id, u.is_admin
            FROM access_tokens AS t
            INNER JOIN users AS u ON u.id = t.user_id
            WHERE t.token = $1
              AND t.created_at > NOW() - make_interval(secs => $2)
            "#,
        )
        .bind(&token.0)
        .bind(self.ttl as f64)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(|(user_id, group_id, is_admin)| Principal {
            user_id: user_id.into(),
            group_id: group_id.into(),
            is_admin,
        }))
    }
}
