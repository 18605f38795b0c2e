use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::auth::{AccessToken, Principal};

/// 外部のアイデンティティプロバイダとの境界。
/// トークンの発行やパスワードの扱いはこの先にあり、コアは関与しない。
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// トークンに対応する検証済みの Principal を返す。
    /// 不明・失効トークンは None。
    async fn fetch_principal(&self, token: AccessToken) -> AppResult<Option<Principal>>;
}
