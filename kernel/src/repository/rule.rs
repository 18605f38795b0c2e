use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::GroupId,
    rule::{
        event::{CreateRule, DeleteRule, UpdateRule},
        Rule,
    },
};

#[async_trait]
pub trait RuleRepository: Send + Sync {
    async fn create(&self, event: CreateRule) -> AppResult<Rule>;
    async fn find_all(&self, group_id: GroupId) -> AppResult<Vec<Rule>>;
    /// 有効なルールのみを返す。Rule Evaluator への入力はこれを使う。
    async fn find_active(&self, group_id: GroupId) -> AppResult<Vec<Rule>>;
    async fn update(&self, event: UpdateRule) -> AppResult<Rule>;
    async fn delete(&self, event: DeleteRule) -> AppResult<()>;
}
