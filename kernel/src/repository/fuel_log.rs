use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    fuel_log::{
        event::{CreateFuelLog, FuelLogListOptions},
        FuelLog, UserFuelSummary,
    },
    id::{GroupId, UserId},
};

#[async_trait]
pub trait FuelLogRepository: Send + Sync {
    /// 給油ログを記録し、同一トランザクションで燃料収支を更新する。
    async fn create(&self, event: CreateFuelLog) -> AppResult<FuelLog>;
    async fn find_all(
        &self,
        group_id: GroupId,
        options: FuelLogListOptions,
    ) -> AppResult<Vec<FuelLog>>;
    async fn user_summary(&self, user_id: UserId, group_id: GroupId)
        -> AppResult<UserFuelSummary>;
}
