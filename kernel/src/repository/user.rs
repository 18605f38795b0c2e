use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{GroupId, UserId},
    user::User,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, user_id: UserId, group_id: GroupId) -> AppResult<Option<User>>;
    async fn find_all_in_group(&self, group_id: GroupId) -> AppResult<Vec<User>>;
}
