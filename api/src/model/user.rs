use chrono::{DateTime, Utc};
use serde::Serialize;

use kernel::model::{
    id::{GroupId, UserId},
    user::User,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub group_id: GroupId,
    pub username: String,
    pub full_name: String,
    pub is_admin: bool,
    pub fuel_balance: f64,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            id,
            group_id,
            username,
            full_name,
            is_admin,
            fuel_balance,
            created_at,
        } = value;
        Self {
            id,
            group_id,
            username,
            full_name,
            is_admin,
            fuel_balance,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub items: Vec<UserResponse>,
}

impl From<Vec<User>> for UsersResponse {
    fn from(value: Vec<User>) -> Self {
        Self {
            items: value.into_iter().map(UserResponse::from).collect(),
        }
    }
}
