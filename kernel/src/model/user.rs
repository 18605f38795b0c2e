use chrono::{DateTime, Utc};

use crate::model::id::{GroupId, UserId};

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub group_id: GroupId,
    pub username: String,
    pub full_name: String,
    pub is_admin: bool,
    pub fuel_balance: f64,
    pub created_at: DateTime<Utc>,
}
