use chrono::{DateTime, Utc};
use kernel::model::user::User;

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub group_id: i64,
    pub username: String,
    pub full_name: String,
    pub is_admin: bool,
    pub fuel_balance: f64,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        let UserRow {
            id,
            group_id,
            username,
            full_name,
            is_admin,
            fuel_balance,
            created_at,
        } = value;
        User {
            id: id.into(),
            group_id: group_id.into(),
            username,
            full_name,
            is_admin,
            fuel_balance,
            created_at,
        }
    }
}
