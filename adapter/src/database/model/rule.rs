use chrono::{DateTime, Utc};
use kernel::model::rule::Rule;

#[derive(sqlx::FromRow)]
pub struct RuleRow {
    pub id: i64,
    pub group_id: i64,
    pub rule_type: String,
    pub rule_value: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<RuleRow> for Rule {
    fn from(value: RuleRow) -> Self {
        let RuleRow {
            id,
            group_id,
            rule_type,
            rule_value,
            description,
            is_active,
            created_at,
        } = value;
        Rule {
            id: id.into(),
            group_id: group_id.into(),
            rule_type,
            rule_value,
            description,
            is_active,
            created_at,
        }
    }
}
