use derive_new::new;

use crate::model::id::{GroupId, RuleId};

#[derive(Debug, new)]
pub struct CreateRule {
    pub group_id: GroupId,
    pub rule_type: String,
    pub rule_value: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, new)]
pub struct UpdateRule {
    pub rule_id: RuleId,
    pub group_id: GroupId,
    pub rule_value: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, new)]
pub struct DeleteRule {
    pub rule_id: RuleId,
    pub group_id: GroupId,
}
