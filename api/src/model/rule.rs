use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use serde::{Deserialize, Serialize};

use kernel::model::{
    id::{GroupId, RuleId},
    rule::{
        event::{CreateRule, UpdateRule},
        Rule,
    },
};

fn default_is_active() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRuleRequest {
    #[garde(length(min = 1, max = 50))]
    pub rule_type: String,
    #[garde(length(min = 1, max = 255))]
    pub rule_value: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

#[derive(new)]
pub struct CreateRuleRequestWithGroupId(GroupId, CreateRuleRequest);

impl From<CreateRuleRequestWithGroupId> for CreateRule {
    fn from(value: CreateRuleRequestWithGroupId) -> Self {
        let CreateRuleRequestWithGroupId(
            group_id,
            CreateRuleRequest {
                rule_type,
                rule_value,
                description,
                is_active,
            },
        ) = value;
        CreateRule {
            group_id,
            rule_type,
            rule_value,
            description,
            is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRuleRequest {
    #[garde(inner(length(min = 1, max = 255)))]
    pub rule_value: Option<String>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub is_active: Option<bool>,
}

#[derive(new)]
pub struct UpdateRuleRequestWithIds(RuleId, GroupId, UpdateRuleRequest);

impl From<UpdateRuleRequestWithIds> for UpdateRule {
    fn from(value: UpdateRuleRequestWithIds) -> Self {
        let UpdateRuleRequestWithIds(
            rule_id,
            group_id,
            UpdateRuleRequest {
                rule_value,
                description,
                is_active,
            },
        ) = value;
        UpdateRule {
            rule_id,
            group_id,
            rule_value,
            description,
            is_active,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResponse {
    pub id: RuleId,
    pub group_id: GroupId,
    pub rule_type: String,
    pub rule_value: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Rule> for RuleResponse {
    fn from(value: Rule) -> Self {
        let Rule {
            id,
            group_id,
            rule_type,
            rule_value,
            description,
            is_active,
            created_at,
        } = value;
        Self {
            id,
            group_id,
            rule_type,
            rule_value,
            description,
            is_active,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesResponse {
    pub items: Vec<RuleResponse>,
}

impl From<Vec<Rule>> for RulesResponse {
    fn from(value: Vec<Rule>) -> Self {
        Self {
            items: value.into_iter().map(RuleResponse::from).collect(),
        }
    }
}
