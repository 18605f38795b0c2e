use async_trait::async_trait;
use derive_new::new;

use kernel::model::{
    id::GroupId,
    rule::{
        event::{CreateRule, DeleteRule, UpdateRule},
        Rule,
    },
};
use kernel::repository::rule::RuleRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::rule::RuleRow, ConnectionPool};

const RULE_COLUMNS: &str = "id, group_id, rule_type, rule_value, description, is_active, created_at";

#[derive(new)]
pub struct RuleRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RuleRepository for RuleRepositoryImpl {
    async fn create(&self, event: CreateRule) -> AppResult<Rule> {
        let row: RuleRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO rules (group_id, rule_type, rule_value, description, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {RULE_COLUMNS}
            "#
        ))
        .bind(event.group_id.raw())
        .bind(&event.rule_type)
        .bind(&event.rule_value)
        .bind(&event.description)
        .bind(event.is_active)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.into())
    }

    async fn find_all(&self, group_id: GroupId) -> AppResult<Vec<Rule>> {
        let rows: Vec<RuleRow> = sqlx::query_as(&format!(
            "SELECT {RULE_COLUMNS} FROM rules WHERE group_id = $1 ORDER BY created_at ASC"
        ))
        .bind(group_id.raw())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Rule::from).collect())
    }

    async fn find_active(&self, group_id: GroupId) -> AppResult<Vec<Rule>> {
        let rows: Vec<RuleRow> = sqlx::query_as(&format!(
            r#"
            SELECT {RULE_COLUMNS} FROM rules
            WHERE group_id = $1 AND is_active = TRUE
            ORDER BY created_at ASC
            "#
        ))
        .bind(group_id.raw())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Rule::from).collect())
    }

    async fn update(&self, event: UpdateRule) -> AppResult<Rule> {
        // 指定のないフィールドは COALESCE で現在値を維持する
        let row: Option<RuleRow> = sqlx::query_as(&format!(
            r#"
            UPDATE rules
            SET rule_value = COALESCE($3, rule_value),
                description = COALESCE($4, description),
                is_active = COALESCE($5, is_active)
            WHERE id = $1 AND group_id = $2
            RETURNING {RULE_COLUMNS}
            "#
        ))
        .bind(event.rule_id.raw())
        .bind(event.group_id.raw())
        .bind(&event.rule_value)
        .bind(&event.description)
        .bind(event.is_active)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Rule::from)
            .ok_or_else(|| AppError::EntityNotFound("rule not found".into()))
    }

    async fn delete(&self, event: DeleteRule) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM rules WHERE id = $1 AND group_id = $2")
            .bind(event.rule_id.raw())
            .bind(event.group_id.raw())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("rule not found".into()));
        }

        Ok(())
    }
}
