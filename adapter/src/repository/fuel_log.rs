use async_trait::async_trait;
use derive_new::new;

use kernel::model::{
    fuel_log::{
        balance_change,
        event::{CreateFuelLog, FuelLogListOptions},
        FuelLog, UserFuelSummary,
    },
    id::{GroupId, UserId},
};
use kernel::repository::fuel_log::FuelLogRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::fuel_log::FuelLogRow, ConnectionPool};

const FUEL_LOG_COLUMNS: &str =
    "id, reservation_id, user_id, fuel_before, fuel_after, fuel_added_liters, cost_paid, logged_at";

#[derive(new)]
pub struct FuelLogRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl FuelLogRepository for FuelLogRepositoryImpl {
    // 給油ログの記録と燃料収支の更新を一つのトランザクションで行う
    async fn create(&self, event: CreateFuelLog) -> AppResult<FuelLog> {
        let mut tx = self.db.begin().await?;

        // 対象予約の存在確認（グループ外は見つからない扱い）と所有者チェック
        let reservation: Option<(i64,)> = sqlx::query_as(
            "SELECT user_id FROM reservations WHERE id = $1 AND group_id = $2",
        )
        .bind(event.reservation_id.raw())
        .bind(event.group_id.raw())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some((owner_id,)) = reservation else {
            return Err(AppError::EntityNotFound("reservation not found".into()));
        };
        if owner_id != event.requested_user.raw() {
            return Err(AppError::ForbiddenOperation(
                "not authorized to log fuel for this reservation".into(),
            ));
        }

        let row: FuelLogRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO fuel_logs
                (reservation_id, user_id, fuel_before, fuel_after, fuel_added_liters, cost_paid)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {FUEL_LOG_COLUMNS}
            "#
        ))
        .bind(event.reservation_id.raw())
        .bind(event.requested_user.raw())
        .bind(event.fuel_before)
        .bind(event.fuel_after)
        .bind(event.fuel_added_liters)
        .bind(event.cost_paid)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let change = balance_change(event.fuel_before, event.fuel_after, event.cost_paid);
        let res = sqlx::query("UPDATE users SET fuel_balance = fuel_balance + $2 WHERE id = $1")
            .bind(event.requested_user.raw())
            .bind(change)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no user balance has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(row.into())
    }

    async fn find_all(
        &self,
        group_id: GroupId,
        options: FuelLogListOptions,
    ) -> AppResult<Vec<FuelLog>> {
        // グループ境界は予約との JOIN で保証する
        let mut builder = sqlx::QueryBuilder::new(
            "SELECT f.id, f.reservation_id, f.user_id, f.fuel_before, f.fuel_after, \
             f.fuel_added_liters, f.cost_paid, f.logged_at \
             FROM fuel_logs AS f \
             INNER JOIN reservations AS r ON f.reservation_id = r.id \
             WHERE r.group_id = ",
        );
        builder.push_bind(group_id.raw());
        if let Some(user_id) = options.user_id {
            builder.push(" AND f.user_id = ").push_bind(user_id.raw());
        }
        if let Some(reservation_id) = options.reservation_id {
            builder
                .push(" AND f.reservation_id = ")
                .push_bind(reservation_id.raw());
        }
        builder.push(" ORDER BY f.logged_at DESC");

        let rows: Vec<FuelLogRow> = builder
            .build_query_as()
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(FuelLog::from).collect())
    }

    async fn user_summary(
        &self,
        user_id: UserId,
        group_id: GroupId,
    ) -> AppResult<UserFuelSummary> {
        let row: Option<(i64, String, f64, i64, f64, f64)> = sqlx::query_as(
            r#"
            SELECT
                u.id,
                u.full_name,
                u.fuel_balance,
                COUNT(f.id),
                COALESCE(SUM(f.fuel_added_liters), 0),
                COALESCE(SUM(f.cost_paid), 0)
            FROM users AS u
            LEFT JOIN fuel_logs AS f ON f.user_id = u.id
            WHERE u.id = $1 AND u.group_id = $2
            GROUP BY u.id, u.full_name, u.fuel_balance
            "#,
        )
        .bind(user_id.raw())
        .bind(group_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some((id, full_name, fuel_balance, total_trips, total_fuel_added, total_paid)) = row
        else {
            return Err(AppError::EntityNotFound("user not found".into()));
        };

        Ok(UserFuelSummary {
            user_id: id.into(),
            full_name,
            fuel_balance,
            total_trips,
            total_fuel_added,
            total_paid,
        })
    }
}
