use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;

use kernel::model::{
    id::{GroupId, ReservationId},
    reservation::{
        event::{CancelReservation, CreateReservation, ReservationListOptions, UpdateReservation},
        CancelOutcome, Reservation, ReservationStatus,
    },
    rule::{RuleSet, RuleValue},
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::reservation::ReservationRow, ConnectionPool};

const RESERVATION_COLUMNS: &str =
    "id, user_id, group_id, start_time, end_time, status, notes, created_at, updated_at";

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    // 予約の受付操作を行う
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        if event.end_time <= event.start_time {
            return Err(AppError::UnprocessableEntity(
                "end_time must be after start_time".into(),
            ));
        }

        let mut tx = self.db.begin().await?;

        // 重複チェックと INSERT を単一の原子的な読み書きにするため
        // トランザクション分離レベルを SERIALIZABLE に設定する。
        // 同じ空き枠に対する並行予約のどちらか一方は
        // シリアライゼーション失敗となり、Conflict として返る。
        self.set_transaction_serializable(&mut tx).await?;

        // ① グループの有効ルールに照らして候補区間を検査する
        let rule_set = load_rule_set(&mut tx, event.group_id).await?;
        rule_set
            .evaluate(event.start_time, event.end_time, Utc::now())
            .map_err(|violation| AppError::PolicyViolation(violation.to_string()))?;

        // ② 既存予約との時間帯重複を調べる（pending / approved のみが対象）
        let conflicting = slot_taken(
            &mut tx,
            event.group_id,
            event.start_time,
            event.end_time,
            None,
        )
        .await?;
        if conflicting {
            if !event.is_admin {
                return Err(AppError::ConflictError(
                    "reservation overlaps with an existing reservation".into(),
                ));
            }
            // 管理者は重複していても予約を作成できる
            tracing::info!(
                group_id = %event.group_id,
                user_id = %event.user_id,
                "admin override: creating overlapping reservation"
            );
        }

        // ③ 初期ステータスを決定する
        let status = if rule_set.approval_required() && !event.is_admin {
            ReservationStatus::Pending
        } else {
            ReservationStatus::Approved
        };

        let row: ReservationRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO reservations (user_id, group_id, start_time, end_time, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(event.user_id.raw())
        .bind(event.group_id.raw())
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(status.to_string())
        .bind(&event.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_statement_error)?;

        tx.commit().await.map_err(map_commit_error)?;

        row.try_into()
    }

    // 予約の部分更新を行う
    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // グループ外の予約は存在しないのと同じ扱いにする
        let current = find_in_group(&mut tx, event.reservation_id, event.group_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("reservation not found".into()))?;

        if current.user_id != event.requested_user && !event.is_admin {
            return Err(AppError::ForbiddenOperation(
                "not authorized to update this reservation".into(),
            ));
        }

        // 指定のないフィールドは現在値を引き継ぐ
        let new_start = event.start_time.unwrap_or(current.start_time);
        let new_end = event.end_time.unwrap_or(current.end_time);

        // 時間帯が動く場合のみ、自身を除外して重複判定をやり直す。
        // ルール評価は受付時にのみ行い、更新時には再評価しない。
        if event.start_time.is_some() || event.end_time.is_some() {
            if new_end <= new_start {
                return Err(AppError::UnprocessableEntity(
                    "end_time must be after start_time".into(),
                ));
            }
            let conflicting = slot_taken(
                &mut tx,
                event.group_id,
                new_start,
                new_end,
                Some(event.reservation_id),
            )
            .await?;
            if conflicting && !event.is_admin {
                return Err(AppError::ConflictError(
                    "updated reservation overlaps with an existing reservation".into(),
                ));
            }
        }

        let new_status = match event.status {
            Some(next) if next != current.status => {
                if !current.status.can_transition_to(next) {
                    return Err(AppError::UnprocessableEntity(format!(
                        "illegal status transition: {} -> {}",
                        current.status, next
                    )));
                }
                next
            }
            _ => current.status,
        };
        // notes は外側の Option が「指定なし」、内側の None が「クリア指定」
        let new_notes = match event.notes {
            Some(notes) => notes,
            None => current.notes,
        };

        let row: ReservationRow = sqlx::query_as(&format!(
            r#"
            UPDATE reservations
            SET start_time = $3, end_time = $4, status = $5, notes = $6, updated_at = NOW()
            WHERE id = $1 AND group_id = $2
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(event.reservation_id.raw())
        .bind(event.group_id.raw())
        .bind(new_start)
        .bind(new_end)
        .bind(new_status.to_string())
        .bind(&new_notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_statement_error)?;

        tx.commit().await.map_err(map_commit_error)?;

        row.try_into()
    }

    // 予約の取消操作を行う。レコードは削除せず status を cancelled にする
    async fn cancel(&self, event: CancelReservation) -> AppResult<CancelOutcome> {
        let mut tx = self.db.begin().await?;

        let current = find_in_group(&mut tx, event.reservation_id, event.group_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("reservation not found".into()))?;

        if current.user_id != event.requested_user && !event.is_admin {
            return Err(AppError::ForbiddenOperation(
                "not authorized to cancel this reservation".into(),
            ));
        }

        // 取消済みの取消は冪等な no-op として成功させる
        if current.status == ReservationStatus::Cancelled {
            return Ok(CancelOutcome {
                reservation: current,
                newly_cancelled: false,
            });
        }
        if !current.status.can_transition_to(ReservationStatus::Cancelled) {
            return Err(AppError::UnprocessableEntity(format!(
                "illegal status transition: {} -> cancelled",
                current.status
            )));
        }

        let row: ReservationRow = sqlx::query_as(&format!(
            r#"
            UPDATE reservations
            SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND group_id = $2
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(event.reservation_id.raw())
        .bind(event.group_id.raw())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_statement_error)?;

        tx.commit().await.map_err(map_commit_error)?;

        Ok(CancelOutcome {
            reservation: row.try_into()?,
            newly_cancelled: true,
        })
    }

    async fn find_by_id(
        &self,
        reservation_id: ReservationId,
        group_id: GroupId,
    ) -> AppResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1 AND group_id = $2"
        ))
        .bind(reservation_id.raw())
        .bind(group_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_all(
        &self,
        group_id: GroupId,
        options: ReservationListOptions,
    ) -> AppResult<Vec<Reservation>> {
        let mut builder = sqlx::QueryBuilder::new(format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE group_id = "
        ));
        builder.push_bind(group_id.raw());
        if let Some(status) = options.status {
            builder.push(" AND status = ").push_bind(status.to_string());
        }
        if let Some(user_id) = options.user_id {
            builder.push(" AND user_id = ").push_bind(user_id.raw());
        }
        if let Some(start_date) = options.start_date {
            builder.push(" AND start_time >= ").push_bind(start_date);
        }
        if let Some(end_date) = options.end_date {
            builder.push(" AND end_time <= ").push_bind(end_date);
        }
        builder.push(" ORDER BY start_time DESC");

        let rows: Vec<ReservationRow> = builder
            .build_query_as()
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

impl ReservationRepositoryImpl {
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}

// グループの有効ルールを読み込み、境界で型付きの値へパースする
async fn load_rule_set(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    group_id: GroupId,
) -> AppResult<RuleSet> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT rule_type, rule_value FROM rules WHERE group_id = $1 AND is_active = TRUE",
    )
    .bind(group_id.raw())
    .fetch_all(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?;

    Ok(RuleSet::new(
        rows.into_iter()
            .map(|(rule_type, raw)| (rule_type, RuleValue::parse(&raw))),
    ))
}

// 半開区間 [start, end) の交差判定:
//     existing.start < candidate.end AND candidate.start < existing.end
// cancelled / completed の予約は枠を塞がない
async fn slot_taken(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    group_id: GroupId,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    exclude: Option<ReservationId>,
) -> AppResult<bool> {
    let found: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT id
        FROM reservations
        WHERE group_id = $1
          AND status IN ('pending', 'approved')
          AND start_time < $3
          AND $2 < end_time
          AND ($4::BIGINT IS NULL OR id <> $4)
        LIMIT 1
        "#,
    )
    .bind(group_id.raw())
    .bind(start_time)
    .bind(end_time)
    .bind(exclude.map(|id| id.raw()))
    .fetch_optional(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?;

    Ok(found.is_some())
}

fn is_serialization_failure(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("40001")
    )
}

// SERIALIZABLE による直列化失敗は、同じ枠を取り合った並行予約として
// Conflict に読み替える（呼び出し側は別の時間帯で再送できる）
fn map_statement_error(e: sqlx::Error) -> AppError {
    if is_serialization_failure(&e) {
        AppError::ConflictError("reservation overlaps with a concurrent reservation".into())
    } else {
        AppError::SpecificOperationError(e)
    }
}

fn map_commit_error(e: sqlx::Error) -> AppError {
    if is_serialization_failure(&e) {
        AppError::ConflictError("reservation overlaps with a concurrent reservation".into())
    } else {
        AppError::TransactionError(e)
    }
}

async fn find_in_group(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    reservation_id: ReservationId,
    group_id: GroupId,
) -> AppResult<Option<Reservation>> {
    let row: Option<ReservationRow> = sqlx::query_as(&format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1 AND group_id = $2"
    ))
    .bind(reservation_id.raw())
    .bind(group_id.raw())
    .fetch_optional(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?;

    row.map(TryInto::try_into).transpose()
}
