use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{GroupId, ReservationId},
    reservation::{
        event::{CancelReservation, CreateReservation, ReservationListOptions, UpdateReservation},
        CancelOutcome, Reservation,
    },
};

/// 予約の受付・変更・取消を担うリポジトリ。
/// create / update / cancel はルール評価・重複判定・永続化を
/// 一つのトランザクションとして実行する（部分コミットは発生しない）。
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// 予約を受け付ける。ルール違反は PolicyViolation、
    /// 時間帯の重複は（管理者でない限り）ConflictError になる。
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;
    /// 部分更新を行う。時間帯が変わる場合は自身を除いた重複判定をやり直す。
    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation>;
    /// 物理削除はせず status を cancelled にする。取消済みの取消は no-op で、
    /// その場合は newly_cancelled が false になる。
    async fn cancel(&self, event: CancelReservation) -> AppResult<CancelOutcome>;
    async fn find_by_id(
        &self,
        reservation_id: ReservationId,
        group_id: GroupId,
    ) -> AppResult<Option<Reservation>>;
    async fn find_all(
        &self,
        group_id: GroupId,
        options: ReservationListOptions,
    ) -> AppResult<Vec<Reservation>>;
}
