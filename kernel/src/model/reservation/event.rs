use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::{
    id::{GroupId, ReservationId, UserId},
    reservation::ReservationStatus,
};

#[derive(Debug, new)]
pub struct CreateReservation {
    pub user_id: UserId,
    pub group_id: GroupId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub is_admin: bool,
}

/// 部分更新イベント。None のフィールドは現在値を維持する。
/// notes は「指定なし」と「クリア指定」を区別するため二重の Option を持つ。
#[derive(Debug, new)]
pub struct UpdateReservation {
    pub reservation_id: ReservationId,
    pub requested_user: UserId,
    pub group_id: GroupId,
    pub is_admin: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<ReservationStatus>,
    pub notes: Option<Option<String>>,
}

#[derive(Debug, new)]
pub struct CancelReservation {
    pub reservation_id: ReservationId,
    pub requested_user: UserId,
    pub group_id: GroupId,
    pub is_admin: bool,
}

#[derive(Debug, Default, new)]
pub struct ReservationListOptions {
    pub status: Option<ReservationStatus>,
    pub user_id: Option<UserId>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}
