use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::model::id::{GroupId, ReservationId, UserId};

pub mod event;

#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: ReservationId,
    pub user_id: UserId,
    pub group_id: GroupId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 取消操作の結果。取消済みに対する冪等な再取消では
/// newly_cancelled が false になり、通知は発火しない。
#[derive(Debug, Clone)]
pub struct CancelOutcome {
    pub reservation: Reservation,
    pub newly_cancelled: bool,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// 予約ステータスの状態遷移を一元管理する。
    /// completed / cancelled は終端状態であり、どこへも遷移できない。
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Cancelled)
                | (Approved, Cancelled)
                | (Approved, Completed)
        )
    }

    /// pending / approved のみが時間帯を占有する。
    pub fn blocks_slot(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

/// 半開区間 [start, end) 同士の交差判定。
/// `a_start == b_end`（背中合わせの予約）は重複とみなさない。
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn overlapping_intervals_are_detected() {
        // 片側がもう片側の内部で開始する
        assert!(overlaps(at(10), at(12), at(11), at(13)));
        // 片側がもう片側の内部で終了する
        assert!(overlaps(at(11), at(13), at(10), at(12)));
        // 包含
        assert!(overlaps(at(9), at(14), at(10), at(12)));
        assert!(overlaps(at(10), at(12), at(9), at(14)));
        // 同一区間
        assert!(overlaps(at(10), at(12), at(10), at(12)));
    }

    #[test]
    fn back_to_back_intervals_do_not_overlap() {
        assert!(!overlaps(at(12), at(14), at(10), at(12)));
        assert!(!overlaps(at(10), at(12), at(12), at(14)));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!overlaps(at(8), at(9), at(10), at(12)));
        assert!(!overlaps(at(13), at(15), at(10), at(12)));
    }

    #[test]
    fn one_minute_overlap_is_still_a_conflict() {
        let b_start = at(10);
        let b_end = at(12);
        assert!(overlaps(b_end - Duration::minutes(1), at(14), b_start, b_end));
    }

    #[test]
    fn legal_status_transitions() {
        use ReservationStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Approved.can_transition_to(Cancelled));
        assert!(Approved.can_transition_to(Completed));
    }

    #[test]
    fn terminal_states_cannot_transition() {
        use ReservationStatus::*;
        for next in [Pending, Approved, Completed, Cancelled] {
            assert!(!Completed.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Completed));
    }

    #[test]
    fn only_pending_and_approved_block_a_slot() {
        use ReservationStatus::*;
        assert!(Pending.blocks_slot());
        assert!(Approved.blocks_slot());
        assert!(!Completed.blocks_slot());
        assert!(!Cancelled.blocks_slot());
    }

    #[test]
    fn status_round_trips_through_strings() {
        use std::str::FromStr;
        for (status, text) in [
            (ReservationStatus::Pending, "pending"),
            (ReservationStatus::Approved, "approved"),
            (ReservationStatus::Completed, "completed"),
            (ReservationStatus::Cancelled, "cancelled"),
        ] {
            assert_eq!(status.to_string(), text);
            assert_eq!(ReservationStatus::from_str(text).unwrap(), status);
        }
    }
}
