use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use serde::{Deserialize, Deserializer, Serialize};

use kernel::model::{
    auth::Principal,
    id::{GroupId, ReservationId, UserId},
    reservation::{
        event::{CancelReservation, CreateReservation, ReservationListOptions, UpdateReservation},
        Reservation, ReservationStatus,
    },
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    #[garde(inner(length(max = 1000)))]
    pub notes: Option<String>,
}

#[derive(new)]
pub struct CreateReservationRequestWithPrincipal(Principal, CreateReservationRequest);

impl From<CreateReservationRequestWithPrincipal> for CreateReservation {
    fn from(value: CreateReservationRequestWithPrincipal) -> Self {
        let CreateReservationRequestWithPrincipal(
            principal,
            CreateReservationRequest {
                start_time,
                end_time,
                notes,
            },
        ) = value;
        CreateReservation {
            user_id: principal.user_id,
            group_id: principal.group_id,
            start_time,
            end_time,
            notes,
            is_admin: principal.is_admin,
        }
    }
}

// フィールドの省略（変更なし）と明示的な null（クリア指定）を区別する
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer).map(Some)
}

/// 部分更新リクエスト。省略したフィールドは変更されない。
/// notes は null を送ることでクリアできる。
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    #[garde(skip)]
    pub start_time: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub end_time: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub status: Option<ReservationStatus>,
    #[garde(inner(inner(length(max = 1000))))]
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

#[derive(new)]
pub struct UpdateReservationRequestWithIds(ReservationId, Principal, UpdateReservationRequest);

impl From<UpdateReservationRequestWithIds> for UpdateReservation {
    fn from(value: UpdateReservationRequestWithIds) -> Self {
        let UpdateReservationRequestWithIds(
            reservation_id,
            principal,
            UpdateReservationRequest {
                start_time,
                end_time,
                status,
                notes,
            },
        ) = value;
        UpdateReservation {
            reservation_id,
            requested_user: principal.user_id,
            group_id: principal.group_id,
            is_admin: principal.is_admin,
            start_time,
            end_time,
            status,
            notes,
        }
    }
}

#[derive(new)]
pub struct CancelReservationRequestWithIds(ReservationId, Principal);

impl From<CancelReservationRequestWithIds> for CancelReservation {
    fn from(value: CancelReservationRequestWithIds) -> Self {
        let CancelReservationRequestWithIds(reservation_id, principal) = value;
        CancelReservation {
            reservation_id,
            requested_user: principal.user_id,
            group_id: principal.group_id,
            is_admin: principal.is_admin,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationListQuery {
    pub status: Option<ReservationStatus>,
    pub user_id: Option<UserId>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl From<ReservationListQuery> for ReservationListOptions {
    fn from(value: ReservationListQuery) -> Self {
        let ReservationListQuery {
            status,
            user_id,
            start_date,
            end_date,
        } = value;
        ReservationListOptions {
            status,
            user_id,
            start_date,
            end_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
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

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            id,
            user_id,
            group_id,
            start_time,
            end_time,
            status,
            notes,
            created_at,
            updated_at,
        } = value;
        Self {
            id,
            user_id,
            group_id,
            start_time,
            end_time,
            status,
            notes,
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn create_request_accepts_camel_case_payload() {
        let req: CreateReservationRequest = serde_json::from_str(
            r#"{
                "startTime": "2025-06-01T10:00:00Z",
                "endTime": "2025-06-01T12:00:00Z",
                "notes": "weekend trip"
            }"#,
        )
        .unwrap();
        assert_eq!(
            req.start_time,
            Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(req.notes.as_deref(), Some("weekend trip"));
    }

    #[test]
    fn update_request_distinguishes_absent_and_null_notes() {
        let absent: UpdateReservationRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(absent.notes, None);

        let cleared: UpdateReservationRequest =
            serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(cleared.notes, Some(None));

        let replaced: UpdateReservationRequest =
            serde_json::from_str(r#"{"notes": "new plan"}"#).unwrap();
        assert_eq!(replaced.notes, Some(Some("new plan".into())));
    }

    #[test]
    fn status_filter_parses_lowercase_values() {
        let query: ReservationListQuery =
            serde_json::from_str(r#"{"status": "approved"}"#).unwrap();
        assert_eq!(query.status, Some(ReservationStatus::Approved));
        assert!(query.user_id.is_none());
    }
}
