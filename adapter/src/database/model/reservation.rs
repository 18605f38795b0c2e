use std::str::FromStr;

use chrono::{DateTime, Utc};
use kernel::model::reservation::{Reservation, ReservationStatus};
use shared::error::AppError;

#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub id: i64,
    pub user_id: i64,
    pub group_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
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
        let status = ReservationStatus::from_str(&status).map_err(|_| {
            AppError::ConversionEntityError(format!("unknown reservation status: {status}"))
        })?;
        Ok(Reservation {
            id: id.into(),
            user_id: user_id.into(),
            group_id: group_id.into(),
            start_time,
            end_time,
            status,
            notes,
            created_at,
            updated_at,
        })
    }
}
