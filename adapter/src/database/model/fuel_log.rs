use chrono::{DateTime, Utc};
use kernel::model::fuel_log::FuelLog;

#[derive(sqlx::FromRow)]
pub struct FuelLogRow {
    pub id: i64,
    pub reservation_id: i64,
    pub user_id: i64,
    pub fuel_before: f64,
    pub fuel_after: f64,
    pub fuel_added_liters: f64,
    pub cost_paid: f64,
    pub logged_at: DateTime<Utc>,
}

impl From<FuelLogRow> for FuelLog {
    fn from(value: FuelLogRow) -> Self {
        let FuelLogRow {
            id,
            reservation_id,
            user_id,
            fuel_before,
            fuel_after,
            fuel_added_liters,
            cost_paid,
            logged_at,
        } = value;
        FuelLog {
            id: id.into(),
            reservation_id: reservation_id.into(),
            user_id: user_id.into(),
            fuel_before,
            fuel_after,
            fuel_added_liters,
            cost_paid,
            logged_at,
        }
    }
}
