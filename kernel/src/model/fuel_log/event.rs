use derive_new::new;

use crate::model::id::{GroupId, ReservationId, UserId};

#[derive(Debug, new)]
pub struct CreateFuelLog {
    pub reservation_id: ReservationId,
    pub requested_user: UserId,
    pub group_id: GroupId,
    pub fuel_before: f64,
    pub fuel_after: f64,
    pub fuel_added_liters: f64,
    pub cost_paid: f64,
}

#[derive(Debug, Default, new)]
pub struct FuelLogListOptions {
    pub user_id: Option<UserId>,
    pub reservation_id: Option<ReservationId>,
}
