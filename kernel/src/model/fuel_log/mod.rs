use chrono::{DateTime, Utc};

use crate::model::id::{FuelLogId, ReservationId, UserId};

pub mod event;

/// 燃料精算の前提値。タンク 50L・1L あたり 1.50 で換算する。
pub const TANK_CAPACITY_LITERS: f64 = 50.0;
pub const COST_PER_LITER: f64 = 1.50;

#[derive(Debug, Clone)]
pub struct FuelLog {
    pub id: FuelLogId,
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    /// 利用前後の燃料残量（0-100%）
    pub fuel_before: f64,
    pub fuel_after: f64,
    pub fuel_added_liters: f64,
    pub cost_paid: f64,
    pub logged_at: DateTime<Utc>,
}

/// ユーザーの燃料収支への増分を計算する。
/// 支払った金額が加算され、消費した燃料のコストが減算される。
pub fn balance_change(fuel_before: f64, fuel_after: f64, cost_paid: f64) -> f64 {
    let consumed_pct = fuel_before - fuel_after;
    let consumed_liters = consumed_pct / 100.0 * TANK_CAPACITY_LITERS;
    cost_paid - consumed_liters * COST_PER_LITER
}

#[derive(Debug, Clone)]
pub struct UserFuelSummary {
    pub user_id: UserId,
    pub full_name: String,
    pub fuel_balance: f64,
    pub total_trips: i64,
    pub total_fuel_added: f64,
    pub total_paid: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consuming_fuel_without_paying_decreases_balance() {
        // 80% -> 60% は 10L 消費、コスト 15.00
        let change = balance_change(80.0, 60.0, 0.0);
        assert!((change - (-15.0)).abs() < 1e-9);
    }

    #[test]
    fn paying_more_than_consumed_increases_balance() {
        let change = balance_change(50.0, 40.0, 20.0);
        // 10% = 5L 消費 = 7.50、支払 20.00 なので +12.50
        assert!((change - 12.5).abs() < 1e-9);
    }

    #[test]
    fn refuelling_above_start_level_is_credited() {
        // 利用後の方が残量が多い場合は消費がマイナスになり加算される
        let change = balance_change(30.0, 70.0, 0.0);
        assert!((change - 30.0).abs() < 1e-9);
    }
}
