use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use serde::{Deserialize, Serialize};

use kernel::model::{
    auth::Principal,
    fuel_log::{
        event::{CreateFuelLog, FuelLogListOptions},
        FuelLog, UserFuelSummary,
    },
    id::{FuelLogId, ReservationId, UserId},
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFuelLogRequest {
    #[garde(skip)]
    pub reservation_id: ReservationId,
    #[garde(range(min = 0.0, max = 100.0))]
    pub fuel_before: f64,
    #[garde(range(min = 0.0, max = 100.0))]
    pub fuel_after: f64,
    #[garde(range(min = 0.0))]
    #[serde(default)]
    pub fuel_added_liters: f64,
    #[garde(range(min = 0.0))]
    #[serde(default)]
    pub cost_paid: f64,
}

#[derive(new)]
pub struct CreateFuelLogRequestWithPrincipal(Principal, CreateFuelLogRequest);

impl From<CreateFuelLogRequestWithPrincipal> for CreateFuelLog {
    fn from(value: CreateFuelLogRequestWithPrincipal) -> Self {
        let CreateFuelLogRequestWithPrincipal(
            principal,
            CreateFuelLogRequest {
                reservation_id,
                fuel_before,
                fuel_after,
                fuel_added_liters,
                cost_paid,
            },
        ) = value;
        CreateFuelLog {
            reservation_id,
            requested_user: principal.user_id,
            group_id: principal.group_id,
            fuel_before,
            fuel_after,
            fuel_added_liters,
            cost_paid,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLogListQuery {
    pub user_id: Option<UserId>,
    pub reservation_id: Option<ReservationId>,
}

impl From<FuelLogListQuery> for FuelLogListOptions {
    fn from(value: FuelLogListQuery) -> Self {
        let FuelLogListQuery {
            user_id,
            reservation_id,
        } = value;
        FuelLogListOptions {
            user_id,
            reservation_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLogResponse {
    pub id: FuelLogId,
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub fuel_before: f64,
    pub fuel_after: f64,
    pub fuel_added_liters: f64,
    pub cost_paid: f64,
    pub logged_at: DateTime<Utc>,
}

impl From<FuelLog> for FuelLogResponse {
    fn from(value: FuelLog) -> Self {
        let FuelLog {
            id,
            reservation_id,
            user_id,
            fuel_before,
            fuel_after,
            fuel_added_liters,
            cost_paid,
            logged_at,
        } = value;
        Self {
            id,
            reservation_id,
            user_id,
            fuel_before,
            fuel_after,
            fuel_added_liters,
            cost_paid,
            logged_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLogsResponse {
    pub items: Vec<FuelLogResponse>,
}

impl From<Vec<FuelLog>> for FuelLogsResponse {
    fn from(value: Vec<FuelLog>) -> Self {
        Self {
            items: value.into_iter().map(FuelLogResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFuelSummaryResponse {
    pub user_id: UserId,
    pub full_name: String,
    pub fuel_balance: f64,
    pub total_trips: i64,
    pub total_fuel_added: f64,
    pub total_paid: f64,
}

impl From<UserFuelSummary> for UserFuelSummaryResponse {
    fn from(value: UserFuelSummary) -> Self {
        let UserFuelSummary {
            user_id,
            full_name,
            fuel_balance,
            total_trips,
            total_fuel_added,
            total_paid,
        } = value;
        Self {
            user_id,
            full_name,
            fuel_balance,
            total_trips,
            total_fuel_added,
            total_paid,
        }
    }
}
