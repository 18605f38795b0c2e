use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::id::{GroupId, RuleId};

pub mod event;

pub const MAX_RESERVATION_HOURS: &str = "max_reservation_hours";
pub const ADVANCE_BOOKING_DAYS: &str = "advance_booking_days";
pub const ADMIN_APPROVAL_REQUIRED: &str = "admin_approval_required";

#[derive(Debug, Clone)]
pub struct Rule {
    pub id: RuleId,
    pub group_id: GroupId,
    pub rule_type: String,
    /// ストレージ上の生の値。評価時は `RuleValue::parse` を通して使う。
    pub rule_value: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// ルール値はスキーマレスな文字列として保存されるため、
/// 読み込み境界で一度だけ型付きの値へパースする。
#[derive(Debug, Clone, PartialEq)]
pub enum RuleValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Text(String),
}

impl RuleValue {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Self::Int(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Self::Float(f),
            _ => Self::Text(raw.to_string()),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RuleViolation {
    #[error("reservation cannot exceed {max_hours} hours")]
    MaxHoursExceeded { max_hours: f64 },
    #[error("cannot book more than {max_days} days in advance")]
    TooFarInAdvance { max_days: i64 },
    #[error("reservation cannot start in the past")]
    StartInPast,
}

/// グループの有効ルールを評価単位でまとめたもの。
/// 未知のルール種別は無視し、型が合わない値はそのルールを不適用として扱う。
#[derive(Debug, Default)]
pub struct RuleSet {
    values: HashMap<String, RuleValue>,
}

impl RuleSet {
    pub fn new(active_rules: impl IntoIterator<Item = (String, RuleValue)>) -> Self {
        Self {
            values: active_rules.into_iter().collect(),
        }
    }

    pub fn from_rules<'a>(active_rules: impl IntoIterator<Item = &'a Rule>) -> Self {
        Self::new(
            active_rules
                .into_iter()
                .filter(|r| r.is_active)
                .map(|r| (r.rule_type.clone(), RuleValue::parse(&r.rule_value))),
        )
    }

    /// 予約候補の区間をグループルールに照らして検査する。
    /// すべての時刻は UTC に正規化済みであることを前提とする。
    pub fn evaluate(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), RuleViolation> {
        if let Some(max_hours) = self.numeric(MAX_RESERVATION_HOURS) {
            let duration_hours = (end_time - start_time).num_seconds() as f64 / 3600.0;
            tracing::info!(max_hours, duration_hours, "rule check: max_reservation_hours");
            if duration_hours > max_hours {
                tracing::warn!(
                    max_hours,
                    duration_hours,
                    "reservation violates max_reservation_hours"
                );
                return Err(RuleViolation::MaxHoursExceeded { max_hours });
            }
        }

        if let Some(max_days) = self.integer(ADVANCE_BOOKING_DAYS) {
            // 負方向は床関数で丸める（1 秒未満でも過去なら -1 日として扱う）
            let days_in_advance = (start_time - now).num_milliseconds().div_euclid(86_400_000);
            tracing::info!(max_days, days_in_advance, "rule check: advance_booking_days");
            if days_in_advance > max_days {
                tracing::warn!(
                    max_days,
                    days_in_advance,
                    "reservation violates advance_booking_days"
                );
                return Err(RuleViolation::TooFarInAdvance { max_days });
            }
            if days_in_advance < 0 {
                tracing::warn!(days_in_advance, "reservation starts in the past");
                return Err(RuleViolation::StartInPast);
            }
        }

        Ok(())
    }

    /// admin_approval_required が有効なら、非管理者の新規予約は pending で始まる。
    pub fn approval_required(&self) -> bool {
        match self.values.get(ADMIN_APPROVAL_REQUIRED) {
            Some(value) => value.as_bool().unwrap_or_else(|| {
                tracing::warn!(
                    rule_type = ADMIN_APPROVAL_REQUIRED,
                    ?value,
                    "rule value is not a boolean; treating rule as inapplicable"
                );
                false
            }),
            None => false,
        }
    }

    fn numeric(&self, rule_type: &str) -> Option<f64> {
        let value = self.values.get(rule_type)?;
        let parsed = value.as_f64();
        if parsed.is_none() {
            tracing::warn!(rule_type, ?value, "rule value is not numeric; ignoring rule");
        }
        parsed
    }

    fn integer(&self, rule_type: &str) -> Option<i64> {
        let value = self.values.get(rule_type)?;
        let parsed = value.as_i64();
        if parsed.is_none() {
            tracing::warn!(rule_type, ?value, "rule value is not an integer; ignoring rule");
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn rule_set(pairs: &[(&str, &str)]) -> RuleSet {
        RuleSet::new(
            pairs
                .iter()
                .map(|(t, v)| (t.to_string(), RuleValue::parse(v))),
        )
    }

    #[test]
    fn parses_values_into_tagged_variants() {
        assert_eq!(RuleValue::parse("4.5"), RuleValue::Float(4.5));
        assert_eq!(RuleValue::parse("7"), RuleValue::Int(7));
        assert_eq!(RuleValue::parse("true"), RuleValue::Bool(true));
        assert_eq!(RuleValue::parse("True"), RuleValue::Bool(true));
        assert_eq!(RuleValue::parse("FALSE"), RuleValue::Bool(false));
        assert_eq!(
            RuleValue::parse("not-a-number"),
            RuleValue::Text("not-a-number".into())
        );
    }

    #[test]
    fn empty_rule_set_accepts_everything() {
        let rules = RuleSet::default();
        let start = now() + Duration::days(30);
        assert!(rules.evaluate(start, start + Duration::hours(48), now()).is_ok());
        assert!(!rules.approval_required());
    }

    #[test]
    fn max_hours_boundary_is_inclusive() {
        let rules = rule_set(&[(MAX_RESERVATION_HOURS, "4")]);
        let start = now() + Duration::hours(1);

        // ちょうど 4 時間は許容される
        assert!(rules.evaluate(start, start + Duration::hours(4), now()).is_ok());

        let slightly_over = start + Duration::hours(4) + Duration::seconds(36);
        assert_eq!(
            rules.evaluate(start, slightly_over, now()),
            Err(RuleViolation::MaxHoursExceeded { max_hours: 4.0 })
        );
    }

    #[test]
    fn max_hours_accepts_float_values() {
        let rules = rule_set(&[(MAX_RESERVATION_HOURS, "2.5")]);
        let start = now();
        assert!(rules
            .evaluate(start, start + Duration::minutes(150), now())
            .is_ok());
        assert!(rules
            .evaluate(start, start + Duration::minutes(151), now())
            .is_err());
    }

    #[test]
    fn advance_booking_window_is_enforced() {
        let rules = rule_set(&[(ADVANCE_BOOKING_DAYS, "7")]);

        let in_three_days = now() + Duration::days(3);
        assert!(rules
            .evaluate(in_three_days, in_three_days + Duration::hours(2), now())
            .is_ok());

        let in_eight_days = now() + Duration::days(8);
        assert_eq!(
            rules.evaluate(in_eight_days, in_eight_days + Duration::hours(2), now()),
            Err(RuleViolation::TooFarInAdvance { max_days: 7 })
        );
    }

    #[test]
    fn reservations_in_the_past_are_rejected() {
        let rules = rule_set(&[(ADVANCE_BOOKING_DAYS, "7")]);
        let just_past = now() - Duration::seconds(1);
        assert_eq!(
            rules.evaluate(just_past, just_past + Duration::hours(1), now()),
            Err(RuleViolation::StartInPast)
        );

        let an_hour_ago = now() - Duration::hours(1);
        assert_eq!(
            rules.evaluate(an_hour_ago, now() + Duration::hours(1), now()),
            Err(RuleViolation::StartInPast)
        );
    }

    #[test]
    fn sub_second_past_start_is_rejected() {
        let rules = rule_set(&[(ADVANCE_BOOKING_DAYS, "7")]);
        // 秒未満の過去も床関数で -1 日になる
        let just_past = now() - Duration::milliseconds(500);
        assert_eq!(
            rules.evaluate(just_past, just_past + Duration::hours(1), now()),
            Err(RuleViolation::StartInPast)
        );
    }

    #[test]
    fn malformed_rule_values_are_ignored() {
        let rules = rule_set(&[
            (MAX_RESERVATION_HOURS, "lots"),
            (ADVANCE_BOOKING_DAYS, "soon"),
        ]);
        let start = now() + Duration::days(365);
        assert!(rules.evaluate(start, start + Duration::hours(1000), now()).is_ok());
    }

    #[test]
    fn float_value_for_integer_rule_is_inapplicable() {
        let rules = rule_set(&[(ADVANCE_BOOKING_DAYS, "7.5")]);
        let far_out = now() + Duration::days(100);
        assert!(rules.evaluate(far_out, far_out + Duration::hours(1), now()).is_ok());
    }

    #[test]
    fn unknown_rule_types_are_ignored() {
        let rules = rule_set(&[("min_fuel_level", "25")]);
        let start = now() + Duration::days(1);
        assert!(rules.evaluate(start, start + Duration::hours(1), now()).is_ok());
    }

    #[test]
    fn approval_required_only_for_boolean_true() {
        assert!(rule_set(&[(ADMIN_APPROVAL_REQUIRED, "true")]).approval_required());
        assert!(rule_set(&[(ADMIN_APPROVAL_REQUIRED, "True")]).approval_required());
        assert!(!rule_set(&[(ADMIN_APPROVAL_REQUIRED, "false")]).approval_required());
        assert!(!rule_set(&[(ADMIN_APPROVAL_REQUIRED, "yes")]).approval_required());
        assert!(!rule_set(&[]).approval_required());
    }

    #[test]
    fn inactive_rules_are_dropped_when_building_from_rules() {
        let rule = Rule {
            id: RuleId::new(1),
            group_id: GroupId::new(1),
            rule_type: MAX_RESERVATION_HOURS.into(),
            rule_value: "1".into(),
            description: None,
            is_active: false,
            created_at: now(),
        };
        let rules = RuleSet::from_rules([&rule]);
        let start = now();
        assert!(rules.evaluate(start, start + Duration::hours(10), now()).is_ok());
    }
}
