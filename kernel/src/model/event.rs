use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::id::{GroupId, ReservationId, UserId};

/// グループ単位でファンアウトされるイベント。
/// ワイヤ上は `{"type": "...", "data": {...}}` の形になる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GroupEvent {
    ReservationCreated(Value),
    ReservationUpdated(Value),
    ReservationDeleted { id: ReservationId },
    FuelLogCreated(Value),
    Connected { user_id: UserId, group_id: GroupId },
    Echo(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_serialize_with_type_and_data_envelope() {
        let event = GroupEvent::ReservationCreated(json!({"id": 1, "status": "approved"}));
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "reservation_created", "data": {"id": 1, "status": "approved"}})
        );
    }

    #[test]
    fn deleted_event_carries_only_the_id() {
        let event = GroupEvent::ReservationDeleted {
            id: ReservationId::new(7),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "reservation_deleted", "data": {"id": 7}})
        );
    }

    #[test]
    fn connected_and_echo_events_match_the_wire_contract() {
        let connected = GroupEvent::Connected {
            user_id: UserId::new(3),
            group_id: GroupId::new(9),
        };
        assert_eq!(
            serde_json::to_value(&connected).unwrap(),
            json!({"type": "connected", "data": {"user_id": 3, "group_id": 9}})
        );

        let echo = GroupEvent::Echo("ping".into());
        assert_eq!(
            serde_json::to_value(&echo).unwrap(),
            json!({"type": "echo", "data": "ping"})
        );
    }
}
