use kernel::{broadcast::BroadcastHub, model::event::GroupEvent, model::id::GroupId};
use serde::Serialize;
use serde_json::Value;

pub mod fuel_log;
pub mod health;
pub mod reservation;
pub mod rule;
pub mod user;
pub mod ws;

/// コミット済みの変更をグループへ通知する。
/// 通知の失敗がハンドラの成功応答を妨げてはならないため、
/// シリアライズ失敗もログに落とすだけで握りつぶす。
pub(crate) fn publish_to_group<T: Serialize>(
    hub: &BroadcastHub,
    group_id: GroupId,
    make_event: impl FnOnce(Value) -> GroupEvent,
    payload: &T,
) {
    match serde_json::to_value(payload) {
        Ok(value) => {
            hub.publish(group_id, &make_event(value));
        }
        Err(e) => {
            tracing::warn!(%group_id, error = %e, "failed to serialize broadcast payload");
        }
    }
}
