use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::model::{event::GroupEvent, id::GroupId};

/// 購読者ごとの送信キューの深さ。ここに収まらない遅いクライアントは
/// 配信失敗として購読を解除される。
const SUBSCRIBER_QUEUE_CAPACITY: usize = 256;

/// グループ単位のイベントファンアウトを担う、プロセスに一つの注入可能なサービス。
/// AppRegistry が起動時に生成して保持する（グローバル変数にはしない）。
///
/// 配信はベストエフォートであり、受け付けられなかったチャネルは
/// publish の副作用として purge される。1 つの購読者の停滞が
/// 他の購読者への配信をブロックすることはない。
pub struct BroadcastHub {
    groups: DashMap<GroupId, HashMap<u64, mpsc::Sender<GroupEvent>>>,
    next_subscriber_id: AtomicU64,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
            next_subscriber_id: AtomicU64::new(0),
        }
    }

    /// グループの購読を登録する。最初の購読者がエントリを生成する。
    /// 返り値の Subscription を drop すると購読は一度だけ解除される。
    pub fn subscribe(self: &Arc<Self>, group_id: GroupId) -> Subscription {
        let subscriber_id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE_CAPACITY);
        self.groups.entry(group_id).or_default().insert(subscriber_id, tx);
        tracing::info!(%group_id, subscriber_id, "channel subscribed");
        Subscription {
            hub: Arc::clone(self),
            group_id,
            subscriber_id,
            rx,
        }
    }

    fn unsubscribe(&self, group_id: GroupId, subscriber_id: u64) {
        if let Some(mut subscribers) = self.groups.get_mut(&group_id) {
            subscribers.remove(&subscriber_id);
        }
        // 空になったグループのエントリは残さない
        self.groups.remove_if(&group_id, |_, subscribers| subscribers.is_empty());
        tracing::info!(%group_id, subscriber_id, "channel unsubscribed");
    }

    /// グループの現購読者全員へイベントを配信し、配信できた数を返す。
    /// スナップショットに対して送信するため、配信中の購読解除と競合しない。
    pub fn publish(&self, group_id: GroupId, event: &GroupEvent) -> usize {
        let snapshot: Vec<(u64, mpsc::Sender<GroupEvent>)> = match self.groups.get(&group_id) {
            Some(subscribers) => subscribers
                .iter()
                .map(|(id, tx)| (*id, tx.clone()))
                .collect(),
            None => {
                tracing::debug!(%group_id, "no active subscribers");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut stale = Vec::new();
        for (subscriber_id, tx) in snapshot {
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(%group_id, subscriber_id, error = %e, "dropping subscriber");
                    stale.push(subscriber_id);
                }
            }
        }

        if !stale.is_empty() {
            if let Some(mut subscribers) = self.groups.get_mut(&group_id) {
                for subscriber_id in &stale {
                    subscribers.remove(subscriber_id);
                }
            }
            self.groups.remove_if(&group_id, |_, subscribers| subscribers.is_empty());
        }

        delivered
    }

    pub fn connection_count(&self, group_id: GroupId) -> usize {
        self.groups
            .get(&group_id)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

/// 購読ハンドル。drop で必ず一度だけ unsubscribe される（RAII）。
pub struct Subscription {
    hub: Arc<BroadcastHub>,
    group_id: GroupId,
    subscriber_id: u64,
    rx: mpsc::Receiver<GroupEvent>,
}

impl Subscription {
    pub async fn recv(&mut self) -> Option<GroupEvent> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.group_id, self.subscriber_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::id::ReservationId;

    fn deleted(id: i64) -> GroupEvent {
        GroupEvent::ReservationDeleted {
            id: ReservationId::new(id),
        }
    }

    #[tokio::test]
    async fn publish_reaches_every_subscriber_in_the_group() {
        let hub = Arc::new(BroadcastHub::new());
        let group = GroupId::new(1);
        let mut a = hub.subscribe(group);
        let mut b = hub.subscribe(group);

        assert_eq!(hub.publish(group, &deleted(1)), 2);
        assert_eq!(a.recv().await, Some(deleted(1)));
        assert_eq!(b.recv().await, Some(deleted(1)));
    }

    #[tokio::test]
    async fn publish_is_scoped_to_one_group() {
        let hub = Arc::new(BroadcastHub::new());
        let mut same = hub.subscribe(GroupId::new(1));
        let _other = hub.subscribe(GroupId::new(2));

        assert_eq!(hub.publish(GroupId::new(1), &deleted(5)), 1);
        assert_eq!(same.recv().await, Some(deleted(5)));
        assert_eq!(hub.connection_count(GroupId::new(2)), 1);
    }

    #[tokio::test]
    async fn unsubscribed_channels_stop_receiving() {
        let hub = Arc::new(BroadcastHub::new());
        let group = GroupId::new(1);
        let mut a = hub.subscribe(group);
        let b = hub.subscribe(group);
        drop(b);

        assert_eq!(hub.publish(group, &deleted(2)), 1);
        assert_eq!(a.recv().await, Some(deleted(2)));
        assert_eq!(hub.connection_count(group), 1);
    }

    #[tokio::test]
    async fn failed_channel_is_pruned_without_breaking_the_broadcast() {
        let hub = Arc::new(BroadcastHub::new());
        let group = GroupId::new(1);
        let mut healthy = hub.subscribe(group);
        let mut broken = hub.subscribe(group);

        // 受信側を閉じて送信失敗を再現する
        broken.rx.close();

        assert_eq!(hub.publish(group, &deleted(3)), 1);
        assert_eq!(healthy.recv().await, Some(deleted(3)));
        assert_eq!(hub.connection_count(group), 1);

        // 二度目の publish で健常なチャネルだけが残っている
        assert_eq!(hub.publish(group, &deleted(4)), 1);
        assert_eq!(healthy.recv().await, Some(deleted(4)));
    }

    #[tokio::test]
    async fn last_unsubscribe_removes_the_group_entry() {
        let hub = Arc::new(BroadcastHub::new());
        let group = GroupId::new(1);
        let a = hub.subscribe(group);
        let b = hub.subscribe(group);
        assert_eq!(hub.connection_count(group), 2);

        drop(a);
        assert_eq!(hub.connection_count(group), 1);
        drop(b);
        assert_eq!(hub.connection_count(group), 0);
        assert!(hub.groups.get(&group).is_none());
    }

    #[tokio::test]
    async fn publishes_are_received_in_order_within_a_group() {
        let hub = Arc::new(BroadcastHub::new());
        let group = GroupId::new(1);
        let mut sub = hub.subscribe(group);

        for i in 0..5 {
            hub.publish(group, &deleted(i));
        }
        for i in 0..5 {
            assert_eq!(sub.recv().await, Some(deleted(i)));
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let hub = Arc::new(BroadcastHub::new());
        assert_eq!(hub.publish(GroupId::new(42), &deleted(1)), 0);
    }

    #[tokio::test]
    async fn concurrent_subscribe_publish_unsubscribe_is_safe() {
        let hub = Arc::new(BroadcastHub::new());
        let group = GroupId::new(1);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let hub = Arc::clone(&hub);
            handles.push(tokio::spawn(async move {
                for i in 0..50 {
                    let sub = hub.subscribe(group);
                    hub.publish(group, &deleted(i));
                    drop(sub);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(hub.connection_count(group), 0);
    }
}
