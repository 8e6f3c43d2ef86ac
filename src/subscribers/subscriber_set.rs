//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] hands each [`Notice`] to every subscriber **without
//! awaiting** their processing.
//!
//! ## Guarantees
//! - `emit` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - A panicking subscriber is reported as `SubscriberPanicked` and keeps running.
//!
//! ## Non-guarantees
//! - No ordering across different subscribers.
//! - No retries: on overflow the notice is dropped for that subscriber.
//!
//! ```text
//!    emit(&Notice)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_notice()
//!        ├────────────────► [queue S2] ─► worker S2 ─► on_notice()
//!        └────────────────► [queue SN] ─► worker SN ─► on_notice()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;

use crate::notices::{Bus, Notice};

use super::Subscribe;

/// Per-subscriber channel metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Notice>>,
}

/// Fan-out coordinator for notice subscribers.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Must be called inside a tokio runtime. Queue capacity is at least 1.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Notice>>(cap);
            let bus_for_worker = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(notice) = rx.recv().await {
                    let fut = sub.on_notice(notice.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = panic_message(&*panic_err);
                        warn!(subscriber = sub.name(), %info, "subscriber panicked");
                        bus_for_worker.publish(Notice::subscriber_panicked(sub.name(), info));
                    }
                }
            });
            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Emits a notice to all subscribers (non-blocking).
    pub fn emit(&self, notice: &Notice) {
        self.emit_arc(Arc::new(notice.clone()));
    }

    /// Emits a shared notice to all subscribers.
    ///
    /// On a full or closed queue the notice is dropped for that subscriber and a
    /// `SubscriberOverflow` notice is published, unless the dropped notice is an
    /// overflow notice itself.
    pub fn emit_arc(&self, notice: Arc<Notice>) {
        let is_overflow = notice.is_subscriber_overflow();

        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&notice)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            warn!(
                subscriber = channel.name,
                reason,
                kind = notice.kind.as_label(),
                "notice dropped"
            );
            if !is_overflow {
                self.bus
                    .publish(Notice::subscriber_overflow(channel.name, reason));
            }
        }
    }

    /// Closes all queues and waits for the workers to drain them.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::notices::NoticeKind;

    #[derive(Default)]
    struct Collect {
        seen: Mutex<Vec<NoticeKind>>,
    }

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_notice(&self, n: &Notice) {
            self.seen.lock().unwrap().push(n.kind);
        }
        fn name(&self) -> &'static str {
            "collect"
        }
    }

    struct Panics;

    #[async_trait]
    impl Subscribe for Panics {
        async fn on_notice(&self, _n: &Notice) {
            panic!("boom");
        }
        fn name(&self) -> &'static str {
            "panics"
        }
    }

    struct Stuck(Arc<Notify>);

    #[async_trait]
    impl Subscribe for Stuck {
        async fn on_notice(&self, _n: &Notice) {
            self.0.notified().await;
        }
        fn name(&self) -> &'static str {
            "stuck"
        }
        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn test_delivers_in_order_and_drains_on_shutdown() {
        let bus = Bus::new(16);
        let collect = Arc::new(Collect::default());
        let set = SubscriberSet::new(vec![collect.clone() as Arc<dyn Subscribe>], bus);

        set.emit(&Notice::new(NoticeKind::TeamRemoved));
        set.emit(&Notice::new(NoticeKind::TeamPromoted));
        set.shutdown().await;

        let seen = collect.seen.lock().unwrap().clone();
        assert_eq!(seen, [NoticeKind::TeamRemoved, NoticeKind::TeamPromoted]);
    }

    #[tokio::test]
    async fn test_panic_is_reported_on_bus() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Panics) as Arc<dyn Subscribe>], bus);

        set.emit(&Notice::new(NoticeKind::TeamAdmitted));
        let n = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(n.is_subscriber_panic());
        assert_eq!(n.subscriber, Some("panics"));
        assert_eq!(n.reason.as_deref(), Some("boom"));
        set.shutdown().await;
    }

    #[tokio::test]
    async fn test_full_queue_publishes_overflow() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let gate = Arc::new(Notify::new());
        let set = SubscriberSet::new(
            vec![Arc::new(Stuck(gate.clone())) as Arc<dyn Subscribe>],
            bus,
        );

        // worker takes at most one notice, queue holds one more
        for _ in 0..4 {
            set.emit(&Notice::new(NoticeKind::TeamAdmitted));
        }
        let n = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(n.is_subscriber_overflow());
        assert_eq!(n.reason.as_deref(), Some("full"));

        gate.notify_waiters();
        drop(set);
    }
}
