//! 在途请求计数器
//!
//! 为任意数量的 UI 观察者提供“当前是否有网络请求在途”的实时视图，
//! 观察者不需要关心具体是哪个请求。计数器本身不会失败，纯粹是簿记。

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Listener = Arc<dyn Fn(usize) + Send + Sync>;

#[derive(Default)]
struct TrackerState {
    count: usize,
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

/// 在途请求计数器
///
/// 克隆得到的是同一个计数器的句柄。
///
/// 每次变更与随后的通知在 `delivery` 锁内串行完成，订阅者看到的最后一个值总是
/// 计数器的最终值。通知在状态锁外执行，回调中可以再次读取计数器，但不能修改它。
#[derive(Clone, Default)]
pub struct RequestTracker {
    state: Arc<Mutex<TrackerState>>,
    delivery: Arc<Mutex<()>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        // 回调在锁外执行，锁中毒只可能来自计数本身，数据仍然一致
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn serialize_delivery(&self) -> MutexGuard<'_, ()> {
        self.delivery.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 计数加 1 并通知所有订阅者
    pub fn increment(&self) {
        let _delivery = self.serialize_delivery();
        let (count, listeners) = {
            let mut state = self.lock();
            state.count += 1;
            (state.count, snapshot(&state))
        };
        notify(&listeners, count);
    }

    /// 计数减 1（最小为 0）并通知所有订阅者
    ///
    /// 多于 `increment` 的调用不会产生负数，也不会 panic。
    pub fn decrement(&self) {
        let _delivery = self.serialize_delivery();
        let (count, listeners) = {
            let mut state = self.lock();
            state.count = state.count.saturating_sub(1);
            (state.count, snapshot(&state))
        };
        notify(&listeners, count);
    }

    pub fn get_count(&self) -> usize {
        self.lock().count
    }

    pub fn is_busy(&self) -> bool {
        self.get_count() > 0
    }

    /// 注册订阅者
    ///
    /// 回调会立即以当前值调用一次，之后每次变化都会再次调用。
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(callback);
        let _delivery = self.serialize_delivery();
        let (id, count) = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.insert(id, listener.clone());
            (id, state.count)
        };
        listener(count);

        Subscription {
            id,
            state: Arc::downgrade(&self.state),
        }
    }

    /// 标记一个请求开始在途，返回的守卫在 drop 时恰好减计数一次
    pub fn track(&self) -> InFlight {
        self.increment();
        InFlight {
            tracker: self.clone(),
        }
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

fn snapshot(state: &TrackerState) -> Vec<Listener> {
    state.listeners.values().cloned().collect()
}

fn notify(listeners: &[Listener], count: usize) {
    for listener in listeners {
        listener(count);
    }
}

/// 订阅句柄
///
/// 多次调用 `unsubscribe` 是安全的空操作。
pub struct Subscription {
    id: u64,
    state: Weak<Mutex<TrackerState>>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(state) = self.state.upgrade() {
            let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
            state.listeners.remove(&self.id);
        }
    }
}

/// 在途请求守卫：无论请求成功、失败还是 future 被丢弃，都会减计数
#[must_use = "dropping the guard immediately ends the in-flight request"]
pub struct InFlight {
    tracker: RequestTracker,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.tracker.decrement();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn recorder(tracker: &RequestTracker) -> (Arc<Mutex<Vec<usize>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let sub = tracker.subscribe(move |n| sink.lock().unwrap().push(n));
        (seen, sub)
    }

    #[rstest]
    #[case(&[])]
    #[case(&[true, true, false])]
    #[case(&[false, false, true])]
    #[case(&[true, false, false, false, true, true])]
    #[case(&[false, true, true, false, true, false, false, false])]
    fn test_count_never_negative_and_clamped(#[case] ops: &[bool]) {
        let tracker = RequestTracker::new();
        let mut expected: usize = 0;

        for &inc in ops {
            if inc {
                tracker.increment();
                expected += 1;
            } else {
                tracker.decrement();
                expected = expected.saturating_sub(1);
            }
            assert_eq!(tracker.get_count(), expected);
        }
    }

    #[test]
    fn test_decrement_without_increment_is_noop() {
        let tracker = RequestTracker::new();
        tracker.decrement();
        tracker.decrement();
        assert_eq!(tracker.get_count(), 0);

        tracker.increment();
        assert_eq!(tracker.get_count(), 1);
    }

    #[test]
    fn test_subscribe_receives_current_value_immediately() {
        let tracker = RequestTracker::new();
        tracker.increment();
        tracker.increment();

        let (seen, _sub) = recorder(&tracker);
        assert_eq!(*seen.lock().unwrap(), vec![2]);

        tracker.decrement();
        assert_eq!(*seen.lock().unwrap(), vec![2, 1]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications_and_is_idempotent() {
        let tracker = RequestTracker::new();
        let (seen, sub) = recorder(&tracker);

        tracker.increment();
        sub.unsubscribe();
        sub.unsubscribe();
        tracker.increment();

        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
        assert_eq!(tracker.listener_count(), 0);
    }

    #[test]
    fn test_unsubscribe_after_tracker_dropped() {
        let tracker = RequestTracker::new();
        let (_seen, sub) = recorder(&tracker);
        drop(tracker);
        sub.unsubscribe();
    }

    #[test]
    fn test_concurrent_requests_settling_in_reverse_order() {
        let tracker = RequestTracker::new();
        let (seen, _sub) = recorder(&tracker);

        let first = tracker.track();
        let second = tracker.track();
        assert!(tracker.is_busy());

        drop(second);
        assert!(tracker.is_busy());
        drop(first);

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 1, 0]);
        assert!(!tracker.is_busy());
    }

    #[test]
    fn test_listener_may_read_tracker_reentrantly() {
        let tracker = RequestTracker::new();
        let inner = tracker.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = tracker.subscribe(move |n| sink.lock().unwrap().push((n, inner.get_count())));

        tracker.increment();
        assert_eq!(*seen.lock().unwrap(), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_last_notification_matches_settled_count_across_threads() {
        use std::sync::mpsc;
        use std::time::Duration;

        let tracker = RequestTracker::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (entered_tx, entered_rx) = mpsc::channel();
        let entered_tx = Mutex::new(Some(entered_tx));
        let sink = seen.clone();
        let _sub = tracker.subscribe(move |n| {
            if n == 1 {
                if let Some(tx) = entered_tx.lock().unwrap().take() {
                    tx.send(()).unwrap();
                }
                // 拖慢这次通知，让另一线程的变更在此期间发生
                std::thread::sleep(Duration::from_millis(50));
            }
            sink.lock().unwrap().push(n);
        });

        let other = tracker.clone();
        let handle = std::thread::spawn(move || other.increment());
        entered_rx.recv().unwrap();
        tracker.decrement();
        handle.join().unwrap();

        assert_eq!(tracker.get_count(), 0);
        assert_eq!(seen.lock().unwrap().last(), Some(&0));
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 0]);
    }

    #[test]
    fn test_parity_across_threads() {
        let tracker = RequestTracker::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let _guard = tracker.track();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(tracker.get_count(), 0);
    }
}
