//! StatusModel - ステータス表の正本と変更通知
//!
//! # 学習ポイント
//! - Arc<Mutex<_>> による共有状態
//! - ロックを解放してから observer を呼ぶ（再入可能性）
//! - Drop で購読解除する RAII ハンドル

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::domain::StatusTable;

type Observer = Arc<dyn Fn() + Send + Sync>;

struct Registration {
    id: u64,
    observer: Observer,
}

struct ModelState {
    table: StatusTable,
    observers: Vec<Registration>,
    next_id: u64,
}

impl ModelState {
    fn is_registered(&self, id: u64) -> bool {
        self.observers.iter().any(|r| r.id == id)
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.observers.len();
        self.observers.retain(|r| r.id != id);
        self.observers.len() != before
    }
}

fn lock(state: &Mutex<ModelState>) -> MutexGuard<'_, ModelState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the authoritative [`StatusTable`] and notifies observers when it is
/// replaced.
///
/// Cloning yields another handle to the same model.
///
/// # 通知の規約
/// - `set()` は表を丸ごと置き換えてから、登録順に observer を同期的に呼ぶ
/// - observer には引数を渡さない（必要なら `get()` で読み直す）
/// - 通知中はロックを保持しないので、observer から `get()` / `set()` /
///   購読解除を呼んでもよい
/// - 通知ラウンドの途中で解除された observer は、そのラウンドでは呼ばれない
#[derive(Clone)]
pub struct StatusModel {
    state: Arc<Mutex<ModelState>>,
}

impl StatusModel {
    /// A model holding an empty table.
    pub fn new() -> Self {
        Self::with_table(StatusTable::empty())
    }

    pub fn with_table(table: StatusTable) -> Self {
        Self {
            state: Arc::new(Mutex::new(ModelState {
                table,
                observers: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Snapshot of the current table.
    pub fn get(&self) -> StatusTable {
        lock(&self.state).table.clone()
    }

    /// Replace the table wholesale and notify every observer.
    pub fn set(&self, table: StatusTable) {
        let rows = table.len();
        let pending: Vec<(u64, Observer)> = {
            let mut state = lock(&self.state);
            state.table = table;
            state
                .observers
                .iter()
                .map(|r| (r.id, Arc::clone(&r.observer)))
                .collect()
        };
        tracing::trace!(rows, observers = pending.len(), "status table replaced");

        for (id, observer) in pending {
            if lock(&self.state).is_registered(id) {
                observer();
            }
        }
    }

    /// Register an observer, called once per `set()`.
    ///
    /// Dropping the returned handle unsubscribes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_change<F>(&self, observer: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut state = lock(&self.state);
        let id = state.next_id;
        state.next_id += 1;
        state.observers.push(Registration {
            id,
            observer: Arc::new(observer),
        });
        Subscription {
            id,
            model: Arc::downgrade(&self.state),
        }
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.state).observers.len()
    }
}

impl Default for StatusModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StatusModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("StatusModel")
            .field("rows", &state.table.len())
            .field("observers", &state.observers.len())
            .finish()
    }
}

/// Revocable observer registration.
///
/// Holds the model weakly: a subscription never keeps a model alive.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    model: Weak<Mutex<ModelState>>,
}

impl Subscription {
    /// Remove the observer. Safe to call any number of times, including
    /// from inside the observer itself.
    pub fn unsubscribe(&self) {
        let Some(state) = self.model.upgrade() else {
            return;
        };
        let removed = lock(&state).remove(self.id);
        if removed {
            tracing::trace!(subscription = self.id, "observer removed");
        }
    }

    pub fn is_active(&self) -> bool {
        let Some(state) = self.model.upgrade() else {
            return false;
        };
        let registered = lock(&state).is_registered(self.id);
        registered
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatusRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn one_row(name: &str) -> StatusTable {
        StatusTable::new(vec![StatusRecord::new("running", name)])
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn new_model_holds_empty_table() {
        assert!(StatusModel::new().get().is_empty());
    }

    #[test]
    fn set_replaces_the_whole_table() {
        let model = StatusModel::with_table(one_row("a"));
        model.set(one_row("b"));

        let table = model.get();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].name(), "b");
    }

    #[test]
    fn snapshot_is_unaffected_by_later_set() {
        let model = StatusModel::with_table(one_row("a"));
        let snapshot = model.get();
        model.set(one_row("b"));
        assert_eq!(snapshot.records()[0].name(), "a");
    }

    #[test]
    fn every_observer_is_called_once_per_set() {
        let model = StatusModel::new();
        let (first, f1) = counter();
        let (second, f2) = counter();
        let _s1 = model.on_change(f1);
        let _s2 = model.on_change(f2);

        model.set(one_row("a"));
        model.set(one_row("b"));

        assert_eq!(first.load(Ordering::SeqCst), 2);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn observers_run_in_registration_order() {
        let model = StatusModel::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let subs: Vec<Subscription> = (0..3)
            .map(|i| {
                let order = Arc::clone(&order);
                model.on_change(move || order.lock().unwrap().push(i))
            })
            .collect();

        model.set(StatusTable::empty());

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn observer_can_read_model_during_notification() {
        let model = StatusModel::new();
        let seen = Arc::new(Mutex::new(None));
        let reader = model.clone();
        let sink = Arc::clone(&seen);
        let _sub = model.on_change(move || {
            *sink.lock().unwrap() = Some(reader.get().len());
        });

        model.set(one_row("a"));
        assert_eq!(*seen.lock().unwrap(), Some(1));
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let model = StatusModel::new();
        let (count, f) = counter();
        let sub = model.on_change(f);

        sub.unsubscribe();
        sub.unsubscribe();
        model.set(one_row("a"));

        assert!(!sub.is_active());
        assert_eq!(model.observer_count(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let model = StatusModel::new();
        let (count, f) = counter();
        drop(model.on_change(f));

        model.set(one_row("a"));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn observer_removed_mid_round_is_skipped() {
        let model = StatusModel::new();
        let victim_slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&victim_slot);
        let _killer = model.on_change(move || {
            if let Some(sub) = slot.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
        });
        let (count, f) = counter();
        *victim_slot.lock().unwrap() = Some(model.on_change(f));

        model.set(one_row("a"));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn subscription_outliving_model_is_harmless() {
        let model = StatusModel::new();
        let sub = model.on_change(|| {});
        drop(model);

        assert!(!sub.is_active());
        sub.unsubscribe();
    }
}
