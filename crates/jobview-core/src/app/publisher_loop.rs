//! PublisherLoop - ステータスの定期配信
//!
//! # フロー
//! 1. initialize: 最初のスナップショットを `StatusModel::set()` で配信
//! 2. run: interval ごとに `StatusSource::snapshot()` を取り、配信
//! 3. finalize: source が終了したら最後のスナップショットを配信して停止

use std::future::Future;
use std::time::Duration;

use crate::app::model::StatusModel;
use crate::ports::StatusSource;

/// Default delay between two pushes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(250);

/// Shortest accepted delay; `tokio::time::interval` rejects zero.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(1);

/// How a publisher run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The source reported completion and the final snapshot was pushed.
    Finished { pushes: usize },
    /// The shutdown future resolved first.
    Interrupted { pushes: usize },
}

impl PublishOutcome {
    pub fn pushes(self) -> usize {
        match self {
            PublishOutcome::Finished { pushes } | PublishOutcome::Interrupted { pushes } => pushes,
        }
    }
}

/// Pulls snapshots from a [`StatusSource`] and replaces the model's table.
pub struct PublisherLoop<Src> {
    source: Src,
    model: StatusModel,
    interval: Duration,
}

impl<Src: StatusSource> PublisherLoop<Src> {
    pub fn new(source: Src, model: StatusModel) -> Self {
        Self {
            source,
            model,
            interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Set the delay between pushes (clamped to [`MIN_REFRESH_INTERVAL`]).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_REFRESH_INTERVAL);
        self
    }

    /// Run until the source finishes.
    pub async fn run(self) -> PublishOutcome {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Run until the source finishes or `shutdown` resolves.
    pub async fn run_until<F>(mut self, shutdown: F) -> PublishOutcome
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        // initialize
        self.publish().await;
        let mut pushes = 1;
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(pushes, "publisher interrupted");
                    return PublishOutcome::Interrupted { pushes };
                }
                _ = ticker.tick() => {
                    let finished = self.source.is_finished().await;
                    self.publish().await;
                    pushes += 1;
                    if finished {
                        tracing::info!(pushes, "publisher finished");
                        return PublishOutcome::Finished { pushes };
                    }
                }
            }
        }
    }

    async fn publish(&mut self) {
        let table = self.source.snapshot().await;
        tracing::trace!(rows = table.len(), "publishing status table");
        self.model.set(table);
    }
}
