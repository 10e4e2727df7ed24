//! Simulated pipeline used as the demo status source.

use async_trait::async_trait;
use jobview_core::domain::{RecordStatus, Statistics, StatusRecord, StatusTable};
use jobview_core::ports::StatusSource;

const IN: &str = "in";
const OUT: &str = "out";
const ERR: &str = "err";

struct Node {
    name: String,
    stats: Statistics,
    done: bool,
}

impl Node {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stats: Statistics::new([IN, OUT, ERR]),
            done: false,
        }
    }

    fn record(&self) -> StatusRecord {
        let status = if self.done {
            RecordStatus::Done
        } else if self.stats.get(IN) == 0 {
            RecordStatus::Pending
        } else {
            RecordStatus::Running
        };
        let flags = if self.stats.get(ERR) > 0 { "!" } else { "" };
        StatusRecord::new(status, self.name.clone())
            .with_stats(self.stats.to_string())
            .with_flags(flags)
    }
}

/// Linear chain of nodes passing `total` items downstream, `batch` per tick.
///
/// The second node rejects every `fail_every`-th item it sees (0 disables).
pub struct SimulatedPipeline {
    nodes: Vec<Node>,
    total: u64,
    batch: u64,
    fail_every: u64,
}

impl SimulatedPipeline {
    pub fn new(names: &[&str], total: u64, batch: u64) -> Self {
        Self {
            nodes: names.iter().map(|name| Node::new(name)).collect(),
            total,
            batch: batch.max(1),
            fail_every: 0,
        }
    }

    pub fn with_fail_every(mut self, fail_every: u64) -> Self {
        self.fail_every = fail_every;
        self
    }

    pub fn table(&self) -> StatusTable {
        self.nodes.iter().map(Node::record).collect()
    }

    pub fn finished(&self) -> bool {
        self.nodes.iter().all(|node| node.done)
    }

    fn advance(&mut self) {
        for i in 0..self.nodes.len() {
            let (upstream_out, upstream_done) = match i {
                0 => (self.total, true),
                _ => {
                    let prev = &self.nodes[i - 1];
                    (prev.stats.get(OUT), prev.done)
                }
            };
            let fail_every = if i == 1 { self.fail_every } else { 0 };
            let node = &mut self.nodes[i];

            let consumed = node.stats.get(IN);
            let take = upstream_out.saturating_sub(consumed).min(self.batch);
            for seq in consumed + 1..=consumed + take {
                if fail_every > 0 && seq % fail_every == 0 {
                    node.stats.increment(ERR);
                } else {
                    node.stats.increment(OUT);
                }
            }
            node.stats.add(IN, take);
            node.done = upstream_done && node.stats.get(IN) == upstream_out;
        }
    }
}

#[async_trait]
impl StatusSource for SimulatedPipeline {
    async fn snapshot(&mut self) -> StatusTable {
        let table = self.table();
        self.advance();
        table
    }

    async fn is_finished(&mut self) -> bool {
        self.finished()
    }
}
