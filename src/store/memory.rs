//! In-process [`GraphStore`] used by `--dry-run` and by the test suite.
//!
//! It keeps MERGE semantics (nodes keyed by `(label, id)`, edges keyed by
//! `(start_id, type, end_id)`), applies staged writes only on commit, and
//! models the lock manager of a real store: every statement locks the nodes
//! it touches until its transaction ends, and a statement that needs a node
//! locked by another open transaction fails with a transient error instead
//! of waiting.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::{GraphStore, StoreTxn};
use crate::domain::{Label, NodeRecord, RelType, RelationRecord};
use crate::error::StoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeProps {
    pub pmid: Option<String>,
    pub pmcid: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub transactions: u64,
    pub statements: u64,
    pub commits: u64,
    pub rollbacks: u64,
    /// Transactions dropped without commit or rollback.
    pub abandoned: u64,
}

/// A failure the store reports for every statement that targets a label or
/// relation type.
#[derive(Debug, Clone)]
pub enum Fault {
    Label { label: String, error: StoreError },
    RelType { rel_type: String, error: StoreError },
}

type EdgeKey = (String, String, String);

#[derive(Debug, Default)]
struct State {
    nodes: HashMap<(String, String), NodeRecord>,
    labels_by_id: HashMap<String, BTreeSet<String>>,
    edges: HashMap<EdgeKey, EdgeProps>,
    locks: HashMap<String, u64>,
    stats: StoreStats,
}

impl State {
    fn release(&mut self, txn: u64) {
        self.locks.retain(|_, owner| *owner != txn);
    }

    fn acquire(&mut self, txn: u64, keys: &[String]) -> Result<(), StoreError> {
        if let Some(key) = keys
            .iter()
            .find(|k| matches!(self.locks.get(*k), Some(owner) if *owner != txn))
        {
            return Err(StoreError::Transient(format!(
                "lock conflict: node {key} is locked by another transaction"
            )));
        }
        for key in keys {
            self.locks.insert(key.clone(), txn);
        }
        Ok(())
    }
}

fn node_key(label: &str, id: &str) -> String {
    format!("{label}:{id}")
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    faults: Arc<Mutex<Vec<Fault>>>,
    reachable: bool,
    latency: Option<Duration>,
    next_txn: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            faults: Arc::new(Mutex::new(Vec::new())),
            reachable: true,
            latency: None,
            next_txn: AtomicU64::new(1),
        }
    }

    /// A store whose connectivity check and `begin` always fail.
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new()
        }
    }

    /// Sleep this long inside every statement, holding its locks.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn inject(&self, fault: Fault) {
        self.faults
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(fault);
    }

    pub fn node_count(&self) -> usize {
        lock(&self.state).nodes.len()
    }

    pub fn count_label(&self, label: &str) -> usize {
        lock(&self.state)
            .nodes
            .keys()
            .filter(|(l, _)| l == label)
            .count()
    }

    pub fn node(&self, label: &str, id: &str) -> Option<NodeRecord> {
        lock(&self.state)
            .nodes
            .get(&(label.to_string(), id.to_string()))
            .cloned()
    }

    pub fn edge_count(&self) -> usize {
        lock(&self.state).edges.len()
    }

    pub fn edge(&self, start_id: &str, rel_type: &str, end_id: &str) -> Option<EdgeProps> {
        lock(&self.state)
            .edges
            .get(&(start_id.to_string(), rel_type.to_string(), end_id.to_string()))
            .cloned()
    }

    pub fn stats(&self) -> StoreStats {
        lock(&self.state).stats
    }

    /// Node locks currently held by open transactions.
    pub fn locks_held(&self) -> usize {
        lock(&self.state).locks.len()
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn verify(&self) -> Result<(), StoreError> {
        if self.reachable {
            Ok(())
        } else {
            Err(StoreError::Connection("memory store is unreachable".into()))
        }
    }

    async fn begin(&self) -> Result<Box<dyn StoreTxn>, StoreError> {
        self.verify().await?;
        let id = self.next_txn.fetch_add(1, Ordering::Relaxed);
        lock(&self.state).stats.transactions += 1;
        Ok(Box::new(MemoryTxn {
            id,
            state: Arc::clone(&self.state),
            faults: Arc::clone(&self.faults),
            latency: self.latency,
            staged_nodes: Vec::new(),
            staged_edges: Vec::new(),
            finished: false,
        }))
    }
}

struct MemoryTxn {
    id: u64,
    state: Arc<Mutex<State>>,
    faults: Arc<Mutex<Vec<Fault>>>,
    latency: Option<Duration>,
    staged_nodes: Vec<NodeRecord>,
    staged_edges: Vec<(EdgeKey, EdgeProps)>,
    finished: bool,
}

impl MemoryTxn {
    fn fault_for(&self, matches: impl Fn(&Fault) -> bool) -> Option<StoreError> {
        self.faults
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .find(|f| matches(f))
            .map(|f| match f {
                Fault::Label { error, .. } | Fault::RelType { error, .. } => error.clone(),
            })
    }

    async fn pause(&self) {
        match self.latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => tokio::task::yield_now().await,
        }
    }

    /// Node keys an endpoint id matches, across every label, including
    /// nodes staged by this transaction.
    fn matching_nodes(&self, state: &State, id: &str) -> Vec<String> {
        let mut keys: BTreeSet<String> = state
            .labels_by_id
            .get(id)
            .into_iter()
            .flatten()
            .map(|label| node_key(label, id))
            .collect();
        keys.extend(
            self.staged_nodes
                .iter()
                .filter(|n| n.id == id)
                .map(|n| node_key(&n.label, id)),
        );
        keys.into_iter().collect()
    }
}

#[async_trait]
impl StoreTxn for MemoryTxn {
    async fn upsert_nodes(&mut self, label: &Label, rows: &[NodeRecord]) -> Result<(), StoreError> {
        if let Some(err) =
            self.fault_for(|f| matches!(f, Fault::Label { label: l, .. } if l == label.as_str()))
        {
            return Err(err);
        }

        let keys: Vec<String> = rows.iter().map(|r| node_key(label.as_str(), &r.id)).collect();
        {
            let mut state = lock(&self.state);
            state.stats.statements += 1;
            state.acquire(self.id, &keys)?;
        }

        self.staged_nodes.extend(rows.iter().map(|r| NodeRecord {
            label: label.as_str().to_string(),
            ..r.clone()
        }));
        self.pause().await;
        Ok(())
    }

    async fn upsert_relations(
        &mut self,
        rel_type: &RelType,
        rows: &[RelationRecord],
    ) -> Result<(), StoreError> {
        if let Some(err) = self.fault_for(
            |f| matches!(f, Fault::RelType { rel_type: t, .. } if t == rel_type.as_str()),
        ) {
            return Err(err);
        }

        let mut staged = Vec::new();
        {
            let mut state = lock(&self.state);
            state.stats.statements += 1;

            let mut keys: HashSet<String> = HashSet::new();
            for row in rows {
                let Some((start, end)) = row.endpoints() else {
                    continue;
                };
                let starts = self.matching_nodes(&state, start);
                let ends = self.matching_nodes(&state, end);
                if starts.is_empty() || ends.is_empty() {
                    continue;
                }
                keys.extend(starts);
                keys.extend(ends);
                staged.push((
                    (start.to_string(), rel_type.as_str().to_string(), end.to_string()),
                    EdgeProps {
                        pmid: row.pmid.clone(),
                        pmcid: row.pmcid.clone(),
                    },
                ));
            }
            let keys: Vec<String> = keys.into_iter().collect();
            state.acquire(self.id, &keys)?;
        }

        self.staged_edges.extend(staged);
        self.pause().await;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut this = self;
        let shared = Arc::clone(&this.state);
        let mut state = lock(&shared);
        for node in this.staged_nodes.drain(..) {
            state
                .labels_by_id
                .entry(node.id.clone())
                .or_default()
                .insert(node.label.clone());
            state.nodes.insert((node.label.clone(), node.id.clone()), node);
        }
        for (key, props) in this.staged_edges.drain(..) {
            state.edges.insert(key, props);
        }
        state.release(this.id);
        state.stats.commits += 1;
        drop(state);
        this.finished = true;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        let mut this = self;
        let shared = Arc::clone(&this.state);
        let mut state = lock(&shared);
        state.release(this.id);
        state.stats.rollbacks += 1;
        drop(state);
        this.finished = true;
        Ok(())
    }
}

impl Drop for MemoryTxn {
    fn drop(&mut self) {
        if !self.finished {
            let mut state = lock(&self.state);
            state.release(self.id);
            state.stats.abandoned += 1;
        }
    }
}
