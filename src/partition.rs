//! Grouping of relation records into batches that can be written without
//! lock contention.
//!
//! A MERGE of an edge locks both endpoint nodes. Two transactions that touch
//! the same nodes in different orders can deadlock, so relations are grouped
//! before submission:
//!
//! * [`connected_batches`] puts every relation of one connected component in
//!   the same batch. Batches never share a node and may run concurrently. A
//!   very large component stays one batch and bounds the achievable
//!   parallelism; it is not split.
//! * [`ConflictFreeBatches`] repeatedly takes a greedy matching: within one
//!   batch no node repeats, but nodes do repeat across batches, so batches
//!   must be written one after another.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Batch, RelationRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStrategy {
    /// One batch per connected component; batches load in parallel.
    #[default]
    ConnectedComponents,
    /// Greedy node-disjoint batches; batches load sequentially.
    ConflictFree,
}

impl PartitionStrategy {
    /// Whether batches produced by this strategy may be written
    /// concurrently with each other.
    pub fn batches_are_disjoint(self) -> bool {
        matches!(self, PartitionStrategy::ConnectedComponents)
    }

    pub fn partition(self, relations: Vec<RelationRecord>) -> Partition {
        match self {
            PartitionStrategy::ConnectedComponents => connected_batches(relations),
            PartitionStrategy::ConflictFree => {
                let mut iter = ConflictFreeBatches::new(relations);
                let batches = iter.by_ref().collect();
                Partition {
                    batches,
                    skipped: iter.skipped(),
                }
            }
        }
    }
}

/// Batches plus the number of relations dropped for a missing endpoint.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub batches: Vec<Batch>,
    pub skipped: usize,
}

impl Partition {
    pub fn relation_count(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }
}

fn split_missing_endpoints(relations: Vec<RelationRecord>) -> (Vec<RelationRecord>, usize) {
    let mut kept = Vec::with_capacity(relations.len());
    let mut skipped = 0;
    for rel in relations {
        if rel.endpoints().is_some() {
            kept.push(rel);
        } else {
            warn!(relation = %rel.describe(), "skipping relation with a missing endpoint");
            skipped += 1;
        }
    }
    (kept, skipped)
}

const UNASSIGNED: u32 = u32::MAX;

/// Groups relations by the connected component of their endpoints.
///
/// Runs in O(N + R): node ids are interned into a dense arena, components
/// are labelled with an iterative depth-first search, then each relation is
/// moved into the batch of its component. Batches come out in order of the
/// first appearance of their component in the input.
pub fn connected_batches(relations: Vec<RelationRecord>) -> Partition {
    let (relations, skipped) = split_missing_endpoints(relations);

    let component_of_relation = {
        let mut index: HashMap<&str, u32> = HashMap::new();
        let mut adjacency: Vec<Vec<u32>> = Vec::new();
        let mut starts: Vec<u32> = Vec::with_capacity(relations.len());

        // Every kept relation has both endpoints, so `starts` stays aligned
        // with `relations`.
        for (start, end) in relations.iter().filter_map(RelationRecord::endpoints) {
            let s = *index.entry(start).or_insert_with(|| {
                adjacency.push(Vec::new());
                (adjacency.len() - 1) as u32
            });
            let e = *index.entry(end).or_insert_with(|| {
                adjacency.push(Vec::new());
                (adjacency.len() - 1) as u32
            });
            adjacency[s as usize].push(e);
            if s != e {
                adjacency[e as usize].push(s);
            }
            starts.push(s);
        }

        let mut component = vec![UNASSIGNED; adjacency.len()];
        let mut next_component = 0u32;
        let mut stack: Vec<u32> = Vec::new();
        // Interned ids are dense and in first-appearance order, so walking
        // them in order keeps component numbering deterministic.
        for root in 0..adjacency.len() {
            if component[root] != UNASSIGNED {
                continue;
            }
            stack.push(root as u32);
            while let Some(n) = stack.pop() {
                let n = n as usize;
                if component[n] != UNASSIGNED {
                    continue;
                }
                component[n] = next_component;
                stack.extend(
                    adjacency[n]
                        .iter()
                        .copied()
                        .filter(|&m| component[m as usize] == UNASSIGNED),
                );
            }
            next_component += 1;
        }

        debug!(
            nodes = adjacency.len(),
            components = next_component,
            "labelled connected components"
        );

        starts
            .into_iter()
            .map(|s| component[s as usize])
            .collect::<Vec<_>>()
    };

    let component_count = component_of_relation
        .iter()
        .copied()
        .max()
        .map_or(0, |max| max as usize + 1);
    let mut batches: Vec<Batch> = vec![Batch::default(); component_count];
    for (rel, cid) in relations.into_iter().zip(component_of_relation) {
        batches[cid as usize].relations.push(rel);
    }

    Partition { batches, skipped }
}

/// Iterator over node-disjoint batches.
///
/// Each pass scans the remaining relations and accepts one only if neither
/// endpoint was used earlier in the same pass; rejected relations carry
/// over to the next pass.
#[derive(Debug)]
pub struct ConflictFreeBatches {
    remaining: Vec<RelationRecord>,
    skipped: usize,
}

impl ConflictFreeBatches {
    pub fn new(relations: Vec<RelationRecord>) -> Self {
        let (remaining, skipped) = split_missing_endpoints(relations);
        Self { remaining, skipped }
    }

    /// Relations dropped for a missing endpoint.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for ConflictFreeBatches {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.remaining.is_empty() {
            return None;
        }

        let pending = std::mem::take(&mut self.remaining);
        let mut used: HashSet<String> = HashSet::new();
        let mut batch = Vec::new();

        for rel in pending {
            let accept = match rel.endpoints() {
                Some((start, end)) => !used.contains(start) && !used.contains(end),
                None => continue,
            };
            if accept {
                if let Some((start, end)) = rel.endpoints() {
                    used.insert(start.to_string());
                    used.insert(end.to_string());
                }
                batch.push(rel);
            } else {
                self.remaining.push(rel);
            }
        }

        if batch.is_empty() {
            None
        } else {
            Some(Batch::new(batch))
        }
    }
}
