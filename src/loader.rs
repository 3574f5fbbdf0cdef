//! Parallel loading of nodes and relations into a [`GraphStore`].
//!
//! Nodes load one unit per label, concurrently, and a failed label does not
//! stop its siblings. Relations load one unit per (batch, type); batches from
//! the connected-component strategy run concurrently, conflict-free batches
//! run one after another. The first failed relation unit stops the stage and
//! is returned to the caller: relations carry meaning that must not vanish
//! silently, and every write is an idempotent upsert, so re-running the stage
//! is always safe.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use futures::future;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::{LoaderConfig, Vocabulary};
use crate::domain::{Batch, Label, NodeRecord, RelType, RelationRecord};
use crate::error::{LoadError, Result, StoreError};
use crate::normalize;
use crate::report::{BatchOutcome, LabelOutcome, LabelStatus, LoadReport, NodeReport, RelationReport};
use crate::store::{write_unit, GraphStore, WriteUnit};

/// Sources and selections for one [`Loader::run`].
#[derive(Debug, Clone, Default)]
pub struct LoadRequest {
    pub entities: Option<PathBuf>,
    pub relations: Option<PathBuf>,
    /// Labels to load; each must be in the vocabulary.
    pub labels: Vec<String>,
    /// Relation types to load; each must be in the vocabulary.
    pub rel_types: Vec<String>,
}

/// A relation unit that failed, with the types of the same batch that had
/// already committed.
struct BatchFailure {
    rel_type: RelType,
    source: StoreError,
    committed_types: Vec<String>,
}

impl BatchFailure {
    fn new(rel_type: RelType, source: StoreError, committed: BTreeMap<String, usize>) -> Self {
        Self {
            rel_type,
            source,
            committed_types: committed.into_keys().collect(),
        }
    }
}

pub struct Loader {
    store: Arc<dyn GraphStore>,
    vocab: Vocabulary,
    config: LoaderConfig,
    cancel: CancellationToken,
}

impl Loader {
    pub fn new(store: Arc<dyn GraphStore>, vocab: Vocabulary, config: LoaderConfig) -> Self {
        Self {
            store,
            vocab,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Cancelling `cancel` stops submission of new units and drops the ones
    /// in flight; their transactions are never committed.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    fn workers(&self) -> usize {
        self.config.max_workers.max(1)
    }

    /// Reads both sources, checks them against the vocabulary, verifies the
    /// store, then loads nodes followed by relations.
    pub async fn run(&self, request: &LoadRequest) -> Result<LoadReport> {
        let load_nodes = request.entities.is_some() && !request.labels.is_empty();
        let load_rels = request.relations.is_some() && !request.rel_types.is_empty();
        if !(load_nodes || load_rels) {
            return Err(LoadError::NothingToLoad);
        }

        // Every input and configuration check happens before the first
        // store round trip.
        let needs_relations = load_rels || (load_nodes && self.config.only_related);
        let relations = match &request.relations {
            Some(path) if needs_relations => Some(normalize::read_relations_from_path(path)?),
            _ => None,
        };
        let nodes = match &request.entities {
            Some(path) if load_nodes => Some(normalize::read_nodes_from_path(path)?),
            _ => None,
        };
        if load_rels {
            self.selected_rel_types(&request.rel_types)?;
        }

        self.store.verify().await.map_err(LoadError::Connectivity)?;

        let mut report = LoadReport::start();
        info!(run_id = %report.run_id, strategy = ?self.config.strategy, "starting load");

        if let Some(mut nodes) = nodes {
            let mut unrelated = 0;
            if self.config.only_related {
                match &relations {
                    Some(relations) => unrelated = normalize::retain_related(&mut nodes, relations),
                    None => warn!("no relations source given, loading every node"),
                }
            }
            let mut node_report = self.load_nodes(nodes, &request.labels).await?;
            node_report.unrelated_dropped = unrelated;
            report.nodes = Some(node_report);
        }

        if load_rels {
            if let Some(relations) = relations {
                report.relations = Some(self.load_relations(relations, &request.rel_types).await?);
            }
        }

        report.finish();
        info!(run_id = %report.run_id, complete = report.is_complete(), "load finished");
        Ok(report)
    }

    /// Loads one unit per requested label. Unknown labels, and input groups
    /// whose label is not in the vocabulary, are rejected without touching
    /// the store. A failing label is recorded and the others proceed.
    ///
    /// Only cancellation makes this return an error.
    pub async fn load_nodes(&self, nodes: Vec<NodeRecord>, labels: &[String]) -> Result<NodeReport> {
        let mut groups = normalize::group_by_label(nodes);
        let requested: BTreeSet<&str> = labels.iter().map(|l| l.trim()).collect();

        let mut outcomes = Vec::new();
        let mut units: Vec<(Label, Vec<NodeRecord>)> = Vec::new();

        for raw in requested {
            let rows = groups.remove(raw).unwrap_or_default();
            match self.vocab.label(raw) {
                Err(err) => {
                    warn!(label = raw, rows = rows.len(), error = %err, "rejecting label group");
                    outcomes.push(LabelOutcome {
                        label: raw.to_string(),
                        status: LabelStatus::Rejected {
                            rows: rows.len(),
                            reason: err.to_string(),
                        },
                    });
                }
                Ok(label) if rows.is_empty() => {
                    warn!(label = %label, "no nodes with this label in the input");
                    outcomes.push(LabelOutcome {
                        label: label.to_string(),
                        status: LabelStatus::Empty,
                    });
                }
                Ok(label) => units.push((label, rows)),
            }
        }

        for (raw, rows) in groups {
            match self.vocab.label(&raw) {
                Err(err) => {
                    warn!(label = %raw, rows = rows.len(), error = %err, "rejecting label group");
                    outcomes.push(LabelOutcome {
                        label: raw,
                        status: LabelStatus::Rejected {
                            rows: rows.len(),
                            reason: err.to_string(),
                        },
                    });
                }
                Ok(label) => debug!(label = %label, rows = rows.len(), "label not selected"),
            }
        }

        let store = &*self.store;
        let batch_size = self.config.batch_size;
        let mut pending = stream::iter(units)
            .map(|(label, rows)| async move {
                let result = write_unit(
                    store,
                    WriteUnit::Nodes {
                        label: &label,
                        rows: &rows,
                    },
                    batch_size,
                )
                .await;
                (label, rows.len(), result)
            })
            .buffer_unordered(self.workers());

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(LoadError::Interrupted),
                next = pending.next() => next,
            };
            let Some((label, rows, result)) = next else {
                break;
            };
            let status = match result {
                Ok(written) => {
                    info!(label = %label, rows = written, "loaded nodes");
                    LabelStatus::Loaded { rows: written }
                }
                Err(err) => {
                    warn!(label = %label, rows, error = %err, "failed to load nodes");
                    LabelStatus::Failed {
                        rows,
                        error: err.to_string(),
                        retryable: err.is_transient(),
                    }
                }
            };
            outcomes.push(LabelOutcome {
                label: label.to_string(),
                status,
            });
        }

        outcomes.sort_by(|a, b| a.label.cmp(&b.label));
        let report = NodeReport {
            labels: outcomes,
            unrelated_dropped: 0,
        };
        info!(
            rows = report.rows_loaded(),
            failed = report.failed().count(),
            rejected = report.rejected().count(),
            "node stage done"
        );
        Ok(report)
    }

    fn selected_rel_types(&self, rel_types: &[String]) -> Result<Vec<RelType>> {
        let mut selected: BTreeMap<String, RelType> = BTreeMap::new();
        for raw in rel_types {
            let rel_type = self.vocab.rel_type(raw)?;
            selected.insert(rel_type.to_string(), rel_type);
        }
        Ok(selected.into_values().collect())
    }

    /// Partitions the relations and loads every batch. An unknown requested
    /// type fails the stage before any store call. Rows whose own type is
    /// unknown or blank are rejected per type and never written. The first
    /// store failure stops the stage and is returned.
    pub async fn load_relations(
        &self,
        relations: Vec<RelationRecord>,
        rel_types: &[String],
    ) -> Result<RelationReport> {
        let types = self.selected_rel_types(rel_types)?;

        let strategy = self.config.strategy;
        let mut report = RelationReport::new(strategy);

        let mut selected = Vec::with_capacity(relations.len());
        for rel in relations {
            if types.iter().any(|t| t.as_str() == rel.rel_type) {
                selected.push(rel);
            } else if self.vocab.rel_type(&rel.rel_type).is_ok() {
                report.not_selected += 1;
            } else {
                *report.rejected_types.entry(rel.rel_type).or_default() += 1;
            }
        }
        for (rel_type, rows) in &report.rejected_types {
            warn!(rel_type = %rel_type, rows, "rejecting relations of an unknown type");
        }

        let partition = strategy.partition(selected);
        report.skipped_missing_endpoint = partition.skipped;
        info!(
            batches = partition.batches.len(),
            relations = partition.relation_count(),
            strategy = ?strategy,
            "partitioned relations"
        );

        if strategy.batches_are_disjoint() {
            self.load_batches_concurrently(partition.batches, &types, &mut report)
                .await?;
        } else {
            self.load_batches_in_order(partition.batches, &types, &mut report)
                .await?;
        }

        info!(
            relations = report.relations_loaded(),
            batches = report.batches.len(),
            "relation stage done"
        );
        Ok(report)
    }

    async fn load_batches_concurrently(
        &self,
        batches: Vec<Batch>,
        types: &[RelType],
        report: &mut RelationReport,
    ) -> Result<()> {
        let mut pending = stream::iter(batches.into_iter().enumerate())
            .map(|(index, batch)| async move { (index, self.write_batch(index, batch, types).await) })
            .buffer_unordered(self.workers());

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(LoadError::Interrupted),
                next = pending.next() => next,
            };
            match next {
                None => return Ok(()),
                Some((_, Ok(outcome))) => self.record(outcome, report),
                Some((index, Err(failure))) => return Err(self.batch_failed(index, failure, report)),
            }
        }
    }

    async fn load_batches_in_order(
        &self,
        batches: Vec<Batch>,
        types: &[RelType],
        report: &mut RelationReport,
    ) -> Result<()> {
        for (index, batch) in batches.into_iter().enumerate() {
            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(LoadError::Interrupted),
                result = self.write_batch(index, batch, types) => result,
            };
            match result {
                Ok(outcome) => self.record(outcome, report),
                Err(failure) => return Err(self.batch_failed(index, failure, report)),
            }
        }
        Ok(())
    }

    fn record(&self, outcome: BatchOutcome, report: &mut RelationReport) {
        info!(
            batch = outcome.batch,
            relations = outcome.relations,
            "loaded relations batch"
        );
        report.batches.push(outcome);
    }

    fn batch_failed(&self, index: usize, failure: BatchFailure, report: &RelationReport) -> LoadError {
        error!(
            batch = index,
            rel_type = %failure.rel_type,
            committed = report.batches.len(),
            committed_types = ?failure.committed_types,
            error = %failure.source,
            "relation batch failed, stopping relation stage"
        );
        LoadError::RelationBatch {
            batch: index,
            rel_type: failure.rel_type.to_string(),
            committed: report.batches.len(),
            committed_types: failure.committed_types,
            source: failure.source,
        }
    }

    /// Writes one batch, one transaction per relation type present. With
    /// `parallel_types` the per-type units run together when no node is
    /// shared between types; otherwise they run in type order.
    async fn write_batch(
        &self,
        index: usize,
        batch: Batch,
        types: &[RelType],
    ) -> std::result::Result<BatchOutcome, BatchFailure> {
        let store = &*self.store;
        let batch_size = self.config.batch_size;
        let groups: Vec<(&RelType, Vec<RelationRecord>)> = types
            .iter()
            .map(|t| (t, batch.of_type(t)))
            .filter(|(_, rows)| !rows.is_empty())
            .collect();

        let mut by_type = BTreeMap::new();
        if self.config.parallel_types && types_are_disjoint(&groups) {
            let results = future::join_all(groups.iter().map(|(rel_type, rows)| async move {
                let unit = WriteUnit::Relations { rel_type, rows };
                (*rel_type, write_unit(store, unit, batch_size).await)
            }))
            .await;
            let mut failure = None;
            for (rel_type, result) in results {
                match result {
                    Ok(written) => {
                        by_type.insert(rel_type.to_string(), written);
                    }
                    Err(source) if failure.is_none() => failure = Some((rel_type.clone(), source)),
                    Err(source) => {
                        warn!(batch = index, rel_type = %rel_type, error = %source, "relation unit failed")
                    }
                }
            }
            if let Some((rel_type, source)) = failure {
                return Err(BatchFailure::new(rel_type, source, by_type));
            }
        } else {
            for (rel_type, rows) in &groups {
                let unit = WriteUnit::Relations { rel_type, rows };
                match write_unit(store, unit, batch_size).await {
                    Ok(written) => {
                        by_type.insert(rel_type.to_string(), written);
                    }
                    Err(source) => {
                        return Err(BatchFailure::new((*rel_type).clone(), source, by_type));
                    }
                }
            }
        }

        Ok(BatchOutcome {
            batch: index,
            relations: batch.len(),
            by_type,
        })
    }
}

/// True when no node id appears in the rows of two different types, so the
/// per-type units of one batch can hold their locks at the same time.
fn types_are_disjoint(groups: &[(&RelType, Vec<RelationRecord>)]) -> bool {
    let mut seen: HashSet<&str> = HashSet::new();
    for (_, rows) in groups {
        let ids: HashSet<&str> = rows
            .iter()
            .filter_map(RelationRecord::endpoints)
            .flat_map(|(start, end)| [start, end])
            .collect();
        if ids.iter().any(|id| seen.contains(id)) {
            return false;
        }
        seen.extend(ids);
    }
    true
}
