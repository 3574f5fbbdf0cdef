use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::partition::PartitionStrategy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LabelStatus {
    Loaded { rows: usize },
    /// Recognized label with no rows in the input.
    Empty,
    /// Refused before any store call.
    Rejected { rows: usize, reason: String },
    Failed { rows: usize, error: String, retryable: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelOutcome {
    pub label: String,
    #[serde(flatten)]
    pub status: LabelStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeReport {
    pub labels: Vec<LabelOutcome>,
    /// Nodes left out because no relation references them.
    pub unrelated_dropped: usize,
}

impl NodeReport {
    pub fn outcome(&self, label: &str) -> Option<&LabelStatus> {
        self.labels
            .iter()
            .find(|o| o.label == label)
            .map(|o| &o.status)
    }

    pub fn rows_loaded(&self) -> usize {
        self.labels
            .iter()
            .map(|o| match o.status {
                LabelStatus::Loaded { rows } => rows,
                _ => 0,
            })
            .sum()
    }

    pub fn failed(&self) -> impl Iterator<Item = &LabelOutcome> {
        self.labels
            .iter()
            .filter(|o| matches!(o.status, LabelStatus::Failed { .. }))
    }

    pub fn rejected(&self) -> impl Iterator<Item = &LabelOutcome> {
        self.labels
            .iter()
            .filter(|o| matches!(o.status, LabelStatus::Rejected { .. }))
    }

    pub fn is_complete(&self) -> bool {
        self.failed().next().is_none() && self.rejected().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub batch: usize,
    pub relations: usize,
    pub by_type: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationReport {
    pub strategy: PartitionStrategy,
    /// Committed batches, in completion order.
    pub batches: Vec<BatchOutcome>,
    pub skipped_missing_endpoint: usize,
    /// Rows of a recognized type that was not selected for this run.
    pub not_selected: usize,
    /// Rows whose type is blank or not in the vocabulary, by raw type.
    pub rejected_types: BTreeMap<String, usize>,
}

impl RelationReport {
    pub fn new(strategy: PartitionStrategy) -> Self {
        Self {
            strategy,
            batches: Vec::new(),
            skipped_missing_endpoint: 0,
            not_selected: 0,
            rejected_types: BTreeMap::new(),
        }
    }

    pub fn relations_loaded(&self) -> usize {
        self.batches.iter().map(|b| b.relations).sum()
    }

    pub fn rows_rejected(&self) -> usize {
        self.rejected_types.values().sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub nodes: Option<NodeReport>,
    pub relations: Option<RelationReport>,
}

impl LoadReport {
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            nodes: None,
            relations: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn is_complete(&self) -> bool {
        self.nodes.as_ref().map_or(true, NodeReport::is_complete)
            && self
                .relations
                .as_ref()
                .map_or(true, |r| r.rejected_types.is_empty())
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "load run {}", self.run_id)?;
        if let Some(nodes) = &self.nodes {
            writeln!(f, "nodes: {} row(s) loaded", nodes.rows_loaded())?;
            for outcome in &nodes.labels {
                match &outcome.status {
                    LabelStatus::Loaded { rows } => writeln!(f, "  {:<20} loaded {rows}", outcome.label)?,
                    LabelStatus::Empty => writeln!(f, "  {:<20} no rows", outcome.label)?,
                    LabelStatus::Rejected { rows, reason } => {
                        writeln!(f, "  {:<20} rejected {rows} row(s): {reason}", outcome.label)?
                    }
                    LabelStatus::Failed { rows, error, .. } => {
                        writeln!(f, "  {:<20} FAILED {rows} row(s): {error}", outcome.label)?
                    }
                }
            }
            if nodes.unrelated_dropped > 0 {
                writeln!(f, "  {} node(s) without relations left out", nodes.unrelated_dropped)?;
            }
        }
        if let Some(rels) = &self.relations {
            writeln!(
                f,
                "relations: {} loaded in {} batch(es)",
                rels.relations_loaded(),
                rels.batches.len()
            )?;
            if rels.skipped_missing_endpoint > 0 {
                writeln!(f, "  {} skipped for a missing endpoint", rels.skipped_missing_endpoint)?;
            }
            if rels.not_selected > 0 {
                writeln!(f, "  {} of unselected types left out", rels.not_selected)?;
            }
            for (rel_type, rows) in &rels.rejected_types {
                let shown = if rel_type.is_empty() { "<blank>" } else { rel_type };
                writeln!(f, "  {shown:<20} rejected {rows} row(s): unknown relation type")?;
            }
        }
        if let (Some(finished), started) = (self.finished_at, self.started_at) {
            writeln!(
                f,
                "took {:.3}s",
                (finished - started).num_milliseconds() as f64 / 1000.0
            )?;
        }
        Ok(())
    }
}
