use std::collections::BTreeSet;
use std::thread;

use crate::domain::{Label, RelType};
use crate::error::{LoadError, Result};
use crate::partition::PartitionStrategy;

/// Entity labels emitted by the upstream NER model.
pub const DEFAULT_LABELS: &[&str] = &[
    "CANCER",
    "CELL",
    "CHEMICAL",
    "DISEASE",
    "GENE",
    "MUTATION",
    "PROTEIN",
    "SPECIES",
];

/// Relation types emitted by the upstream RE model.
pub const DEFAULT_REL_TYPES: &[&str] = &[
    "AFFECTS",
    "ASSOCIATED_WITH",
    "BINDS",
    "INHIBITS",
    "INTERACTS_WITH",
    "TREATS",
];

pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const MAX_WORKERS_CEILING: usize = 100;

/// Closed sets of recognized labels and relation types.
///
/// Labels and types are spliced into Cypher as identifiers, so entries are
/// restricted to `[A-Z_][A-Z0-9_]*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    labels: BTreeSet<String>,
    rel_types: BTreeSet<String>,
}

impl Vocabulary {
    pub fn new<L, R>(labels: L, rel_types: R) -> Result<Self>
    where
        L: IntoIterator,
        L::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        Ok(Self {
            labels: collect_identifiers(labels)?,
            rel_types: collect_identifiers(rel_types)?,
        })
    }

    pub fn label(&self, raw: &str) -> Result<Label> {
        let raw = raw.trim();
        if self.labels.contains(raw) {
            Ok(Label(raw.to_string()))
        } else {
            Err(LoadError::UnknownLabel {
                label: raw.to_string(),
                recognized: join(&self.labels),
            })
        }
    }

    pub fn rel_type(&self, raw: &str) -> Result<RelType> {
        let raw = raw.trim();
        if self.rel_types.contains(raw) {
            Ok(RelType(raw.to_string()))
        } else {
            Err(LoadError::UnknownRelType {
                rel_type: raw.to_string(),
                recognized: join(&self.rel_types),
            })
        }
    }

    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().cloned().collect()
    }

    pub fn rel_type_names(&self) -> Vec<String> {
        self.rel_types.iter().cloned().collect()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
            rel_types: DEFAULT_REL_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn collect_identifiers<I>(items: I) -> Result<BTreeSet<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = BTreeSet::new();
    for item in items {
        let item = item.as_ref().trim();
        if item.is_empty() {
            continue;
        }
        if !is_identifier(item) {
            return Err(LoadError::InvalidVocabulary(item.to_string()));
        }
        out.insert(item.to_string());
    }
    Ok(out)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Connection settings for the Neo4j connector.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: Option<String>,
    pub fetch_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: "127.0.0.1:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            database: None,
            fetch_size: 200,
        }
    }
}

/// Tuning knobs for a load run.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Maximum rows per UNWIND statement. Larger groups are split into
    /// several statements inside the same transaction.
    pub batch_size: usize,
    /// Load only nodes referenced by at least one relation.
    pub only_related: bool,
    pub strategy: PartitionStrategy,
    /// Size of the worker pool for node labels and component batches.
    pub max_workers: usize,
    /// Write the relation types of one batch concurrently.
    pub parallel_types: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            only_related: true,
            strategy: PartitionStrategy::default(),
            max_workers: default_max_workers(),
            parallel_types: false,
        }
    }
}

/// Four workers per core for I/O bound work, capped at
/// [`MAX_WORKERS_CEILING`].
pub fn default_max_workers() -> usize {
    let cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    (cores * 4).clamp(1, MAX_WORKERS_CEILING)
}
