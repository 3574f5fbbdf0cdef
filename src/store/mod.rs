pub mod memory;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{Label, NodeRecord, RelType, RelationRecord};
use crate::error::StoreError;

pub use memory::{Fault, MemoryStore, StoreStats};

/// A graph store that accepts bulk upserts inside explicit transactions.
///
/// Implementations are shared read-only across workers; every unit of work
/// opens its own transaction with [`GraphStore::begin`].
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Checks connectivity and authentication.
    async fn verify(&self) -> Result<(), StoreError>;

    async fn begin(&self) -> Result<Box<dyn StoreTxn>, StoreError>;
}

/// One open transaction. Dropping it without calling [`StoreTxn::commit`]
/// abandons every write made through it.
#[async_trait]
pub trait StoreTxn: Send {
    /// Match-or-create one node per row under `label`, keyed by `id`, then
    /// overwrite its attributes. One round trip for all rows.
    async fn upsert_nodes(&mut self, label: &Label, rows: &[NodeRecord]) -> Result<(), StoreError>;

    /// Match both endpoints by `id`, match-or-create the directed edge of
    /// `rel_type` between them, then overwrite its attributes. Rows whose
    /// endpoints do not exist write nothing.
    async fn upsert_relations(
        &mut self,
        rel_type: &RelType,
        rows: &[RelationRecord],
    ) -> Result<(), StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// The rows of one work unit: a single label or a single relation type.
#[derive(Debug, Clone, Copy)]
pub enum WriteUnit<'a> {
    Nodes {
        label: &'a Label,
        rows: &'a [NodeRecord],
    },
    Relations {
        rel_type: &'a RelType,
        rows: &'a [RelationRecord],
    },
}

impl WriteUnit<'_> {
    pub fn len(&self) -> usize {
        match self {
            WriteUnit::Nodes { rows, .. } => rows.len(),
            WriteUnit::Relations { rows, .. } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn name(&self) -> &str {
        match self {
            WriteUnit::Nodes { label, .. } => label.as_str(),
            WriteUnit::Relations { rel_type, .. } => rel_type.as_str(),
        }
    }
}

/// Writes one unit in its own transaction: commit on success, rollback on
/// failure. Rows are sent in statements of at most `batch_size` rows (0
/// means unbounded), all inside the same transaction.
pub async fn write_unit(
    store: &dyn GraphStore,
    unit: WriteUnit<'_>,
    batch_size: usize,
) -> Result<usize, StoreError> {
    let chunk = if batch_size == 0 { usize::MAX } else { batch_size };
    let mut txn = store.begin().await?;

    let written = async {
        match unit {
            WriteUnit::Nodes { label, rows } => {
                for rows in rows.chunks(chunk) {
                    txn.upsert_nodes(label, rows).await?;
                }
            }
            WriteUnit::Relations { rel_type, rows } => {
                for rows in rows.chunks(chunk) {
                    txn.upsert_relations(rel_type, rows).await?;
                }
            }
        }
        Ok::<_, StoreError>(unit.len())
    }
    .await;

    match written {
        Ok(n) => {
            txn.commit().await?;
            debug!(unit = unit.name(), rows = n, "committed");
            Ok(n)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(unit = unit.name(), error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
