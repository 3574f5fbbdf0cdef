pub mod schema;
pub mod writer;

use anyhow::Result;
use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Txn};
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::domain::{Label, NodeRecord, RelType, RelationRecord};
use crate::error::StoreError;
use crate::store::{GraphStore, StoreTxn};

impl From<neo4rs::Error> for StoreError {
    fn from(err: neo4rs::Error) -> Self {
        match &err {
            neo4rs::Error::Neo4j(e) if e.kind() == neo4rs::Neo4jErrorKind::Transient => {
                StoreError::Transient(err.to_string())
            }
            neo4rs::Error::ConnectionError => StoreError::Connection(err.to_string()),
            _ => StoreError::Statement(err.to_string()),
        }
    }
}

/// The process-wide connection handle. Cloning shares the underlying pool;
/// every transaction checks out its own connection.
#[derive(Clone)]
pub struct Neo4jClient {
    graph: Graph,
}

impl Neo4jClient {
    /// Connects and verifies connectivity and authentication before
    /// returning, so no load work starts against an unusable store.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, StoreError> {
        let mut builder = ConfigBuilder::default()
            .uri(config.uri.clone())
            .user(config.user.clone())
            .password(config.password.clone())
            .fetch_size(config.fetch_size);
        if let Some(db) = &config.database {
            builder = builder.db(db.clone());
        }
        let neo4j_config = builder
            .build()
            .map_err(|e| StoreError::Connection(format!("invalid neo4j config: {e}")))?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(|e| StoreError::Connection(format!("failed to connect to neo4j: {e}")))?;

        let client = Self { graph };
        client.verify().await?;
        info!(uri = %config.uri, "connected to neo4j");
        Ok(client)
    }

    pub async fn ensure_id_constraints(&self, labels: &[Label]) -> Result<()> {
        schema::ensure_id_constraints(&self.graph, labels).await
    }
}

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn verify(&self) -> Result<(), StoreError> {
        self.graph
            .run(query("RETURN 1"))
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    async fn begin(&self) -> Result<Box<dyn StoreTxn>, StoreError> {
        let txn = self.graph.start_txn().await?;
        Ok(Box::new(Neo4jTxn { txn: Some(txn) }))
    }
}

struct Neo4jTxn {
    txn: Option<Txn>,
}

impl Neo4jTxn {
    fn open(&mut self) -> Result<&mut Txn, StoreError> {
        self.txn
            .as_mut()
            .ok_or_else(|| StoreError::Statement("transaction already closed".into()))
    }
}

#[async_trait]
impl StoreTxn for Neo4jTxn {
    async fn upsert_nodes(&mut self, label: &Label, rows: &[NodeRecord]) -> Result<(), StoreError> {
        let q = writer::node_upsert(label, rows);
        self.open()?.run(q).await?;
        Ok(())
    }

    async fn upsert_relations(
        &mut self,
        rel_type: &RelType,
        rows: &[RelationRecord],
    ) -> Result<(), StoreError> {
        let q = writer::relation_upsert(rel_type, rows);
        self.open()?.run(q).await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut this = self;
        match this.txn.take() {
            Some(txn) => Ok(txn.commit().await?),
            None => Err(StoreError::Statement("transaction already closed".into())),
        }
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        let mut this = self;
        match this.txn.take() {
            Some(txn) => Ok(txn.rollback().await?),
            None => Ok(()),
        }
    }
}

impl Drop for Neo4jTxn {
    // A unit cancelled mid-flight drops its transaction; roll it back so the
    // pooled connection does not carry an open transaction.
    fn drop(&mut self) {
        if let Some(txn) = self.txn.take() {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    if let Err(e) = txn.rollback().await {
                        debug!(error = %e, "rollback of abandoned transaction failed");
                    }
                });
            }
        }
    }
}
