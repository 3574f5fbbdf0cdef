use anyhow::{Context as _, Result};
use neo4rs::{query, Graph};
use tracing::info;

use crate::domain::Label;

pub fn id_constraint_cypher(label: &Label) -> String {
    format!(
        "CREATE CONSTRAINT {}_id IF NOT EXISTS FOR (n:{label}) REQUIRE n.id IS UNIQUE",
        label.as_str().to_lowercase()
    )
}

/// Uniqueness constraints on `id`, one per label. Each constraint also
/// backs the index the node MERGE looks up.
pub async fn ensure_id_constraints(graph: &Graph, labels: &[Label]) -> Result<()> {
    let mut txn = graph.start_txn().await.context("start neo4j txn")?;

    for label in labels {
        let stmt = id_constraint_cypher(label);
        txn.run(query(&stmt))
            .await
            .with_context(|| format!("neo4j schema statement failed: {stmt}"))?;
    }

    txn.commit().await.context("commit neo4j schema")?;
    info!(labels = labels.len(), "id constraints in place");
    Ok(())
}
