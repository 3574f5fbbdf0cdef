use std::collections::HashMap;

use neo4rs::{query, BoltList, BoltMap, BoltNull, BoltString, BoltType, Query};

use crate::domain::{Label, NodeRecord, RelType, RelationRecord};

// Labels and relation types cannot be Cypher parameters, so each statement
// is rendered per label or type. Both come from the vocabulary, which only
// admits plain identifiers.

pub fn node_upsert_cypher(label: &Label) -> String {
    format!(
        r#"
UNWIND $rows AS row
MERGE (n:{label} {{id: row.id}})
SET n += {{
    name: row.name,
    cui: row.cui,
    normalized_name: row.normalized_name,
    normalization_source: row.normalization_source
}}
"#
    )
}

pub fn relation_upsert_cypher(rel_type: &RelType) -> String {
    format!(
        r#"
UNWIND $rows AS row
MATCH (start {{id: row.start_id}})
MATCH (end {{id: row.end_id}})
MERGE (start)-[r:{rel_type}]->(end)
SET r += {{
    pmid: row.pmid,
    pmcid: row.pmcid
}}
"#
    )
}

pub fn node_upsert(label: &Label, rows: &[NodeRecord]) -> Query {
    query(&node_upsert_cypher(label)).param("rows", rows_param(rows.iter().map(node_row)))
}

pub fn relation_upsert(rel_type: &RelType, rows: &[RelationRecord]) -> Query {
    query(&relation_upsert_cypher(rel_type))
        .param("rows", rows_param(rows.iter().map(relation_row)))
}

fn text(value: &str) -> BoltType {
    BoltType::String(BoltString::new(value))
}

fn nullable(value: &Option<String>) -> BoltType {
    match value {
        Some(v) => text(v),
        None => BoltType::Null(BoltNull),
    }
}

fn row(fields: Vec<(&str, BoltType)>) -> BoltType {
    BoltType::Map(BoltMap {
        value: fields
            .into_iter()
            .map(|(k, v)| (BoltString::new(k), v))
            .collect::<HashMap<_, _>>(),
    })
}

fn rows_param(rows: impl Iterator<Item = BoltType>) -> BoltType {
    BoltType::List(BoltList {
        value: rows.collect(),
    })
}

fn node_row(node: &NodeRecord) -> BoltType {
    row(vec![
        ("id", text(&node.id)),
        ("name", nullable(&node.name)),
        ("cui", nullable(&node.cui)),
        ("normalized_name", nullable(&node.normalized_name)),
        ("normalization_source", nullable(&node.normalization_source)),
    ])
}

fn relation_row(rel: &RelationRecord) -> BoltType {
    row(vec![
        ("start_id", nullable(&rel.start_id)),
        ("end_id", nullable(&rel.end_id)),
        ("pmid", nullable(&rel.pmid)),
        ("pmcid", nullable(&rel.pmcid)),
    ])
}
