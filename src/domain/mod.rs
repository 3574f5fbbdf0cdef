use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A node label drawn from the configured vocabulary.
///
/// Only [`crate::config::Vocabulary`] hands these out, so a `Label` is
/// always a recognized, Cypher-safe identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label(pub(crate) String);

/// A relation type drawn from the configured vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelType(pub(crate) String);

impl Label {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl RelType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entity row, ready for a bulk node upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    /// Raw label as read from the source; checked against the vocabulary
    /// when rows are grouped.
    pub label: String,
    pub name: Option<String>,
    pub cui: Option<String>,
    pub normalized_name: Option<String>,
    pub normalization_source: Option<String>,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            name: None,
            cui: None,
            normalized_name: None,
            normalization_source: None,
        }
    }
}

/// One relation row. Endpoints may be missing in dirty input; such rows
/// never reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
    pub id: Option<String>,
    pub start_id: Option<String>,
    pub end_id: Option<String>,
    pub rel_type: String,
    pub pmid: Option<String>,
    pub pmcid: Option<String>,
}

impl RelationRecord {
    pub fn new(
        start_id: impl Into<String>,
        rel_type: impl Into<String>,
        end_id: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            start_id: Some(start_id.into()),
            end_id: Some(end_id.into()),
            rel_type: rel_type.into(),
            pmid: None,
            pmcid: None,
        }
    }

    /// Both endpoints, or `None` if either is missing.
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        match (self.start_id.as_deref(), self.end_id.as_deref()) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Short description used in log lines.
    pub fn describe(&self) -> String {
        format!(
            "{}({})-[{}]->({})",
            self.id.as_deref().unwrap_or("<no id>"),
            self.start_id.as_deref().unwrap_or("null"),
            self.rel_type,
            self.end_id.as_deref().unwrap_or("null"),
        )
    }
}

/// A group of relations scheduled to be written together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub relations: Vec<RelationRecord>,
}

impl Batch {
    pub fn new(relations: Vec<RelationRecord>) -> Self {
        Self { relations }
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Relations of one type, in batch order.
    pub fn of_type(&self, rel_type: &RelType) -> Vec<RelationRecord> {
        self.relations
            .iter()
            .filter(|r| r.rel_type == rel_type.as_str())
            .cloned()
            .collect()
    }

    /// Every endpoint id touched by this batch.
    pub fn node_ids(&self) -> HashSet<&str> {
        let mut out = HashSet::new();
        for (start, end) in self.relations.iter().filter_map(RelationRecord::endpoints) {
            out.insert(start);
            out.insert(end);
        }
        out
    }
}
