//! Turns cleaned CSV exports into [`NodeRecord`] and [`RelationRecord`]
//! values ready for bulk upsert.
//!
//! Headers may use the import-tool spelling (`:ID`, `:LABEL`, `:START_ID`,
//! `:END_ID`, `:TYPE`) or the already renamed one (`id`, `label`, ...).
//! Provenance columns (`pmid`, `pmcid`, `fetching_date` on entities,
//! `fetching_date` on relations) and any unknown column are dropped: once a
//! row is stored under its label they carry no new information.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::domain::{NodeRecord, RelationRecord};
use crate::error::{LoadError, Result};

const ID: &[&str] = &[":ID", "id"];
const LABEL: &[&str] = &[":LABEL", "label"];
const START_ID: &[&str] = &[":START_ID", "start_id"];
const END_ID: &[&str] = &[":END_ID", "end_id"];
const TYPE: &[&str] = &[":TYPE", "type"];

fn column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|a| h.trim() == *a))
}

fn require(
    headers: &StringRecord,
    required: &[&[&str]],
    source_name: &str,
) -> Result<Vec<usize>> {
    let mut found = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for aliases in required {
        match column(headers, aliases) {
            Some(idx) => found.push(idx),
            None => missing.push(aliases[0].to_string()),
        }
    }
    if missing.is_empty() {
        Ok(found)
    } else {
        Err(LoadError::MissingColumns {
            source_name: source_name.to_string(),
            columns: missing,
        })
    }
}

fn cell(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads entity rows. Rows without an id are logged and skipped.
pub fn read_nodes<R: Read>(reader: R, source_name: &str) -> Result<Vec<NodeRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let required = require(&headers, &[ID, LABEL], source_name)?;
    let (id_idx, label_idx) = (required[0], required[1]);
    let name_idx = column(&headers, &["name"]);
    let cui_idx = column(&headers, &["cui"]);
    let normalized_idx = column(&headers, &["normalized_name"]);
    let source_idx = column(&headers, &["normalization_source"]);

    let mut out = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let Some(id) = cell(&record, Some(id_idx)) else {
            warn!(source = source_name, row = row + 2, "skipping entity row without an id");
            continue;
        };
        out.push(NodeRecord {
            id,
            label: cell(&record, Some(label_idx)).unwrap_or_default(),
            name: cell(&record, name_idx),
            cui: cell(&record, cui_idx),
            normalized_name: cell(&record, normalized_idx),
            normalization_source: cell(&record, source_idx),
        });
    }

    debug!(source = source_name, rows = out.len(), "read entity rows");
    Ok(out)
}

pub fn read_nodes_from_path(path: &Path) -> Result<Vec<NodeRecord>> {
    read_nodes(open(path)?, &path.display().to_string())
}

/// Reads relation rows. Missing endpoints are kept as `None`; the
/// partitioner drops those rows.
pub fn read_relations<R: Read>(reader: R, source_name: &str) -> Result<Vec<RelationRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let required = require(&headers, &[START_ID, END_ID, TYPE], source_name)?;
    let (start_idx, end_idx, type_idx) = (required[0], required[1], required[2]);
    let id_idx = column(&headers, ID);
    let pmid_idx = column(&headers, &["pmid"]);
    let pmcid_idx = column(&headers, &["pmcid"]);

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        out.push(RelationRecord {
            id: cell(&record, id_idx),
            start_id: cell(&record, Some(start_idx)),
            end_id: cell(&record, Some(end_idx)),
            rel_type: cell(&record, Some(type_idx)).unwrap_or_default(),
            pmid: cell(&record, pmid_idx),
            pmcid: cell(&record, pmcid_idx),
        });
    }

    debug!(source = source_name, rows = out.len(), "read relation rows");
    Ok(out)
}

pub fn read_relations_from_path(path: &Path) -> Result<Vec<RelationRecord>> {
    read_relations(open(path)?, &path.display().to_string())
}

/// Ids referenced as either endpoint of any relation.
pub fn related_node_ids(relations: &[RelationRecord]) -> HashSet<&str> {
    relations
        .iter()
        .flat_map(|r| [r.start_id.as_deref(), r.end_id.as_deref()])
        .flatten()
        .collect()
}

/// Drops nodes that no relation references. Returns how many were dropped.
pub fn retain_related(nodes: &mut Vec<NodeRecord>, relations: &[RelationRecord]) -> usize {
    let related = related_node_ids(relations);
    let before = nodes.len();
    nodes.retain(|n| related.contains(n.id.as_str()));
    let dropped = before - nodes.len();
    info!(
        kept = nodes.len(),
        dropped, "only nodes with at least one relation will be loaded"
    );
    dropped
}

/// Splits nodes by their raw label, preserving input order within a label.
pub fn group_by_label(nodes: Vec<NodeRecord>) -> BTreeMap<String, Vec<NodeRecord>> {
    let mut groups: BTreeMap<String, Vec<NodeRecord>> = BTreeMap::new();
    for node in nodes {
        groups.entry(node.label.clone()).or_default().push(node);
    }
    groups
}
