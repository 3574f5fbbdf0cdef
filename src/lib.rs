//! Bulk loader for the biomedical knowledge graph: cleaned entity and
//! relation CSV exports in, idempotent upserts into Neo4j out.

pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod neo4j;
pub mod normalize;
pub mod partition;
pub mod report;
pub mod store;

pub use config::{ConnectionConfig, LoaderConfig, Vocabulary};
pub use domain::{Batch, Label, NodeRecord, RelType, RelationRecord};
pub use error::{LoadError, Result, StoreError};
pub use loader::{LoadRequest, Loader};
pub use neo4j::Neo4jClient;
pub use partition::PartitionStrategy;
pub use report::LoadReport;
pub use store::{GraphStore, MemoryStore, StoreTxn};
