use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use medgraph_loader::config::{LoaderConfig, Vocabulary};
use medgraph_loader::report::LabelStatus;
use medgraph_loader::store::{Fault, MemoryStore};
use medgraph_loader::{
    LoadError, LoadRequest, Loader, NodeRecord, PartitionStrategy, RelationRecord, StoreError,
};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const ENTITIES: &str = "\
:ID,:LABEL,name,cui,normalized_name,normalization_source,pmid,pmcid,fetching_date
g1,GENE,BRCA1,C0376571,BRCA1 gene,UMLS,123,PMC9,2024-01-01
g2,GENE,TP53,,,,124,PMC9,2024-01-01
g3,GENE,EGFR,C0034802,EGFR,UMLS,125,,2024-01-01
d1,DISEASE,breast cancer,C0006142,Breast Carcinoma,UMLS,123,PMC9,2024-01-01
d2,DISEASE,glioma,,,,126,,2024-01-02
";

const RELATIONS: &str = "\
:ID,:START_ID,:END_ID,:TYPE,pmid,pmcid,fetching_date
r1,g1,d1,AFFECTS,123,PMC9,2024-01-01
r2,g2,d2,ASSOCIATED_WITH,124,,2024-01-01
r3,g2,,AFFECTS,124,,2024-01-01
";

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn fixtures() -> (TempDir, LoadRequest) {
    let dir = tempfile::tempdir().unwrap();
    let request = LoadRequest {
        entities: Some(write(dir.path(), "entities.csv", ENTITIES)),
        relations: Some(write(dir.path(), "relations.csv", RELATIONS)),
        labels: vec!["GENE".into(), "DISEASE".into()],
        rel_types: vec!["AFFECTS".into(), "ASSOCIATED_WITH".into()],
    };
    (dir, request)
}

fn config(strategy: PartitionStrategy) -> LoaderConfig {
    LoaderConfig {
        strategy,
        max_workers: 8,
        ..LoaderConfig::default()
    }
}

fn loader(store: &Arc<MemoryStore>, config: LoaderConfig) -> Loader {
    Loader::new(store.clone(), Vocabulary::default(), config)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn end_to_end_scenario_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let loader = loader(&store, config(PartitionStrategy::ConnectedComponents));

    let nodes = vec![NodeRecord::new("1", "GENE"), NodeRecord::new("2", "DISEASE")];
    let relations = vec![RelationRecord::new("1", "AFFECTS", "2")];

    for _ in 0..2 {
        let node_report = loader
            .load_nodes(nodes.clone(), &strings(&["GENE", "DISEASE"]))
            .await
            .unwrap();
        assert!(node_report.is_complete());
        let rel_report = loader
            .load_relations(relations.clone(), &strings(&["AFFECTS"]))
            .await
            .unwrap();
        assert_eq!(rel_report.relations_loaded(), 1);

        assert_eq!(store.count_label("GENE"), 1);
        assert_eq!(store.count_label("DISEASE"), 1);
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.edge_count(), 1);
        assert!(store.edge("1", "AFFECTS", "2").is_some());
    }
    assert_eq!(store.stats().rollbacks, 0);
}

#[tokio::test]
async fn loads_csv_sources_and_drops_unrelated_nodes() {
    let (_dir, request) = fixtures();
    let store = Arc::new(MemoryStore::new());
    let loader = loader(&store, config(PartitionStrategy::ConnectedComponents));

    let report = loader.run(&request).await.unwrap();
    assert!(report.is_complete());
    assert!(report.finished_at.is_some());

    let nodes = report.nodes.as_ref().unwrap();
    assert_eq!(nodes.outcome("GENE"), Some(&LabelStatus::Loaded { rows: 2 }));
    assert_eq!(nodes.outcome("DISEASE"), Some(&LabelStatus::Loaded { rows: 2 }));
    assert_eq!(nodes.unrelated_dropped, 1);
    assert!(store.node("GENE", "g3").is_none());

    let brca = store.node("GENE", "g1").unwrap();
    assert_eq!(brca.cui.as_deref(), Some("C0376571"));

    let relations = report.relations.as_ref().unwrap();
    assert_eq!(relations.relations_loaded(), 2);
    assert_eq!(relations.skipped_missing_endpoint, 1);
    assert_eq!(relations.batches.len(), 2);

    let edge = store.edge("g1", "AFFECTS", "d1").unwrap();
    assert_eq!(edge.pmid.as_deref(), Some("123"));
    assert_eq!(edge.pmcid.as_deref(), Some("PMC9"));

    let rerun = loader.run(&request).await.unwrap();
    assert!(rerun.is_complete());
    assert_eq!(store.node_count(), 4);
    assert_eq!(store.edge_count(), 2);
}

#[tokio::test]
async fn singletons_load_when_requested() {
    let (_dir, request) = fixtures();
    let store = Arc::new(MemoryStore::new());
    let loader = loader(
        &store,
        LoaderConfig {
            only_related: false,
            ..config(PartitionStrategy::ConnectedComponents)
        },
    );

    let report = loader.run(&request).await.unwrap();
    assert_eq!(
        report.nodes.unwrap().outcome("GENE"),
        Some(&LabelStatus::Loaded { rows: 3 })
    );
    assert!(store.node("GENE", "g3").is_some());
}

#[tokio::test]
async fn only_related_filtering_keeps_referenced_genes() {
    let csv = "\
:ID,:LABEL
g1,GENE
g2,GENE
g3,GENE
d1,DISEASE
d2,DISEASE
";
    let rels = ":START_ID,:END_ID,:TYPE\ng1,d1,AFFECTS\ng2,d2,AFFECTS\n";
    let dir = tempfile::tempdir().unwrap();
    let request = LoadRequest {
        entities: Some(write(dir.path(), "entities.csv", csv)),
        relations: Some(write(dir.path(), "relations.csv", rels)),
        labels: strings(&["GENE", "DISEASE"]),
        rel_types: Vec::new(),
    };

    let store = Arc::new(MemoryStore::new());
    let report = loader(&store, config(PartitionStrategy::ConnectedComponents))
        .run(&request)
        .await
        .unwrap();

    assert_eq!(
        report.nodes.unwrap().outcome("GENE"),
        Some(&LabelStatus::Loaded { rows: 2 })
    );
    assert!(report.relations.is_none());
    assert_eq!(store.count_label("GENE"), 2);
    assert_eq!(store.edge_count(), 0);
}

#[tokio::test]
async fn unknown_label_is_rejected_while_others_load() {
    let store = Arc::new(MemoryStore::new());
    let loader = loader(&store, config(PartitionStrategy::ConnectedComponents));

    let nodes = vec![
        NodeRecord::new("g1", "GENE"),
        NodeRecord::new("x1", "FOO"),
        NodeRecord::new("x2", "FOO"),
    ];
    let report = loader
        .load_nodes(nodes, &strings(&["GENE", "FOO"]))
        .await
        .unwrap();

    assert_eq!(report.outcome("GENE"), Some(&LabelStatus::Loaded { rows: 1 }));
    assert!(matches!(
        report.outcome("FOO"),
        Some(LabelStatus::Rejected { rows: 2, .. })
    ));
    assert_eq!(store.count_label("FOO"), 0);
    assert_eq!(store.stats().transactions, 1);
    assert!(!report.is_complete());
}

#[tokio::test]
async fn requested_label_without_rows_is_reported_empty() {
    let store = Arc::new(MemoryStore::new());
    let report = loader(&store, config(PartitionStrategy::ConnectedComponents))
        .load_nodes(vec![NodeRecord::new("g1", "GENE")], &strings(&["GENE", "CELL"]))
        .await
        .unwrap();

    assert_eq!(report.outcome("CELL"), Some(&LabelStatus::Empty));
    assert!(report.is_complete());
}

#[tokio::test]
async fn failed_label_does_not_stop_its_siblings() {
    let store = Arc::new(MemoryStore::new());
    store.inject(Fault::Label {
        label: "DISEASE".into(),
        error: StoreError::Statement("constraint violated".into()),
    });
    let loader = loader(&store, config(PartitionStrategy::ConnectedComponents));

    let nodes = vec![
        NodeRecord::new("g1", "GENE"),
        NodeRecord::new("d1", "DISEASE"),
        NodeRecord::new("c1", "CHEMICAL"),
    ];
    let report = loader
        .load_nodes(nodes, &strings(&["GENE", "DISEASE", "CHEMICAL"]))
        .await
        .unwrap();

    assert!(matches!(
        report.outcome("DISEASE"),
        Some(LabelStatus::Failed {
            rows: 1,
            retryable: false,
            ..
        })
    ));
    assert_eq!(report.outcome("GENE"), Some(&LabelStatus::Loaded { rows: 1 }));
    assert_eq!(report.outcome("CHEMICAL"), Some(&LabelStatus::Loaded { rows: 1 }));
    assert_eq!(report.failed().count(), 1);
    assert_eq!(store.count_label("DISEASE"), 0);
    assert_eq!(store.stats().rollbacks, 1);
}

#[tokio::test]
async fn transient_relation_failure_is_surfaced() {
    let store = Arc::new(MemoryStore::new());
    let loader = loader(&store, config(PartitionStrategy::ConnectedComponents));
    loader
        .load_nodes(
            vec![NodeRecord::new("g1", "GENE"), NodeRecord::new("d1", "DISEASE")],
            &strings(&["GENE", "DISEASE"]),
        )
        .await
        .unwrap();

    store.inject(Fault::RelType {
        rel_type: "AFFECTS".into(),
        error: StoreError::Transient("deadlock detected".into()),
    });
    let err = loader
        .load_relations(
            vec![RelationRecord::new("g1", "AFFECTS", "d1")],
            &strings(&["AFFECTS"]),
        )
        .await
        .unwrap_err();

    match &err {
        LoadError::RelationBatch {
            batch,
            rel_type,
            committed,
            committed_types,
            source,
        } => {
            assert_eq!(*batch, 0);
            assert_eq!(rel_type, "AFFECTS");
            assert_eq!(*committed, 0);
            assert!(committed_types.is_empty());
            assert!(source.is_transient());
        }
        other => panic!("expected a relation batch error, got {other:?}"),
    }
    assert!(err.is_retryable());
    assert_eq!(store.edge_count(), 0);
}

#[tokio::test]
async fn unknown_requested_type_fails_before_any_store_call() {
    let store = Arc::new(MemoryStore::new());
    let err = loader(&store, config(PartitionStrategy::ConnectedComponents))
        .load_relations(
            vec![RelationRecord::new("g1", "AFFECTS", "d1")],
            &strings(&["AFFECTS", "CURES"]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::UnknownRelType { ref rel_type, .. } if rel_type == "CURES"));
    assert_eq!(store.stats().transactions, 0);
}

#[tokio::test]
async fn rows_of_unknown_types_are_rejected_without_stopping_the_load() {
    let entities = "\
:ID,:LABEL
g1,GENE
d1,DISEASE
c1,CHEMICAL
";
    let relations = "\
:START_ID,:END_ID,:TYPE
g1,d1,AFFECTS
c1,d1,CURES
c1,g1,
";
    let dir = tempfile::tempdir().unwrap();
    let request = LoadRequest {
        entities: Some(write(dir.path(), "entities.csv", entities)),
        relations: Some(write(dir.path(), "relations.csv", relations)),
        labels: strings(&["GENE", "DISEASE", "CHEMICAL"]),
        rel_types: strings(&["AFFECTS"]),
    };

    let store = Arc::new(MemoryStore::new());
    let report = loader(&store, config(PartitionStrategy::ConnectedComponents))
        .run(&request)
        .await
        .unwrap();

    assert_eq!(store.node_count(), 3);
    assert_eq!(store.edge_count(), 1);
    assert!(store.edge("g1", "AFFECTS", "d1").is_some());
    assert!(store.edge("c1", "CURES", "d1").is_none());

    let relations = report.relations.as_ref().unwrap();
    assert_eq!(relations.relations_loaded(), 1);
    assert_eq!(relations.rejected_types.get("CURES"), Some(&1));
    assert_eq!(relations.rejected_types.get(""), Some(&1));
    assert_eq!(relations.rows_rejected(), 2);
    assert_eq!(relations.not_selected, 0);
    assert!(!report.is_complete());
}

#[tokio::test]
async fn unselected_types_are_counted_not_loaded() {
    let store = Arc::new(MemoryStore::new());
    let loader = loader(&store, config(PartitionStrategy::ConnectedComponents));
    loader
        .load_nodes(
            vec![
                NodeRecord::new("g1", "GENE"),
                NodeRecord::new("d1", "DISEASE"),
                NodeRecord::new("p1", "PROTEIN"),
            ],
            &strings(&["GENE", "DISEASE", "PROTEIN"]),
        )
        .await
        .unwrap();

    let report = loader
        .load_relations(
            vec![
                RelationRecord::new("g1", "AFFECTS", "d1"),
                RelationRecord::new("g1", "BINDS", "p1"),
            ],
            &strings(&["AFFECTS"]),
        )
        .await
        .unwrap();

    assert_eq!(report.not_selected, 1);
    assert_eq!(report.relations_loaded(), 1);
    assert!(store.edge("g1", "BINDS", "p1").is_none());
}

#[tokio::test]
async fn unreachable_store_starts_no_work() {
    let (_dir, request) = fixtures();
    let store = Arc::new(MemoryStore::unreachable());
    let err = loader(&store, config(PartitionStrategy::ConnectedComponents))
        .run(&request)
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Connectivity(StoreError::Connection(_))));
    assert_eq!(store.stats().transactions, 0);
}

#[tokio::test]
async fn shape_errors_surface_before_the_store_is_contacted() {
    let dir = tempfile::tempdir().unwrap();
    let request = LoadRequest {
        entities: None,
        relations: Some(write(dir.path(), "relations.csv", "id,start_id,type\nr1,g1,AFFECTS\n")),
        labels: Vec::new(),
        rel_types: strings(&["AFFECTS"]),
    };
    let store = Arc::new(MemoryStore::unreachable());
    let err = loader(&store, config(PartitionStrategy::ConnectedComponents))
        .run(&request)
        .await
        .unwrap_err();

    match err {
        LoadError::MissingColumns { columns, .. } => assert_eq!(columns, vec![":END_ID"]),
        other => panic!("expected missing columns, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_source_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let request = LoadRequest {
        entities: Some(dir.path().join("absent.csv")),
        relations: None,
        labels: strings(&["GENE"]),
        rel_types: Vec::new(),
    };
    let store = Arc::new(MemoryStore::new());
    let err = loader(&store, config(PartitionStrategy::ConnectedComponents))
        .run(&request)
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[tokio::test]
async fn nothing_to_load_without_sources() {
    let store = Arc::new(MemoryStore::new());
    let loader = loader(&store, config(PartitionStrategy::ConnectedComponents));

    let err = loader.run(&LoadRequest::default()).await.unwrap_err();
    assert!(matches!(err, LoadError::NothingToLoad));

    let (_dir, mut request) = fixtures();
    request.labels.clear();
    request.rel_types.clear();
    let err = loader.run(&request).await.unwrap_err();
    assert!(matches!(err, LoadError::NothingToLoad));
}

#[tokio::test]
async fn cancelled_load_is_interrupted() {
    let (_dir, request) = fixtures();
    let store = Arc::new(MemoryStore::new());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = loader(&store, config(PartitionStrategy::ConnectedComponents))
        .with_cancellation(cancel)
        .run(&request)
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Interrupted));
    assert_eq!(store.stats().commits, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cancelling_mid_stage_keeps_committed_units_and_drops_the_rest() {
    let store = Arc::new(MemoryStore::new().with_latency(Duration::from_millis(5)));
    let relations = seeded_pairs(&store, 200).await;
    let node_commits = store.stats().commits;
    let total_units = relations.len() as u64;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        trigger.cancel();
    });

    let err = loader(
        &store,
        LoaderConfig {
            max_workers: 4,
            ..config(PartitionStrategy::ConnectedComponents)
        },
    )
    .with_cancellation(cancel)
    .load_relations(relations, &strings(&["AFFECTS", "ASSOCIATED_WITH"]))
    .await
    .unwrap_err();
    assert!(matches!(err, LoadError::Interrupted));

    let stats = store.stats();
    let relation_commits = stats.commits - node_commits;
    assert!(relation_commits > 0, "no unit committed before cancellation");
    assert!(relation_commits < total_units, "every unit committed");
    assert!(stats.abandoned > 0, "no in-flight unit was dropped");
    assert_eq!(stats.rollbacks, 0);
    assert_eq!(store.edge_count() as u64, relation_commits);
    assert_eq!(store.locks_held(), 0);
}

#[tokio::test]
async fn failed_type_reports_sibling_types_already_committed() {
    let store = Arc::new(MemoryStore::new());
    let loader = loader(
        &store,
        LoaderConfig {
            parallel_types: true,
            ..config(PartitionStrategy::ConflictFree)
        },
    );
    loader
        .load_nodes(
            vec![
                NodeRecord::new("g1", "GENE"),
                NodeRecord::new("g2", "GENE"),
                NodeRecord::new("d1", "DISEASE"),
                NodeRecord::new("p1", "PROTEIN"),
            ],
            &strings(&["GENE", "DISEASE", "PROTEIN"]),
        )
        .await
        .unwrap();

    store.inject(Fault::RelType {
        rel_type: "BINDS".into(),
        error: StoreError::Statement("constraint violated".into()),
    });
    // No node repeats, so both types share one batch and run together.
    let err = loader
        .load_relations(
            vec![
                RelationRecord::new("g1", "AFFECTS", "d1"),
                RelationRecord::new("g2", "BINDS", "p1"),
            ],
            &strings(&["AFFECTS", "BINDS"]),
        )
        .await
        .unwrap_err();

    match err {
        LoadError::RelationBatch {
            batch,
            rel_type,
            committed,
            committed_types,
            ..
        } => {
            assert_eq!(batch, 0);
            assert_eq!(rel_type, "BINDS");
            assert_eq!(committed, 0);
            assert_eq!(committed_types, vec!["AFFECTS"]);
        }
        other => panic!("expected a relation batch error, got {other:?}"),
    }
    assert!(store.edge("g1", "AFFECTS", "d1").is_some());
    assert!(store.edge("g2", "BINDS", "p1").is_none());
}

/// `count` disjoint gene-disease pairs, already loaded as nodes.
async fn seeded_pairs(store: &Arc<MemoryStore>, count: usize) -> Vec<RelationRecord> {
    let mut nodes = Vec::new();
    let mut relations = Vec::new();
    for i in 0..count {
        nodes.push(NodeRecord::new(format!("g{i}"), "GENE"));
        nodes.push(NodeRecord::new(format!("d{i}"), "DISEASE"));
        relations.push(RelationRecord::new(format!("g{i}"), "AFFECTS", format!("d{i}")));
        relations.push(RelationRecord::new(format!("g{i}"), "ASSOCIATED_WITH", format!("d{i}")));
    }
    loader(store, config(PartitionStrategy::ConnectedComponents))
        .load_nodes(nodes, &strings(&["GENE", "DISEASE"]))
        .await
        .unwrap();
    relations
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_components_never_contend() {
    let store = Arc::new(MemoryStore::new().with_latency(Duration::from_millis(2)));
    let relations = seeded_pairs(&store, 40).await;

    let report = loader(&store, config(PartitionStrategy::ConnectedComponents))
        .load_relations(relations, &strings(&["AFFECTS", "ASSOCIATED_WITH"]))
        .await
        .unwrap();

    assert_eq!(report.batches.len(), 40);
    assert_eq!(report.relations_loaded(), 80);
    assert_eq!(store.edge_count(), 80);
    assert_eq!(store.stats().rollbacks, 0);
    assert_eq!(store.locks_held(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_types_fall_back_when_types_share_nodes() {
    let store = Arc::new(MemoryStore::new().with_latency(Duration::from_millis(2)));
    let relations = seeded_pairs(&store, 10).await;

    let report = loader(
        &store,
        LoaderConfig {
            parallel_types: true,
            ..config(PartitionStrategy::ConnectedComponents)
        },
    )
    .load_relations(relations, &strings(&["AFFECTS", "ASSOCIATED_WITH"]))
    .await
    .unwrap();

    assert_eq!(report.relations_loaded(), 20);
    assert_eq!(store.edge_count(), 20);
    assert_eq!(store.stats().rollbacks, 0);
}

#[tokio::test]
async fn conflict_free_batches_load_in_order() {
    let store = Arc::new(MemoryStore::new());
    let loader = loader(
        &store,
        LoaderConfig {
            parallel_types: true,
            ..config(PartitionStrategy::ConflictFree)
        },
    );
    loader
        .load_nodes(
            vec![
                NodeRecord::new("g1", "GENE"),
                NodeRecord::new("d1", "DISEASE"),
                NodeRecord::new("d2", "DISEASE"),
                NodeRecord::new("d3", "DISEASE"),
            ],
            &strings(&["GENE", "DISEASE"]),
        )
        .await
        .unwrap();

    // g1 appears in every relation, so each lands in its own batch.
    let relations = vec![
        RelationRecord::new("g1", "AFFECTS", "d1"),
        RelationRecord::new("g1", "AFFECTS", "d2"),
        RelationRecord::new("g1", "ASSOCIATED_WITH", "d3"),
    ];
    let report = loader
        .load_relations(relations, &strings(&["AFFECTS", "ASSOCIATED_WITH"]))
        .await
        .unwrap();

    assert_eq!(report.strategy, PartitionStrategy::ConflictFree);
    assert_eq!(report.batches.len(), 3);
    let order: Vec<usize> = report.batches.iter().map(|b| b.batch).collect();
    assert_eq!(order, vec![0, 1, 2]);
    assert_eq!(store.edge_count(), 3);
}

#[tokio::test]
async fn shared_nodes_keep_relations_in_one_component() {
    let store = Arc::new(MemoryStore::new());
    let loader = loader(&store, config(PartitionStrategy::ConnectedComponents));
    loader
        .load_nodes(
            vec![
                NodeRecord::new("g1", "GENE"),
                NodeRecord::new("g2", "GENE"),
                NodeRecord::new("d1", "DISEASE"),
                NodeRecord::new("d2", "DISEASE"),
            ],
            &strings(&["GENE", "DISEASE"]),
        )
        .await
        .unwrap();

    let report = loader
        .load_relations(
            vec![
                RelationRecord::new("g1", "AFFECTS", "d1"),
                RelationRecord::new("g1", "AFFECTS", "d2"),
                RelationRecord::new("g2", "ASSOCIATED_WITH", "d2"),
            ],
            &strings(&["AFFECTS", "ASSOCIATED_WITH"]),
        )
        .await
        .unwrap();

    assert_eq!(report.batches.len(), 1);
    let batch = &report.batches[0];
    assert_eq!(batch.relations, 3);
    assert_eq!(batch.by_type.get("AFFECTS"), Some(&2));
    assert_eq!(batch.by_type.get("ASSOCIATED_WITH"), Some(&1));
}

#[tokio::test]
async fn edges_to_unknown_nodes_write_nothing() {
    let store = Arc::new(MemoryStore::new());
    let report = loader(&store, config(PartitionStrategy::ConnectedComponents))
        .load_relations(
            vec![RelationRecord::new("g9", "AFFECTS", "d9")],
            &strings(&["AFFECTS"]),
        )
        .await
        .unwrap();

    assert_eq!(report.batches.len(), 1);
    assert_eq!(store.edge_count(), 0);
}
