use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use medgraph_loader::config::{
    default_max_workers, ConnectionConfig, LoaderConfig, Vocabulary, DEFAULT_BATCH_SIZE,
    DEFAULT_LABELS, DEFAULT_REL_TYPES,
};
use medgraph_loader::{GraphStore, LoadRequest, Loader, MemoryStore, Neo4jClient, PartitionStrategy};

#[derive(Parser, Debug)]
#[command(
    name = "medgraph-load",
    version,
    about = "Load cleaned entity and relation CSV exports into Neo4j"
)]
struct Cli {
    #[arg(long, value_name = "FILE", env = "MEDGRAPH_ENTITIES", help = "Entities CSV")]
    entities: Option<PathBuf>,

    #[arg(long, value_name = "FILE", env = "MEDGRAPH_RELATIONS", help = "Relations CSV")]
    relations: Option<PathBuf>,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Labels to load (default: every recognized label)"
    )]
    labels: Vec<String>,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Relation types to load (default: every recognized type)"
    )]
    rel_types: Vec<String>,

    #[command(flatten)]
    vocabulary: VocabularyArgs,

    #[command(flatten)]
    neo4j: Neo4jArgs,

    #[command(flatten)]
    tuning: TuningArgs,

    #[arg(
        long,
        conflicts_with = "dry_run",
        help = "Create a uniqueness constraint on id for each label first"
    )]
    ensure_constraints: bool,

    #[arg(long, help = "Load into an in-process store instead of Neo4j")]
    dry_run: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct VocabularyArgs {
    #[arg(
        long = "vocab-labels",
        id = "vocab_labels",
        env = "MEDGRAPH_LABELS",
        value_delimiter = ',',
        help = "Recognized entity labels (default: the built-in set)"
    )]
    labels: Vec<String>,

    #[arg(
        long = "vocab-rel-types",
        id = "vocab_rel_types",
        env = "MEDGRAPH_REL_TYPES",
        value_delimiter = ',',
        help = "Recognized relation types (default: the built-in set)"
    )]
    rel_types: Vec<String>,
}

impl VocabularyArgs {
    fn build(&self) -> medgraph_loader::Result<Vocabulary> {
        let labels: Vec<&str> = if self.labels.is_empty() {
            DEFAULT_LABELS.to_vec()
        } else {
            self.labels.iter().map(String::as_str).collect()
        };
        let rel_types: Vec<&str> = if self.rel_types.is_empty() {
            DEFAULT_REL_TYPES.to_vec()
        } else {
            self.rel_types.iter().map(String::as_str).collect()
        };
        Vocabulary::new(labels, rel_types)
    }
}

#[derive(Args, Debug)]
struct Neo4jArgs {
    #[arg(long = "neo4j-uri", env = "NEO4J_URI", default_value = "127.0.0.1:7687")]
    uri: String,

    #[arg(long = "neo4j-user", env = "NEO4J_USER", default_value = "neo4j")]
    user: String,

    #[arg(long = "neo4j-password", env = "NEO4J_PASSWORD", default_value = "neo4j", hide_env_values = true)]
    password: String,

    #[arg(long = "neo4j-database", env = "NEO4J_DATABASE")]
    database: Option<String>,

    #[arg(long = "neo4j-fetch-size", env = "NEO4J_FETCH_SIZE", default_value_t = 200)]
    fetch_size: usize,
}

#[derive(Args, Debug)]
struct TuningArgs {
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, help = "Maximum rows per statement")]
    load_batch_size: usize,

    #[arg(long, help = "Also load nodes that no relation references")]
    include_singletons: bool,

    #[arg(long, value_enum, default_value_t = StrategyArg::Components)]
    strategy: StrategyArg,

    #[arg(long, help = "Worker pool size (default: 4 per core, at most 100)")]
    max_workers: Option<usize>,

    #[arg(long, help = "Write the relation types of one batch concurrently")]
    parallel_types: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum StrategyArg {
    Components,
    ConflictFree,
}

impl From<StrategyArg> for PartitionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Components => PartitionStrategy::ConnectedComponents,
            StrategyArg::ConflictFree => PartitionStrategy::ConflictFree,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping after in-flight work is dropped");
            cancel.cancel();
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    install_tracing();
    let cli = Cli::parse();

    let vocab = cli.vocabulary.build().context("invalid vocabulary")?;

    let config = LoaderConfig {
        batch_size: cli.tuning.load_batch_size,
        only_related: !cli.tuning.include_singletons,
        strategy: cli.tuning.strategy.into(),
        max_workers: cli.tuning.max_workers.unwrap_or_else(default_max_workers),
        parallel_types: cli.tuning.parallel_types,
    };

    let request = LoadRequest {
        entities: cli.entities.clone(),
        relations: cli.relations.clone(),
        labels: if cli.labels.is_empty() {
            vocab.label_names()
        } else {
            cli.labels.clone()
        },
        rel_types: if cli.rel_types.is_empty() {
            vocab.rel_type_names()
        } else {
            cli.rel_types.clone()
        },
    };

    let memory = cli.dry_run.then(|| Arc::new(MemoryStore::new()));
    let store: Arc<dyn GraphStore> = match &memory {
        Some(memory) => {
            info!("dry run: loading into an in-process store");
            memory.clone()
        }
        None => {
            let connection = ConnectionConfig {
                uri: cli.neo4j.uri.clone(),
                user: cli.neo4j.user.clone(),
                password: cli.neo4j.password.clone(),
                database: cli.neo4j.database.clone(),
                fetch_size: cli.neo4j.fetch_size,
            };
            let client = Neo4jClient::connect(&connection)
                .await
                .with_context(|| format!("cannot reach neo4j at {}", connection.uri))?;
            if cli.ensure_constraints {
                let labels: Vec<_> = request
                    .labels
                    .iter()
                    .filter_map(|l| vocab.label(l).ok())
                    .collect();
                client
                    .ensure_id_constraints(&labels)
                    .await
                    .context("failed to create id constraints")?;
            }
            Arc::new(client)
        }
    };

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let loader = Loader::new(store, vocab, config).with_cancellation(cancel);
    let report = match loader.run(&request).await {
        Ok(report) => report,
        Err(err) => {
            if err.is_retryable() {
                error!("transient store failure; re-running the load is safe");
            }
            return Err(err).context("load failed");
        }
    };

    match cli.format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        ),
    }

    if let Some(memory) = &memory {
        info!(
            nodes = memory.node_count(),
            edges = memory.edge_count(),
            "dry run store contents"
        );
    }

    if !report.is_complete() {
        bail!("some label groups failed or were rejected");
    }
    Ok(())
}
