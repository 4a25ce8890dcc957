use anyhow::Context;
use clap::Parser;
use ingest_core::constants::{DATA_DIR_ENV_VAR, STORE_BACKEND_ENV_VAR};
use ingest_core::{
    DocumentStore, FileStore, IngestConfig, IngestService, Mapper, MongoStore, StoreBackend,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hl7-ingest")]
#[command(version, about = "Store HL7v2 messages as Patient and Observation documents")]
struct Cli {
    /// Input files, each holding MSH, PID, OBX and OBR segments on four lines
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

/// Entry point for the ingestion CLI
///
/// Every file is read, mapped and persisted in argument order. The first failure aborts
/// the remaining files and exits non-zero; documents already stored are kept.
///
/// # Environment Variables
/// - `INGEST_STORE`: `mongodb` (default, `localhost:27017`) or `file`
/// - `INGEST_DATA_DIR`: root directory of the file store (default: "encounter_data")
/// - `RUST_LOG`: log filter directives
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hl7_ingest=info".parse()?)
                .add_directive("ingest_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = IngestConfig::from_env_values(
        std::env::var(STORE_BACKEND_ENV_VAR).ok(),
        std::env::var(DATA_DIR_ENV_VAR).ok(),
    )?;

    // one connection for the whole run
    match config.backend() {
        StoreBackend::Mongo(mongo) => {
            let store = MongoStore::connect(mongo).with_context(|| {
                format!("cannot connect to store at {}:{}", mongo.host(), mongo.port())
            })?;
            tracing::info!("++ Storing into {} at {}", config.database(), store.address());
            ingest_files(&store, config.database(), &cli.files)
        }
        StoreBackend::File(file) => {
            let store = FileStore::connect(file).with_context(|| {
                format!("cannot open store at {}", file.data_dir().display())
            })?;
            tracing::info!(
                "++ Storing into {} at {}",
                config.database(),
                store.root_directory().display()
            );
            ingest_files(&store, config.database(), &cli.files)
        }
    }
}

/// Ingest each file in order, printing every stored id on its own line.
fn ingest_files<S: DocumentStore>(
    store: &S,
    database: &str,
    files: &[PathBuf],
) -> anyhow::Result<()> {
    let database = store.database(database)?;
    let service = IngestService::new(Mapper::default(), &database);

    for path in files {
        let ids = service
            .ingest_file(path)
            .with_context(|| format!("failed to ingest {}", path.display()))?;
        for id in ids {
            println!("{id}");
        }
    }

    Ok(())
}
