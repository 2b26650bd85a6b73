use clap::Parser;
use escrow_ledger::domain::ports::EscrowStoreBox;
use escrow_ledger::infrastructure::in_memory::InMemoryStore;
#[cfg(feature = "storage-rocksdb")]
use escrow_ledger::infrastructure::rocksdb::RocksDbStore;
use escrow_ledger::interfaces::csv::instruction_reader::InstructionReader;
use escrow_ledger::interfaces::csv::report_writer::ReportWriter;
use escrow_ledger::interfaces::scenario::ScenarioRunner;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input scenario CSV file
    scenario: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Audit channels go to stderr so the report CSV on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    #[cfg(feature = "storage-rocksdb")]
    let store: EscrowStoreBox = match &cli.db_path {
        Some(path) => Box::new(RocksDbStore::open(path).into_diagnostic()?),
        None => Box::new(InMemoryStore::new()),
    };
    #[cfg(not(feature = "storage-rocksdb"))]
    let store: EscrowStoreBox = Box::new(InMemoryStore::new());

    let mut runner = ScenarioRunner::new(store);

    let file = File::open(&cli.scenario).into_diagnostic()?;
    let reader = InstructionReader::new(file);
    for result in reader.instructions() {
        match result {
            Ok(instruction) => {
                if let Err(e) = runner.apply(instruction).await {
                    eprintln!("Error processing instruction: {e}");
                }
            }
            Err(e) => {
                eprintln!("Error reading instruction: {e}");
            }
        }
    }

    let rows = runner.balances().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_rows(rows).into_diagnostic()?;

    Ok(())
}
