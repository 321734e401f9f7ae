// src/main.rs
mod utils;
mod pdf;
mod extractors;
mod storage;
mod batch;

use std::path::PathBuf;

use clap::Parser;
use utils::AppError;
use batch::{BatchConfig, BatchRunner};

/// Converts numbered-form PDFs into structured JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory scanned for `.pdf` files
    #[arg(short, long, default_value = "/app/input")]
    input_dir: PathBuf,

    /// Directory the `.json` files are written to
    #[arg(short, long, default_value = "/app/output")]
    output_dir: PathBuf,

    /// Process a single PDF instead of the whole input directory
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Debug mode - save annotated line dumps next to the JSON output
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            debug: self.debug,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Build the runner (creates the output directory)
    let runner = BatchRunner::new(args.batch_config())?;

    // 4. Single file mode
    if let Some(file) = &args.file {
        let outcome = runner.process_file(file).await;
        return outcome.result.map(|_| ()).map_err(AppError::from);
    }

    // 5. Whole directory, one file at a time
    let report = runner.run().await?;

    if report.succeeded() == 0 && report.failed() > 0 {
        return Err(AppError::Processing(format!(
            "Failed to extract any form from {} files",
            report.failed()
        )));
    }

    Ok(())
}
