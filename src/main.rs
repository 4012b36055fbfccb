use anyhow::Result;
use tracing::{info, error};

mod batch;
mod cli;
mod discovery;
mod storage;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse_args();

    utils::init_logging(args.verbose, args.log_file.clone())?;

    info!("Starting Career Finder v{}", env!("CARGO_PKG_VERSION"));

    match cli::process_command(args).await {
        Ok(_) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            Err(e)
        }
    }
}
