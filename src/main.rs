use anyhow::Result;
use atmos_fx::{cli::Cli, logging};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::log_path(cli.log_file.as_deref()).as_deref())?;
    atmos_fx::run(cli).await
}
