//! Gatekeeper - join admission CLI

use clap::Parser;
use tracing::{error, info};

use gatekeeper::{
    config::{Args, Command},
    logging, Scenario,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init(&args.log_level, args.log_json);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let config = args.evaluator_config()?;

    match &args.command {
        Command::Evaluate { scenario, pretty } => {
            info!(scenario = %scenario.display(), "Running join scenario");
            let report = Scenario::load(scenario)?.run(config).await?;
            let rendered = if *pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{rendered}");
        }
        Command::ShowConfig => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
