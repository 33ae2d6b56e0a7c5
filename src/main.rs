use clap::Parser;

use modsh::adapter::inbound::cli::command::{Cli, Commands};
use modsh::adapter::inbound::cli::output::{self, OutputConfig};
use modsh::adapter::inbound::cli::{check, run};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let result = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => run::execute(cli.config.as_deref(), cli.verbose).await,
        Commands::CheckConfig => check::execute(cli.config.as_deref()),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
