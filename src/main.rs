//! resttoken CLI binary entry point.

use clap::Parser;
use resttoken::cli::{commands, init_tracing, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Fetch(args) => commands::handle_fetch(args).await,
        Commands::Config(args) => commands::handle_config(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
