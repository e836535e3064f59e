use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod error;
mod github;
mod triage;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable JSON
    let filter = if cli.global.verbose {
        EnvFilter::new("prtriage=debug")
    } else {
        EnvFilter::new("prtriage=info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let global = &cli.global;
    match cli.command {
        Commands::Triage(args) => cli::triage::execute(global, args).await,
        Commands::Label(args) => cli::label::execute(global, args).await,
        Commands::Assign(args) => cli::assign::execute(global, args).await,
        Commands::Init(args) => cli::init::execute(global, args).await,
        Commands::Prs => cli::pulls::list(global).await,
        Commands::Pr(args) => cli::pulls::show(global, args).await,
        Commands::Issue(command) => cli::issue::execute(global, command).await,
        Commands::Schema(args) => cli::schema::execute(args),
    }
}
