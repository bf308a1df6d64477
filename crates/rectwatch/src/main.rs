mod client;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rectwatch",
    version,
    about = "Finds rectangles overlapping a reference rectangle and records the matches"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Run the HTTP server in the foreground
    Serve,
    /// Show whether the server is running
    Status,
    /// Submit a query document and print the stored matches
    Submit {
        /// Path to a JSON query, or "-" for stdin
        file: PathBuf,
        /// Server address (defaults to the configured bind address)
        #[arg(long)]
        addr: Option<String>,
    },
    /// List every stored match
    List {
        /// Server address (defaults to the configured bind address)
        #[arg(long)]
        addr: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Serve => commands::serve::execute(),
        Commands::Status => commands::status::execute(),
        Commands::Submit { file, addr } => commands::submit::execute(&file, addr),
        Commands::List { addr } => commands::list::execute(addr),
    }
}
