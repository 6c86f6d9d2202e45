use crate::commands::{
    run_batch, run_normalize, run_slug, run_storage_path, BatchArgs, NormalizeArgs, SlugArgs,
    StoragePathArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use paperflow::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "paperflow",
    about = "Canonicalize document correspondents and plan their storage paths",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the canonical name and slug for one or more raw names
    Normalize(NormalizeArgs),
    /// Print the path slug for a display name
    Slug(SlugArgs),
    /// Print the storage path plan for a raw correspondent name
    StoragePath(StoragePathArgs),
    /// Resolve a CSV of raw names into canonical names and storage paths
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Normalize(args) => run_normalize(args),
        Command::Slug(args) => run_slug(args),
        Command::StoragePath(args) => run_storage_path(args),
        Command::Batch(args) => run_batch(args),
    }
}
