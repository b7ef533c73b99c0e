use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;
mod source;

#[derive(Parser)]
#[command(
    name = "binplan",
    about = "binplan — batch storage objects into capacity-bounded bins",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Log output format (logs go to stderr).
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a bin plan and print it.
    Plan {
        #[command(flatten)]
        job: JobArgs,
        /// Output format: text or json (the job response document).
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Build a bin plan and dispatch every bin to a worker.
    ///
    /// With --exec, the program runs once per bin and receives the bin as
    /// JSON on stdin. Without it, bins are only logged.
    Run {
        #[command(flatten)]
        job: JobArgs,
        /// Program to run per bin.
        #[arg(long)]
        exec: Option<String>,
        /// Argument passed to the --exec program (repeatable).
        #[arg(long = "arg", requires = "exec")]
        args: Vec<String>,
    },
    /// Write a binplan.toml with default settings.
    Init {
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Where the job comes from and what it runs against.
#[derive(Args)]
pub struct JobArgs {
    /// Job request JSON file.
    #[arg(short, long, conflicts_with_all = ["bucket", "credential_ref", "keys"])]
    pub request: Option<PathBuf>,
    /// Bucket to plan (instead of --request).
    #[arg(long, required_unless_present = "request")]
    pub bucket: Option<String>,
    /// Credential reference echoed to workers (instead of --request).
    #[arg(long, required_unless_present = "request")]
    pub credential_ref: Option<String>,
    /// Restrict the job to this key (repeatable).
    #[arg(long = "key")]
    pub keys: Vec<String>,
    /// JSON manifest catalog.
    #[arg(long, conflicts_with = "root", required_unless_present = "root")]
    pub manifest: Option<PathBuf>,
    /// Directory catalog root; each sub-directory is a bucket.
    #[arg(long)]
    pub root: Option<PathBuf>,
    /// Config file (default: ./binplan.toml when present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("binplan=info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    match cli.command {
        Commands::Plan { job, format } => commands::plan::plan(&job, format).await,
        Commands::Run { job, exec, args } => commands::run::run(&job, exec, args).await,
        Commands::Init { path, force } => commands::init::init(&path, force),
    }
}
