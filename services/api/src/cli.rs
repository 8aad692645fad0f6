use crate::demo::{run_analyze, run_demo, run_recommend, AnalyzeArgs, DemoArgs, RecommendArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use food_share::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Food Share",
    about = "Match food donations with nearby organizations and assess food photos",
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
    /// Rank organizations from CSV exports for a single donor
    Recommend(RecommendArgs),
    /// Assess the quality of a food photo with the configured classifier
    Analyze(AnalyzeArgs),
    /// Run an end-to-end demo of registration, donation, and matching
    Demo(DemoArgs),
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
        Command::Recommend(args) => run_recommend(args),
        Command::Analyze(args) => run_analyze(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
