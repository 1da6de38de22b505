use clap::{Parser, Subcommand};

mod analyze;
mod categorize;
mod export;
mod ingest;
mod providers;

#[derive(Debug, Parser)]
#[command(name = "machmatch")]
#[command(about = "Prospect-to-machinery-provider matching")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full matching pipeline and export report files
    Analyze(analyze::AnalyzeArgs),
    /// Scrape or refresh the exhibitor cache
    Providers,
    /// Bucket a prospects CSV by region and revenue size
    Categorize(categorize::CategorizeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = machmatch_core::load_app_config()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => analyze::run_analyze(&config, &args).await,
        Commands::Providers => providers::run_providers(&config).await,
        Commands::Categorize(args) => categorize::run_categorize(&args),
    }
}
