//! reviewgraph — load a review export and inspect products.

use analysis::{LexiconScorer, ProductReport};
use anyhow::Context;
use clap::{Parser, Subcommand};
use ingestion::{GraphLoader, LoadedGraph};
use reviewgraph_core::config::AppConfig;
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser)]
#[command(name = "reviewgraph", version, about = "Product review graph explorer")]
struct Cli {
    /// Directory holding default.toml and per-mode overrides
    #[arg(long, default_value = "config", global = true)]
    config_dir: PathBuf,

    /// Review export to load (overrides ingestion.data_path)
    #[arg(long, global = true, env = "REVIEWGRAPH_DATA")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List every product key in load order
    Products,
    /// Show the analysis report for a product
    Report {
        asin: String,

        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Print positive reviews of products sharing reviewers with ASIN, as JSON
    Similar { asin: String },
}

#[tokio::main]
async fn main() {
    reviewgraph_core::init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if !AppConfig::has_default_file(&cli.config_dir) {
        warn!(
            "No default config in {}; using built-in defaults",
            cli.config_dir.display()
        );
    }
    let mut config = AppConfig::load_or_default(&cli.config_dir)
        .with_context(|| format!("invalid config in {}", cli.config_dir.display()))?;
    if let Some(data) = &cli.data {
        config.ingestion.data_path = data.to_string_lossy().into_owned();
    }

    let loaded = GraphLoader::new(config.ingestion.clone())
        .load_configured()
        .await
        .with_context(|| format!("failed to load {}", config.ingestion.data_path))?;

    match cli.command {
        Commands::Products => {
            for asin in &loaded.products {
                println!("{}", asin);
            }
        }
        Commands::Report { asin, format } => {
            let report =
                ProductReport::build(&loaded.graph, &asin, &LexiconScorer::default(), &config.analysis)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => print_report(&report, &loaded),
            }
        }
        Commands::Similar { asin } => {
            let similar = loaded.graph.similar_product_reviews(&asin)?;
            println!("{}", serde_json::to_string_pretty(&similar)?);
        }
    }
    Ok(())
}

fn print_report(report: &ProductReport, loaded: &LoadedGraph) {
    println!(
        "Product {} ({} of {} products loaded)",
        report.asin,
        loaded.products.get_index_of(&report.asin).map_or(0, |i| i + 1),
        loaded.products.len()
    );
    println!("  reviews: {}", report.review_count);
    println!(
        "  sentiment: neg {:.2}  neu {:.2}  pos {:.2}  (mean compound {:.3})",
        report.sentiment.neg, report.sentiment.neu, report.sentiment.pos, report.sentiment.compound
    );
    for point in &report.rating_timeline {
        println!("    {}  {:.1}", point.date, point.rating);
    }

    println!("Similar products: {}", report.similar_review_counts.len());
    for (asin, count) in &report.similar_review_counts {
        let avg = report.average_sentiment.get(asin).copied().unwrap_or_default();
        println!("  {:<14} {:>3} review(s)  avg compound {:+.3}", asin, count, avg);
    }

    println!("Recommended: {}", report.recommended.join(", "));
    let terms: Vec<String> = report
        .top_terms
        .iter()
        .take(15)
        .map(|t| format!("{}({})", t.term, t.count))
        .collect();
    println!("Top terms: {}", terms.join(" "));
}
