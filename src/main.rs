use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gift_recommender::budget::Budget;
use gift_recommender::config::{Config, ConfigOverrides};
use gift_recommender::output::csv::report_to_csv;
use gift_recommender::output::render_json;
use gift_recommender::output::table::render_report_table;
use gift_recommender::recommend::RecommendationReport;
use gift_recommender::registry::{build_source, ItemQuery};
use gift_recommender::server::run_server;
use gift_recommender::service::recommend_from_source;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "gift-recommender",
    about = "Budget-based gift recommendations for wishlist registries"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Recommend {
        #[arg(short, long, allow_hyphen_values = true)]
        budget: f64,
        #[arg(long)]
        currency: Option<String>,
        #[arg(short, long)]
        friend: Option<String>,
        #[arg(short, long)]
        registry: Option<String>,
        /// JSON array of registry items; overrides the configured source.
        #[arg(short, long)]
        items: Option<PathBuf>,
    },
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    init_tracing(&config);

    match cli.command {
        Commands::Config { init, show } => {
            handle_config_command(init, show, &config, &config_path)
        }
        Commands::Serve { host, port } => {
            config.apply_overrides(ConfigOverrides {
                host,
                port,
                ..ConfigOverrides::default()
            });
            let bind = config.bind_address();
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            run_server(config, addr).await
        }
        Commands::Recommend {
            budget,
            currency,
            friend,
            registry,
            items,
        } => {
            config.apply_overrides(ConfigOverrides {
                items_path: items.map(|p| p.to_string_lossy().into_owned()),
                ..ConfigOverrides::default()
            });
            let currency = currency.unwrap_or_else(|| config.budget.default_currency.clone());
            let budget = Budget::new(budget, &currency)?;
            let source = build_source(&config)?;
            let query = ItemQuery {
                friend_id: friend,
                registry_id: registry,
            };
            let report = recommend_from_source(source.as_ref(), &query, &budget).await?;
            print_report(&report, cli.output)
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_config_command(
    init: bool,
    show: bool,
    config: &Config,
    config_path: &Path,
) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_report(report: &RecommendationReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_report_table(report)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => print!("{}", report_to_csv(report)?),
    }
    Ok(())
}
