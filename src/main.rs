use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use cloudcost::catalog::{Catalog, CatalogFilter};
use cloudcost::config::{self, Config};
use cloudcost::engine;
use cloudcost::report;
use cloudcost::scenario::{CommitmentTerm, Scenario, TimePeriod};

#[derive(Parser)]
#[command(name = "cloudcost")]
#[command(
    about = "Cloud provider pricing explorer and cost simulator",
    long_about = "cloudcost compares cloud provider list prices and simulates multi-service costs.\n\nViews:\n  - Filtered catalog listing\n  - On-demand vs reserved term comparison\n  - Price-to-performance ranking\n  - Regional price spread\n  - Scenario cost simulation with reserved-instance savings"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pricing CSV path (overrides the config file)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    output: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog offerings, optionally filtered
    Catalog {
        /// Filter by provider (repeatable)
        #[arg(long)]
        provider: Vec<String>,
        /// Filter by service (repeatable)
        #[arg(long)]
        service: Vec<String>,
        /// Filter by region (repeatable)
        #[arg(long)]
        region: Vec<String>,
        /// Filter by usage type (repeatable)
        #[arg(long)]
        usage_type: Vec<String>,
    },
    /// Compare on-demand and reserved costs across providers
    Compare {
        /// Usage type to compare (Storage, Compute, Database, ...)
        #[arg(long, default_value = "Storage")]
        usage_type: String,
        /// Usage amount in the offering's unit
        #[arg(long, default_value_t = 100.0)]
        quantity: f64,
        /// Restrict to one region
        #[arg(long)]
        region: Option<String>,
    },
    /// Rank offerings by price-to-performance ratio
    Ratio {
        /// Filter by provider (repeatable)
        #[arg(long)]
        provider: Vec<String>,
        /// Filter by usage type (repeatable)
        #[arg(long)]
        usage_type: Vec<String>,
    },
    /// Show regional price spread for one service
    Spread {
        /// Service name (exact match)
        service: String,
    },
    /// Simulate a scenario file's total cost
    Simulate {
        /// Scenario TOML file
        scenario: PathBuf,
        /// Override the commitment term of every line (on-demand, 1yr, 3yr)
        #[arg(long)]
        term: Option<CommitmentTerm>,
        /// Reporting period (day, month, year)
        #[arg(long)]
        period: Option<TimePeriod>,
    },
    /// Initialize configuration (and optionally the sample pricing CSV)
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".cloudcost.toml")]
        output: PathBuf,
        /// Also write the built-in sample catalog to this CSV path
        #[arg(long)]
        sample_data: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Suppress INFO by default, only show warnings and errors
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let json = cli.output == "json";

    match cli.command {
        Commands::Catalog {
            provider,
            service,
            region,
            usage_type,
        } => {
            let catalog = load_catalog(&cli.data, &config);
            let filter = CatalogFilter {
                providers: provider,
                services: service,
                regions: region,
                usage_types: usage_type,
            };
            let filtered = catalog.filter(&filter);
            if json {
                println!("{}", serde_json::to_string_pretty(filtered.offerings())?);
            } else {
                report::print_catalog(&filtered, &config.display);
            }
        }
        Commands::Compare {
            usage_type,
            quantity,
            region,
        } => {
            let catalog = load_catalog(&cli.data, &config);
            let filter = CatalogFilter {
                usage_types: vec![usage_type],
                regions: region.into_iter().collect(),
                ..Default::default()
            };
            let rows: Vec<_> = catalog
                .filter(&filter)
                .offerings()
                .iter()
                .map(|o| engine::compare_terms(o, quantity))
                .collect::<cloudcost::Result<_>>()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                report::print_comparison(&rows, &config.display);
            }
        }
        Commands::Ratio {
            provider,
            usage_type,
        } => {
            let catalog = load_catalog(&cli.data, &config);
            let filter = CatalogFilter {
                providers: provider,
                usage_types: usage_type,
                ..Default::default()
            };
            let ranking = engine::ratio_ranking(&catalog.filter(&filter));
            if json {
                println!("{}", serde_json::to_string_pretty(&ranking)?);
            } else {
                report::print_ratio_ranking(&ranking, &config.display);
            }
        }
        Commands::Spread { service } => {
            let catalog = load_catalog(&cli.data, &config);
            let spread = engine::regional_spread(&catalog, &service);
            let premiums = engine::regional_premiums(&catalog, &service);
            if json {
                println!("{}", serde_json::to_string_pretty(&spread)?);
            } else {
                report::print_spread(&service, &spread, &premiums, &config.display);
            }
        }
        Commands::Simulate {
            scenario,
            term,
            period,
        } => {
            let catalog = load_catalog(&cli.data, &config);
            let mut scenario = Scenario::load(&scenario)?;
            if let Some(term) = term {
                for line in &mut scenario.line_items {
                    line.term = Some(term);
                }
            }
            let period = match period {
                Some(p) => p,
                None => config.simulation.default_period.parse()?,
            };
            let default_term: CommitmentTerm = config.simulation.default_term.parse()?;
            let items = scenario.resolve(&catalog, default_term);
            let result = engine::simulate_for_period(&items, period)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                report::print_simulation(&result, &config.display, &config.catalog.currency);
            }
        }
        Commands::Init {
            output,
            sample_data,
        } => {
            config::init_config(&output)?;
            if let Some(path) = sample_data {
                Catalog::sample().write_csv(&path)?;
                println!("Wrote sample pricing data: {}", path.display());
            }
        }
    }

    Ok(())
}

fn load_catalog(data: &Option<PathBuf>, config: &Config) -> Catalog {
    let path: Option<&Path> = data.as_deref().or(config.catalog.path.as_deref());
    Catalog::load(path)
}
