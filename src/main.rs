use std::path::PathBuf;

use clap::Parser;

use statforge::config::AppConfig;
use statforge::core::assets::AssetLoader;
use statforge::core::build_optimizer::{
    optimize, AttributeKey, Catalog, OptimizationRequest, OptimizationResult,
};

#[derive(Parser)]
#[command(name = "statforge", about = "Attribute point allocation optimizer")]
#[command(version)]
struct Cli {
    /// Optimization request (YAML)
    request: PathBuf,

    /// Extra catalog (YAML) merged over the bundled one
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// RNG seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log filter, overrides the config file
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    let _log_guard = statforge::core::logging::init(&config.logging);
    log::info!("statforge v{} starting", statforge::VERSION);

    let mut catalog = AssetLoader::load_catalog();
    if let Some(path) = &cli.catalog {
        catalog.merge(Catalog::from_path(path)?);
    }

    let request = OptimizationRequest::from_path(&cli.request)?;

    let mut params = config.optimizer;
    if let Some(seed) = cli.seed {
        params = params.with_seed(seed);
    }

    let result = optimize(&request, &catalog, &params)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result);
    }

    Ok(())
}

fn print_report(result: &OptimizationResult) {
    println!("{:<14} {:>6} {:>6} {:>6}", "Attribute", "Points", "Raw", "Final");
    println!("{}", "-".repeat(35));
    for key in AttributeKey::ALL {
        println!(
            "{:<14} {:>6} {:>6} {:>6}",
            key.display_name(),
            result.allocation.get(key),
            result.stats.raw(key),
            result.stats.get(key)
        );
    }
    println!("{}", "-".repeat(35));
    println!(
        "Points: {}  Score: {:.1}  Health: {}  Resource pool: {}",
        result.total_points, result.score, result.health, result.resource_pool
    );

    if !result.reasoning.is_empty() {
        println!("\nReasoning:");
        for line in &result.reasoning {
            println!("  - {line}");
        }
    }

    if !result.warnings.is_empty() {
        println!("\nWarnings:");
        for line in &result.warnings {
            println!("  ! {line}");
        }
    }
}
