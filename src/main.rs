//! ORCHARD - CLI Entry Point
//!
//! Runs the simulation headlessly and reports population statistics.

use clap::{Parser, Subcommand};
use orchard::host::{Aabb, HeadlessHost, SeededRandom};
use orchard::{benchmark, drive, Config, World};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "orchard")]
#[command(version)]
#[command(about = "Artificial-life simulation of wandering humans and rotting fruit")]
struct Cli {
    /// Log level filter (overrides RUST_LOG and the config file)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "orchard.yaml")]
        config: PathBuf,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "3600")]
        ticks: u64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Write the sampled stats history to this JSON file
        #[arg(long)]
        stats_out: Option<PathBuf>,

        /// Write the last stats snapshot to this JSON file
        #[arg(long)]
        final_stats: Option<PathBuf>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of ticks
        #[arg(short, long, default_value = "1000")]
        ticks: u64,

        /// Initial humans
        #[arg(long, default_value = "200")]
        humans: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "orchard.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The config file names the default log level, so it is read first
    let config = match &cli.command {
        Commands::Run { config, .. } => load_config(config)?,
        _ => Config::default(),
    };
    init_logging(&config.logging.log_level, cli.log_level.as_deref());

    match cli.command {
        Commands::Run {
            config: config_path,
            ticks,
            seed,
            stats_out,
            final_stats,
            quiet,
        } => {
            if config_path.exists() {
                log::info!("Loaded config from: {:?}", config_path);
            } else {
                log::info!("Using default configuration");
            }
            run_simulation(config, ticks, seed, stats_out, final_stats, quiet)
        }

        Commands::Benchmark { ticks, humans } => run_benchmark(ticks, humans),

        Commands::Init { output } => generate_config(output),
    }
}

fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(Config::from_file(path)?)
    } else {
        Ok(Config::default())
    }
}

/// RUST_LOG beats the config file, `--log-level` beats both.
fn init_logging(config_level: &str, cli_level: Option<&str>) {
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config_level));
    if let Some(level) = cli_level {
        logger.parse_filters(level);
    }
    logger.init();
}

fn run_simulation(
    config: Config,
    ticks: u64,
    seed: Option<u64>,
    stats_out: Option<PathBuf>,
    final_stats: Option<PathBuf>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let rng = match seed {
        Some(s) => SeededRandom::new(s),
        None => SeededRandom::from_entropy(),
    };
    let mut world = World::try_with_services(config.clone(), rng, Aabb)?;

    let bounds = config.world.bounds;
    println!("Starting simulation");
    println!("  Seed: {}", world.seed());
    println!("  Initial humans: {}", world.population());
    println!("  World: {}x{}", bounds.width(), bounds.height());
    println!("  Ticks: {}", ticks);
    println!();

    let start = Instant::now();
    let stats_interval = config.logging.stats_interval;

    // Drive in chunks so progress can be reported between them
    let mut remaining = ticks;
    while remaining > 0 {
        let chunk = remaining.min(stats_interval);
        let mut host = HeadlessHost::new(chunk);
        drive(&mut world, &mut host)?;
        remaining -= chunk;

        if !quiet {
            log::info!("{}", world.stats.summary());
        }
    }

    let elapsed = start.elapsed();
    let summary = world.summary();

    println!();
    println!("Elapsed: {:.2}s ({:.1} ticks/s)", elapsed.as_secs_f64(), world.time as f64 / elapsed.as_secs_f64());
    println!("{}", summary);

    if let Some(path) = stats_out {
        let path = path.to_string_lossy();
        world.stats_history.save(&path)?;
        println!("Stats history: {}", path);
    }

    if let Some(path) = final_stats {
        world.stats.write_json(&path)?;
        println!("Final stats: {:?}", path);
    }

    Ok(())
}

fn run_benchmark(ticks: u64, humans: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== ORCHARD Benchmark ===");
    println!("Ticks: {}", ticks);
    println!("Humans: {}", humans);
    println!();

    let result = benchmark(ticks, humans)?;
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
