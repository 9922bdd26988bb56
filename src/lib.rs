//! # ORCHARD
//!
//! Discrete-time artificial-life simulation of wandering humans and rotting
//! fruit.
//!
//! Humans random-walk inside a bounded rectangle, age, lose weight, starve or
//! die of old age, breed when well fed, and leave corpses behind. Fruit spawns
//! every tick, rots after a while, and is eaten by any human whose box it
//! touches.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orchard::{Config, World};
//!
//! let mut world = World::new_with_seed(Config::default(), 42);
//! world.run(1000).unwrap();
//!
//! println!("Alive: {}", world.population());
//! println!("Corpses: {}", world.dead.len());
//! ```
//!
//! ## Driving frames
//!
//! The loop talks to the outside world through the traits in [`host`]. A
//! headless host is provided:
//!
//! ```rust
//! use orchard::host::HeadlessHost;
//! use orchard::{drive, Config, World};
//!
//! let mut world = World::new_with_seed(Config::default(), 7);
//! let mut host = HeadlessHost::new(60);
//! let summary = drive(&mut world, &mut host).unwrap();
//! assert_eq!(summary.ticks, 60);
//! ```

pub mod bounds;
pub mod collection;
pub mod config;
pub mod error;
pub mod fruit;
pub mod host;
pub mod human;
pub mod stats;
pub mod world;

// Re-export main types
pub use collection::{BoundedCollection, CapacityPolicy};
pub use config::Config;
pub use error::{CollectionError, ConfigError, SimError};
pub use fruit::Fruit;
pub use human::Human;
pub use world::{drive, RunSummary, World};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(ticks: u64, humans: usize) -> Result<BenchmarkResult, SimError> {
    use std::time::Instant;

    let mut config = Config::default();
    config.population.initial_humans = humans;
    config.population.capacity = config.population.capacity.max(humans);

    let mut world = World::new(config);

    let start = Instant::now();
    world.run(ticks)?;
    let elapsed = start.elapsed();

    Ok(BenchmarkResult {
        ticks,
        initial_humans: humans,
        final_alive: world.population(),
        final_dead: world.dead.len(),
        elapsed_secs: elapsed.as_secs_f64(),
        ticks_per_second: ticks as f64 / elapsed.as_secs_f64(),
    })
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub ticks: u64,
    pub initial_humans: usize,
    pub final_alive: usize,
    pub final_dead: usize,
    pub elapsed_secs: f64,
    pub ticks_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Ticks: {}", self.ticks)?;
        writeln!(f, "Humans: {} -> {}", self.initial_humans, self.final_alive)?;
        writeln!(f, "Corpses: {}", self.final_dead)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} ticks/s", self.ticks_per_second)?;
        Ok(())
    }
}
