//! World simulation engine - main simulation loop.
//!
//! One call to [`World::step`] is one tick: spawn fruit, draw corpses, age and
//! rot fruit, then move, age, kill, breed and feed the living. Every scan that
//! can remove elements uses an explicit cursor that is only advanced when the
//! element under it survives, so the element shifted into a freed slot is
//! still visited in the same pass.

use crate::collection::BoundedCollection;
use crate::config::Config;
use crate::error::{CollectionError, ConfigError, SimError};
use crate::fruit::Fruit;
use crate::host::{Aabb, Canvas, Collider, FrameHost, NullCanvas, RandomSource, SeededRandom};
use crate::human::Human;
use crate::stats::{Stats, StatsHistory, TickReport, Totals};
use std::fmt;

/// The simulation world
pub struct World<R = SeededRandom, C = Aabb> {
    // Populations
    pub alive: BoundedCollection<Human>,
    pub dead: BoundedCollection<Human>,
    pub fruits: BoundedCollection<Fruit>,

    // State
    pub time: u64,

    // Statistics
    pub stats: Stats,
    pub stats_history: StatsHistory,
    pub totals: Totals,

    // Fixed at construction
    config: Config,

    // Collaborators
    rng: R,
    collider: C,
}

impl World<SeededRandom, Aabb> {
    /// Create a new world with the given configuration
    pub fn new(config: Config) -> Self {
        Self::with_services(config, SeededRandom::from_entropy(), Aabb)
    }

    /// Create a new world with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, seed: u64) -> Self {
        Self::with_services(config, SeededRandom::new(seed), Aabb)
    }

    /// Seed of the random source
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}

impl<R: RandomSource, C: Collider> World<R, C> {
    /// Validate `config`, then build the world as [`World::with_services`] does.
    pub fn try_with_services(config: Config, rng: R, collider: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_services(config, rng, collider))
    }

    /// Create a world around explicit collaborators and seed the initial
    /// population at random positions.
    ///
    /// `config` is taken as is. A zero `metabolism_period` panics on the first
    /// tick, so configs that did not come from [`Config::from_file`] should go
    /// through [`World::try_with_services`].
    pub fn with_services(config: Config, mut rng: R, collider: C) -> Self {
        let capacity = config.population.capacity;
        let policy = config.population.capacity_policy;
        let bounds = config.world.bounds;

        let mut alive = BoundedCollection::with_policy(capacity, policy);
        for _ in 0..config.population.initial_humans {
            let x = rng.uniform_int(bounds.left, bounds.right);
            let y = rng.uniform_int(bounds.top, bounds.bottom);
            if alive.push(Human::new(x, y, &config.human)).is_err() {
                break;
            }
        }

        log::info!(
            "World created: humans={} bounds={}x{} capacity={} policy={:?}",
            alive.len(),
            bounds.width(),
            bounds.height(),
            capacity,
            policy
        );

        let mut stats = Stats::new();
        stats.update(&alive, 0, 0, &config.human, TickReport::default());

        Self {
            alive,
            dead: BoundedCollection::with_policy(capacity, policy),
            fruits: BoundedCollection::with_policy(capacity, policy),
            time: 0,
            stats,
            stats_history: StatsHistory::new(config.logging.stats_interval),
            totals: Totals::default(),
            config,
            rng,
            collider,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Main simulation step. Draw requests go to `canvas`.
    pub fn step<K: Canvas + ?Sized>(&mut self, canvas: &mut K) -> Result<TickReport, SimError> {
        let mut report = TickReport::default();

        // Phase 1: Spawn fruit
        self.spawn_fruits(&mut report)?;

        // Phase 2: Corpses are only drawn
        for corpse in &self.dead {
            corpse.draw_corpse(&self.config.human, canvas);
        }

        // Phase 3: Age fruit, drop the rotten ones
        self.update_fruits(canvas, &mut report)?;

        // Phase 4: Living humans
        self.update_humans(canvas, &mut report)?;

        // Phase 5: Statistics
        self.time += 1;
        self.update_stats(report);

        if report.births > 0 || report.deaths > 0 {
            log::debug!(
                "T:{} births={} deaths={} alive={} dead={}",
                self.time,
                report.births,
                report.deaths,
                self.alive.len(),
                self.dead.len()
            );
        }

        Ok(report)
    }

    fn spawn_fruits(&mut self, report: &mut TickReport) -> Result<(), CollectionError> {
        let bounds = self.config.world.bounds;
        for _ in 0..self.config.population.fruit_per_tick {
            let x = self.rng.uniform_int(bounds.left, bounds.right);
            let y = self.rng.uniform_int(bounds.top, bounds.bottom);
            admit(&mut self.fruits, Fruit::new(x, y), report)?;
            report.spawned += 1;
        }
        Ok(())
    }

    fn update_fruits<K: Canvas + ?Sized>(
        &mut self,
        canvas: &mut K,
        report: &mut TickReport,
    ) -> Result<(), CollectionError> {
        let mut i = 0;
        while i < self.fruits.len() {
            let rotten = self.fruits.get_mut(i)?.tick(&self.config.fruit, canvas);
            if rotten {
                self.fruits.remove_at(i)?;
                report.rotted += 1;
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    fn update_humans<K: Canvas + ?Sized>(
        &mut self,
        canvas: &mut K,
        report: &mut TickReport,
    ) -> Result<(), CollectionError> {
        let mut i = 0;
        while i < self.alive.len() {
            let human = self.alive.get_mut(i)?;
            let events = human.tick(
                &self.config.human,
                &self.config.world.bounds,
                &mut self.rng,
                canvas,
            );
            let (x, y) = (human.x, human.y);

            // A dying parent leaves before its child is pushed, so the child
            // cannot evict it from a full collection.
            if events.died {
                let corpse = self.alive.remove_at(i)?;
                admit(&mut self.dead, corpse, report)?;
                report.deaths += 1;
            } else {
                self.feed(i, report)?;
            }

            if events.multiplied {
                admit(&mut self.alive, Human::new(x, y, &self.config.human), report)?;
                report.births += 1;
            }

            if !events.died {
                i += 1;
            }
        }
        Ok(())
    }

    /// Let the human at `index` eat every fruit its box overlaps
    fn feed(&mut self, index: usize, report: &mut TickReport) -> Result<(), CollectionError> {
        let reach = self.alive.get(index)?.bounding_box(&self.config.human);

        let mut j = 0;
        while j < self.fruits.len() {
            let fruit_box = self.fruits.get(j)?.bounding_box(&self.config.fruit);
            if self.collider.boxes_overlap(reach, fruit_box) {
                self.alive.get_mut(index)?.eat(&self.config.human);
                self.fruits.remove_at(j)?;
                report.eaten += 1;
            } else {
                j += 1;
            }
        }
        Ok(())
    }

    fn update_stats(&mut self, report: TickReport) {
        self.totals.add(&report);
        self.stats.time = self.time;
        self.stats.update(
            &self.alive,
            self.dead.len(),
            self.fruits.len(),
            &self.config.human,
            report,
        );

        if self.stats_history.is_due(self.time) {
            self.stats_history.record(self.stats.clone());
        }
    }

    /// Run simulation for specified number of ticks without drawing
    pub fn run(&mut self, ticks: u64) -> Result<(), SimError> {
        for _ in 0..ticks {
            self.step(&mut NullCanvas)?;
        }
        Ok(())
    }

    /// Run simulation with callback for progress updates
    pub fn run_with_callback<F>(&mut self, ticks: u64, mut callback: F) -> Result<(), SimError>
    where
        F: FnMut(&Self, u64),
    {
        for i in 0..ticks {
            self.step(&mut NullCanvas)?;
            callback(self, i);
        }
        Ok(())
    }

    /// Current living population
    pub fn population(&self) -> usize {
        self.alive.len()
    }

    /// Check if all humans have died
    pub fn is_extinct(&self) -> bool {
        self.alive.is_empty()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.time,
            alive: self.alive.len(),
            dead: self.dead.len(),
            fruits: self.fruits.len(),
            totals: self.totals,
        }
    }
}

/// Push into a collection, turning capacity overflow into report counters.
/// The overflowing entity (evicted or refused) is dropped here.
fn admit<T>(
    collection: &mut BoundedCollection<T>,
    value: T,
    report: &mut TickReport,
) -> Result<(), CollectionError> {
    match collection.push(value) {
        Ok(None) => Ok(()),
        Ok(Some(_evicted)) => {
            report.evictions += 1;
            Ok(())
        }
        Err(CollectionError::CapacityExceeded { .. }) => {
            report.rejections += 1;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Drive the world frame by frame until the host asks to close.
///
/// Each iteration polls `should_close` once, then brackets one tick with
/// `begin_frame`, `clear` and `end_frame`.
pub fn drive<H, R, C>(world: &mut World<R, C>, host: &mut H) -> Result<RunSummary, SimError>
where
    H: FrameHost,
    R: RandomSource,
    C: Collider,
{
    let background = world.config().world.background;

    while !host.should_close() {
        host.begin_frame();
        host.clear(background);
        world.step(host)?;
        host.end_frame();
    }

    let summary = world.summary();
    log::info!("Simulation stopped after {} ticks", summary.ticks);
    Ok(summary)
}

/// Final state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub alive: usize,
    pub dead: usize,
    pub fruits: usize,
    pub totals: Totals,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Complete ===")?;
        writeln!(f, "Ticks: {}", self.ticks)?;
        writeln!(f, "Alive: {}", self.alive)?;
        writeln!(f, "Dead: {}", self.dead)?;
        writeln!(f, "Births: {}", self.totals.births)?;
        writeln!(f, "Fruits eaten: {}", self.totals.eaten)?;
        writeln!(f, "Fruits rotted: {}", self.totals.rotted)?;
        if self.totals.evictions + self.totals.rejections > 0 {
            writeln!(
                f,
                "Dropped at capacity: {} evicted, {} rejected",
                self.totals.evictions, self.totals.rejections
            )?;
        }
        write!(f, "fruits: {}", self.fruits)
    }
}
