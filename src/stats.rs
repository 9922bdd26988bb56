//! Statistics tracking for the simulation.

use crate::collection::BoundedCollection;
use crate::config::HumanRules;
use crate::human::Human;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Events counted during a single tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Humans born this tick
    pub births: usize,
    /// Humans moved to the dead collection this tick
    pub deaths: usize,
    /// Fruits spawned this tick
    pub spawned: usize,
    /// Fruits removed because they rotted
    pub rotted: usize,
    /// Fruits removed because a human ate them
    pub eaten: usize,
    /// Entities dropped to make room in a full collection
    pub evictions: usize,
    /// Entities refused by a full collection
    pub rejections: usize,
}

impl TickReport {
    /// Entities lost to capacity limits
    pub fn dropped(&self) -> usize {
        self.evictions + self.rejections
    }
}

/// Running totals since the world was created
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub births: u64,
    pub deaths: u64,
    pub spawned: u64,
    pub rotted: u64,
    pub eaten: u64,
    pub evictions: u64,
    pub rejections: u64,
}

impl Totals {
    pub fn add(&mut self, report: &TickReport) {
        self.births += report.births as u64;
        self.deaths += report.deaths as u64;
        self.spawned += report.spawned as u64;
        self.rotted += report.rotted as u64;
        self.eaten += report.eaten as u64;
        self.evictions += report.evictions as u64;
        self.rejections += report.rejections as u64;
    }
}

/// Statistics snapshot for a simulation tick
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Current simulation time
    pub time: u64,
    /// Living humans
    pub alive: usize,
    /// Corpses
    pub dead: usize,
    /// Fruits on the ground
    pub fruits: usize,
    /// Living adults
    pub adults: usize,
    /// Mean weight of living humans
    pub weight_mean: f32,
    /// Mean age of living humans
    pub age_mean: f32,
    /// Events of the last tick
    pub last_tick: TickReport,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats from current simulation state
    pub fn update(
        &mut self,
        alive: &BoundedCollection<Human>,
        dead: usize,
        fruits: usize,
        rules: &HumanRules,
        report: TickReport,
    ) {
        self.alive = alive.len();
        self.dead = dead;
        self.fruits = fruits;
        self.last_tick = report;

        if alive.is_empty() {
            self.adults = 0;
            self.weight_mean = 0.0;
            self.age_mean = 0.0;
        } else {
            let n = alive.len() as f32;
            self.adults = alive.iter().filter(|h| h.is_adult(rules)).count();
            self.weight_mean = alive.iter().map(|h| h.weight as f32).sum::<f32>() / n;
            self.age_mean = alive.iter().map(|h| h.age(rules) as f32).sum::<f32>() / n;
        }
    }

    /// Write this snapshot as pretty JSON, used for the final-stats report
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Read a snapshot written by [`Stats::write_json`]
    pub fn read_json<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(std::io::Error::from)
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        let line = format!(
            "T:{:6} | Alive:{:5} | Adults:{:4} | Dead:{:5} | Fruit:{:5} | Weight:{:.1} | Age:{:.1}",
            self.time,
            self.alive,
            self.adults,
            self.dead,
            self.fruits,
            self.weight_mean,
            self.age_mean,
        );
        if self.last_tick.dropped() > 0 {
            format!("{} | Dropped:{}", line, self.last_tick.dropped())
        } else {
            line
        }
    }
}

/// Historical statistics tracker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// All recorded stats snapshots
    pub snapshots: Vec<Stats>,
    /// Recording interval
    pub interval: u64,
}

impl StatsHistory {
    /// Create new history with recording interval
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval,
        }
    }

    /// True when a snapshot is due at `time`
    pub fn is_due(&self, time: u64) -> bool {
        self.interval > 0 && time % self.interval == 0
    }

    /// Record a stats snapshot
    pub fn record(&mut self, stats: Stats) {
        self.snapshots.push(stats);
    }

    /// Latest snapshot at or before `time`
    pub fn get_at(&self, time: u64) -> Option<&Stats> {
        self.snapshots.iter().rev().find(|s| s.time <= time)
    }

    /// Living population over time
    pub fn alive_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.time, s.alive)).collect()
    }

    /// Corpse count over time
    pub fn dead_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.time, s.dead)).collect()
    }

    /// Fruit count over time
    pub fn fruit_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.time, s.fruits)).collect()
    }

    /// Save history to file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
