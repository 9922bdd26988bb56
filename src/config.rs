//! Configuration system for the orchard simulation.
//!
//! Supports YAML configuration files with defaults matching the classic
//! 302x164 orchard. The configuration is handed to the world at construction
//! and never mutated afterwards.

use crate::bounds::Bounds;
use crate::collection::CapacityPolicy;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub population: PopulationConfig,
    pub human: HumanRules,
    pub fruit: FruitRules,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// RGBA background color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// World rectangle and presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(flatten)]
    pub bounds: Bounds,
    /// Color the frame is cleared to each tick
    pub background: Color,
}

/// Population sizes and collection limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Humans seeded at random positions on creation
    pub initial_humans: usize,
    /// Fruits spawned at the start of every tick
    pub fruit_per_tick: usize,
    /// Capacity of each of the three collections
    pub capacity: usize,
    /// What to do when a collection is full
    pub capacity_policy: CapacityPolicy,
}

/// Human lifecycle rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanRules {
    /// age = timer >> age_shift
    pub age_shift: u32,
    /// Age at which a human counts as adult
    pub adult_age: u32,
    /// Below this age the lethal weight scales with age
    pub juvenile_age: u32,
    /// Lethal weight per year of age for juveniles
    pub juvenile_lethal_factor: i32,
    /// Lethal weight from `juvenile_age` on
    pub adult_lethal_weight: i32,
    /// Ticks between weight loss and death checks
    pub metabolism_period: u32,
    /// Upper bound (inclusive) of the old-age mortality roll
    pub mortality_roll_max: i32,
    /// Weight of a newborn
    pub initial_weight: i32,
    /// Weight lost by a parent when it reproduces
    pub reproduction_cost: i32,
    /// Humans at or above this weight do not gain from eating
    pub satiation_weight: i32,
    /// Weight gained per fruit
    pub fruit_nourishment: i32,
    /// Side of the square collision box
    pub box_size: i32,
}

/// Fruit lifecycle rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FruitRules {
    /// A fruit rots once its timer exceeds this
    pub rot_age: u32,
    /// Side of the square collision box
    pub box_size: i32,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Ticks between stats snapshots
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            background: Color {
                r: 0,
                g: 255,
                b: 179,
                a: 255,
            },
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_humans: 20,
            fruit_per_tick: 2,
            capacity: 10_000,
            capacity_policy: CapacityPolicy::EvictLast,
        }
    }
}

impl Default for HumanRules {
    fn default() -> Self {
        Self {
            age_shift: 6,
            adult_age: 18,
            juvenile_age: 15,
            juvenile_lethal_factor: 2,
            adult_lethal_weight: 30,
            metabolism_period: 60,
            mortality_roll_max: 1000,
            initial_weight: 5,
            reproduction_cost: 20,
            satiation_weight: 100,
            fruit_nourishment: 2,
            box_size: 16,
        }
    }
}

impl Default for FruitRules {
    fn default() -> Self {
        Self {
            rot_age: 250,
            box_size: 16,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 60,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_string()))
        };

        if !self.world.bounds.is_valid() {
            return invalid("bounds must satisfy left <= right and top <= bottom");
        }
        if self.population.capacity == 0 {
            return invalid("capacity must be > 0");
        }
        if self.population.capacity_policy != CapacityPolicy::Grow
            && self.population.initial_humans > self.population.capacity
        {
            return invalid("initial_humans cannot exceed capacity");
        }
        if self.human.metabolism_period == 0 {
            return invalid("metabolism_period must be > 0");
        }
        if self.human.age_shift >= 32 {
            return invalid("age_shift must be < 32");
        }
        if self.human.box_size <= 0 || self.fruit.box_size <= 0 {
            return invalid("box sizes must be > 0");
        }
        if self.logging.stats_interval == 0 {
            return invalid("stats_interval must be > 0");
        }
        if self.logging.log_level.parse::<log::LevelFilter>().is_err() {
            return invalid("log_level must be one of off, error, warn, info, debug, trace");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_flattened_bounds_in_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(yaml.contains("right: 302"));
        assert!(yaml.contains("capacity_policy: evict_last"));
    }

    #[test]
    fn test_logging_section_optional() {
        let mut value = serde_yaml::to_value(Config::default()).unwrap();
        value.as_mapping_mut().unwrap().remove("logging");
        let loaded: Config = serde_yaml::from_value(value).unwrap();
        assert_eq!(loaded.logging, LoggingConfig::default());
    }

    #[test]
    fn test_log_level_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orchard.yaml");

        let mut config = Config::default();
        config.logging.log_level = "debug".to_string();
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.logging.log_level, "debug");
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = Config::default();
        config.logging.log_level = "loud".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.logging.log_level = "WARN".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let mut config = Config::default();
        config.world.bounds.left = 500;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_population_over_capacity() {
        let mut config = Config::default();
        config.population.capacity = 10;
        config.population.initial_humans = 11;
        assert!(config.validate().is_err());

        config.population.capacity_policy = CapacityPolicy::Grow;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orchard.yaml");

        let mut config = Config::default();
        config.population.fruit_per_tick = 5;
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.population.fruit_per_tick, 5);
    }
}
