//! Generator configuration
//!
//! Holds the recognized generation options and reads and writes them in the
//! `OPTIONS=name:value` text format:
//!
//! ```text
//! # lockwalk configuration
//! OPTIONS=room_budget_primary:8,extra_tries_clamp:10
//! OPTIONS=room_footprint:11x9
//! OPTIONS=rng_seed:42
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dungeon::Footprint;

/// Smallest primary budget: Start, two seed rooms and End
pub const MIN_PRIMARY_BUDGET: usize = 3;

/// Largest primary budget accepted
pub const MAX_PRIMARY_BUDGET: usize = 2500;

/// Largest world-unit offset from the origin; half of `i32::MAX` so that
/// differences between two positions also fit
const MAX_LATTICE_EXTENT: u64 = (i32::MAX / 2) as u64;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value '{value}' for option '{option}'")]
    InvalidValue { option: String, value: String },

    #[error("Missing value for option '{0}'")]
    MissingValue(String),

    #[error("Option '{option}' is {value}, expected {expected}")]
    OutOfRange {
        option: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Options driving one generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Rooms on the primary path, Start and End included
    pub room_budget_primary: usize,
    /// Rooms on the combat branch
    pub room_budget_secondary_branch1: usize,
    /// Rooms on the secret branch, before the bonus room
    pub room_budget_secondary_branch2: usize,
    pub room_footprint: Footprint,
    /// Retries allowed after the first attempt fails
    pub extra_tries_clamp: usize,
    /// `None` draws a seed from entropy
    pub rng_seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            room_budget_primary: 5,
            room_budget_secondary_branch1: 3,
            room_budget_secondary_branch2: 2,
            room_footprint: Footprint::default(),
            extra_tries_clamp: 10,
            rng_seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Check every option against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PRIMARY_BUDGET..=MAX_PRIMARY_BUDGET).contains(&self.room_budget_primary) {
            return Err(ConfigError::OutOfRange {
                option: "room_budget_primary",
                value: self.room_budget_primary.to_string(),
                expected: "3..=2500",
            });
        }
        if self.room_footprint.width == 0 || self.room_footprint.height == 0 {
            return Err(ConfigError::OutOfRange {
                option: "room_footprint",
                value: self.room_footprint.to_string(),
                expected: "a non-zero width and height",
            });
        }
        if self.lattice_extent().is_none_or(|extent| extent > MAX_LATTICE_EXTENT) {
            return Err(ConfigError::OutOfRange {
                option: "room_footprint",
                value: self.room_footprint.to_string(),
                expected: "a footprint whose lattice extent fits the room budgets",
            });
        }
        Ok(())
    }

    /// Farthest world-unit offset any room or branch target can reach
    ///
    /// Every room sits one lattice step from an earlier room, and a branch
    /// target lies at most its budget in steps from its anchor.
    fn lattice_extent(&self) -> Option<u64> {
        let steps = self
            .room_budget_primary
            .checked_add(self.room_budget_secondary_branch1)?
            .checked_add(self.room_budget_secondary_branch2)?
            .checked_add(2)?;
        let side = self.room_footprint.width.max(self.room_footprint.height);
        u64::try_from(steps).ok()?.checked_mul(u64::from(side))
    }

    /// Load options from a file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse_config(&contents)
    }

    /// Parse options from a config string
    ///
    /// Options not mentioned keep their defaults.
    pub fn parse_config(contents: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(opts) = line.strip_prefix("OPTIONS=") else {
                return Err(ConfigError::UnknownOption(line.to_string()));
            };
            for opt in opts.split(',') {
                config.parse_option(opt.trim())?;
            }
        }

        Ok(config)
    }

    fn parse_option(&mut self, opt: &str) -> Result<(), ConfigError> {
        match opt.split_once(':') {
            Some((key, value)) => self.set_option(key.trim(), value.trim()),
            None => Err(ConfigError::MissingValue(opt.to_string())),
        }
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        if value.is_empty() {
            return Err(ConfigError::MissingValue(name.to_string()));
        }
        let invalid = || ConfigError::InvalidValue {
            option: name.to_string(),
            value: value.to_string(),
        };

        match name {
            "room_budget_primary" => {
                self.room_budget_primary = value.parse().map_err(|_| invalid())?;
            }
            "room_budget_secondary_branch1" => {
                self.room_budget_secondary_branch1 = value.parse().map_err(|_| invalid())?;
            }
            "room_budget_secondary_branch2" => {
                self.room_budget_secondary_branch2 = value.parse().map_err(|_| invalid())?;
            }
            "room_footprint" => {
                self.room_footprint = parse_footprint(value).ok_or_else(invalid)?;
            }
            "extra_tries_clamp" => {
                self.extra_tries_clamp = value.parse().map_err(|_| invalid())?;
            }
            "rng_seed" => {
                self.rng_seed = match value {
                    "random" => None,
                    _ => Some(value.parse().map_err(|_| invalid())?),
                };
            }
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Save options to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_config_string()).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Convert options to config file format
    pub fn to_config_string(&self) -> String {
        let seed = self
            .rng_seed
            .map_or_else(|| "random".to_string(), |s| s.to_string());
        let lines = [
            "# lockwalk configuration".to_string(),
            String::new(),
            format!("OPTIONS=room_budget_primary:{}", self.room_budget_primary),
            format!(
                "OPTIONS=room_budget_secondary_branch1:{},room_budget_secondary_branch2:{}",
                self.room_budget_secondary_branch1, self.room_budget_secondary_branch2
            ),
            format!("OPTIONS=room_footprint:{}", self.room_footprint),
            format!("OPTIONS=extra_tries_clamp:{}", self.extra_tries_clamp),
            format!("OPTIONS=rng_seed:{seed}"),
        ];
        lines.join("\n") + "\n"
    }
}

/// Parse `WIDTHxHEIGHT`
fn parse_footprint(value: &str) -> Option<Footprint> {
    let (w, h) = value.split_once(['x', 'X'])?;
    Some(Footprint::new(w.trim().parse().ok()?, h.trim().parse().ok()?))
}
