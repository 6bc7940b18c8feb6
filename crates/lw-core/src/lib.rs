//! lw-core: procedural lock-and-key room graphs
//!
//! Builds a dungeon as a graph of rooms on a fixed lattice, joined by doors
//! some of which only open once the player holds enough points. Gate prices
//! are derived from the points reachable before each gate, so optimal play
//! can always afford every door on the way to the exit.
//!
//! ```no_run
//! use lw_core::{DungeonGenerator, GeneratorConfig, StandardContent};
//!
//! let config = GeneratorConfig {
//!     rng_seed: Some(42),
//!     ..GeneratorConfig::default()
//! };
//! let mut generator = DungeonGenerator::new(config)?;
//! let dungeon = generator.generate(&mut StandardContent::default())?;
//! println!("{}", lw_core::ascii_map(dungeon.graph()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod dungeon;
pub mod error;

mod rng;

pub use config::{ConfigError, GeneratorConfig, MAX_PRIMARY_BUDGET, MIN_PRIMARY_BUDGET};
pub use dungeon::*;
pub use error::GenerationError;
pub use rng::GameRng;
