//! lockwalk: generate a lock-and-key dungeon and print it
//!
//! Options are read from an optional `OPTIONS=` config file first, then
//! overridden by command-line flags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use lw_core::{
    ContentAuthor, DungeonGenerator, EmptyContent, Footprint, GeneratorConfig, StandardContent,
    ascii_map, describe_doors, describe_rooms,
};

/// Procedural room graphs with point-gated doors
#[derive(Parser, Debug)]
#[command(name = "lockwalk")]
#[command(author, version, about = "Generate a lock-and-key dungeon", long_about = None)]
struct Args {
    /// Config file in OPTIONS=name:value format
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// RNG seed; random when omitted
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Rooms on the primary path, Start and End included
    #[arg(short = 'n', long = "primary")]
    primary: Option<usize>,

    /// Rooms on the combat branch
    #[arg(long = "branch1")]
    branch1: Option<usize>,

    /// Rooms on the secret branch
    #[arg(long = "branch2")]
    branch2: Option<usize>,

    /// Room footprint width
    #[arg(long = "width")]
    width: Option<u32>,

    /// Room footprint height
    #[arg(long = "height")]
    height: Option<u32>,

    /// Retries allowed after the first failed attempt
    #[arg(short = 't', long = "extra-tries")]
    extra_tries: Option<usize>,

    /// Write the effective configuration to this file
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    /// Leave rooms empty instead of authoring contents
    #[arg(long = "empty-rooms")]
    empty_rooms: bool,

    /// Print the dungeon as JSON
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Enable debug messages
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

impl Args {
    fn to_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load_from_file(path)
                .with_context(|| format!("reading {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.rng_seed = Some(seed);
        }
        if let Some(n) = self.primary {
            config.room_budget_primary = n;
        }
        if let Some(n) = self.branch1 {
            config.room_budget_secondary_branch1 = n;
        }
        if let Some(n) = self.branch2 {
            config.room_budget_secondary_branch2 = n;
        }
        if let Some(n) = self.extra_tries {
            config.extra_tries_clamp = n;
        }
        config.room_footprint = Footprint::new(
            self.width.unwrap_or(config.room_footprint.width),
            self.height.unwrap_or(config.room_footprint.height),
        );
        Ok(config)
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let config = args.to_config()?;
    debug!("effective configuration: {config:?}");

    if let Some(path) = &args.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("configuration saved to {}", path.display());
    }

    let mut generator = DungeonGenerator::new(config).context("invalid configuration")?;
    let mut author: Box<dyn ContentAuthor> = if args.empty_rooms {
        Box::new(EmptyContent)
    } else {
        Box::new(StandardContent::default())
    };
    let dungeon = generator
        .generate(author.as_mut())
        .context("dungeon could not be generated")?;

    if args.json {
        let json = serde_json::to_string_pretty(&dungeon).context("serializing dungeon")?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "seed {}  rooms {}  attempts {}",
        dungeon.seed(),
        dungeon.graph().len(),
        dungeon.attempts()
    );
    println!();
    println!("{}", ascii_map(dungeon.graph()));
    println!();
    print!("{}", describe_rooms(&dungeon));
    println!();
    print!("{}", describe_doors(&dungeon));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "lockwalk", "--seed", "9", "-n", "12", "--width", "7", "--branch2", "0",
        ]);
        let config = args.to_config().unwrap();
        assert_eq!(config.rng_seed, Some(9));
        assert_eq!(config.room_budget_primary, 12);
        assert_eq!(config.room_footprint, Footprint::new(7, 9));
        assert_eq!(config.room_budget_secondary_branch2, 0);
        assert_eq!(config.room_budget_secondary_branch1, 3);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = Args::parse_from(["lockwalk", "--config", "/nonexistent/lockwalk.cfg"]);
        assert!(args.to_config().is_err());
    }
}
