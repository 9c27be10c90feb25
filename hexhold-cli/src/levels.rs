//! Levels and generate commands - catalog listing and level generation

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hexhold_core::{analyze_balance, Board, Difficulty, LevelConfig, MapSize, Style};

// ============================================================================
// LEVELS COMMAND
// ============================================================================

#[derive(Args)]
pub struct LevelsArgs {
    /// Output the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_levels(args: LevelsArgs) -> Result<()> {
    let catalog = LevelConfig::catalog();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    for config in &catalog {
        println!(
            "{:<16} radius {}, {} gold, {} vs {} units",
            config.name,
            config.map_radius,
            config.side1_gold,
            config.side1_units.len(),
            config.side2_units.len()
        );
        println!("                 {}", config.description);
    }
    Ok(())
}

// ============================================================================
// GENERATE COMMAND
// ============================================================================

#[derive(Clone, Copy, ValueEnum)]
pub enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StyleArg {
    Balanced,
    Economic,
    Military,
    Defensive,
}

impl From<StyleArg> for Style {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Balanced => Style::Balanced,
            StyleArg::Economic => Style::Economic,
            StyleArg::Military => Style::Military,
            StyleArg::Defensive => Style::Defensive,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MapSizeArg {
    Small,
    Medium,
    Large,
}

impl From<MapSizeArg> for MapSize {
    fn from(arg: MapSizeArg) -> Self {
        match arg {
            MapSizeArg::Small => MapSize::Small,
            MapSizeArg::Medium => MapSize::Medium,
            MapSizeArg::Large => MapSize::Large,
        }
    }
}

#[derive(Args)]
pub struct GenerateArgs {
    #[arg(long, value_enum, default_value_t = DifficultyArg::Normal)]
    pub difficulty: DifficultyArg,

    #[arg(long, value_enum, default_value_t = StyleArg::Balanced)]
    pub style: StyleArg,

    #[arg(long, value_enum, default_value_t = MapSizeArg::Medium)]
    pub map_size: MapSizeArg,

    /// Random mirrored skirmish instead of a styled template
    #[arg(long)]
    pub skirmish: bool,

    /// Soldiers per side for a skirmish
    #[arg(long, default_value = "4")]
    pub soldiers: usize,

    /// Write the config to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run_generate(args: GenerateArgs, seed: Option<u64>) -> Result<()> {
    let config = if args.skirmish {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let radius = MapSize::from(args.map_size).radius();
        LevelConfig::random_skirmish(&mut rng, "Skirmish", radius, args.soldiers)
    } else {
        LevelConfig::generate(
            args.difficulty.into(),
            args.style.into(),
            args.map_size.into(),
        )
    };

    let report = analyze_balance(&Board::from_level(&config));
    tracing::info!("Generated {:?}: balanced = {}", config.name, report.balanced);

    if let Some(path) = &args.output {
        config.save(path)?;
        println!("Wrote {:?} to {}", config.name, path.display());
    } else {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    println!("\n{report}");
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
