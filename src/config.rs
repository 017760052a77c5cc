use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{agents::Speed, generators::Generator, maze::Maze};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratorKind {
    /// Recursive binary space partition
    Bsp,
    /// Randomized spanning-tree merge
    Kruskal,
    /// Randomized depth-first backtracking
    Backtrack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GameMode {
    /// Watch the wall-following bot run the maze
    Watch,
    /// Run the maze yourself with the arrow keys
    Play,
    /// Race the bot to the exit
    Race,
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::Watch => write!(f, "Watch"),
            GameMode::Play => write!(f, "Play"),
            GameMode::Race => write!(f, "Race"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "mazerunner")]
#[command(about = "Generate mazes and watch a wall-following bot (or yourself) run them")]
pub struct Args {
    /// Number of maze rows
    #[arg(long, default_value_t = 40)]
    pub rows: u16,

    /// Number of maze columns
    #[arg(long, default_value_t = 40)]
    pub cols: u16,

    /// Maze generation algorithm
    #[arg(long, value_enum, default_value_t = GeneratorKind::Bsp)]
    pub generator: GeneratorKind,

    /// Corridor bias for Kruskal's algorithm, -1 (vertical) to 1 (horizontal)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub bias: f64,

    /// Chance of carrying straight on for the backtracking generator, 0 to 1
    #[arg(long, default_value_t = 0.5)]
    pub straightness: f64,

    /// Agent speed, 1 (slow) to 8 (one cell per frame)
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pub speed: i64,

    /// Game mode
    #[arg(long, value_enum, default_value_t = GameMode::Watch)]
    pub mode: GameMode,

    /// Random seed for reproducible mazes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// File to write logs to
    #[arg(long, default_value = "mazerunner.log")]
    pub log_file: PathBuf,
}

/// Validated settings, every value clamped into its allowed range.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rows: u8,
    pub cols: u8,
    pub generator: Generator,
    pub speed: Speed,
    pub mode: GameMode,
    pub seed: Option<u64>,
    pub fps: u32,
    pub log_file: PathBuf,
}

impl Config {
    pub const MAX_FPS: u32 = 240;

    fn clamp_dimension(value: u16) -> u8 {
        value.clamp(Maze::MIN_DIMENSION as u16, u8::MAX as u16) as u8
    }

    fn clamp_unit(value: f64, min: f64) -> f64 {
        if value.is_finite() {
            value.clamp(min, 1.0)
        } else {
            0.0
        }
    }

    /// Build a generator from its kind and the tuning knobs that apply to it.
    pub fn generator_for(kind: GeneratorKind, bias: f64, straightness: f64) -> Generator {
        match kind {
            GeneratorKind::Bsp => Generator::Bsp,
            GeneratorKind::Kruskal => Generator::Kruskal {
                bias: Config::clamp_unit(bias, -1.0),
            },
            GeneratorKind::Backtrack => Generator::RecurBacktrack {
                straightness: Config::clamp_unit(straightness, 0.0),
            },
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            rows: Config::clamp_dimension(args.rows),
            cols: Config::clamp_dimension(args.cols),
            generator: Config::generator_for(args.generator, args.bias, args.straightness),
            speed: Speed::new(args.speed),
            mode: args.mode,
            seed: args.seed,
            fps: args.fps.clamp(1, Config::MAX_FPS),
            log_file: args.log_file,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::from(Args::parse_from(["mazerunner"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!((config.rows, config.cols), (40, 40));
        assert_eq!(config.generator, Generator::Bsp);
        assert_eq!(config.speed, Speed::new(5));
        assert_eq!(config.mode, GameMode::Watch);
        assert_eq!(config.fps, 60);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let args = Args::parse_from([
            "mazerunner",
            "--rows",
            "1",
            "--cols",
            "900",
            "--generator",
            "kruskal",
            "--bias",
            "-3.5",
            "--speed",
            "12",
            "--fps",
            "0",
        ]);
        let config = Config::from(args);
        assert_eq!((config.rows, config.cols), (2, 255));
        assert_eq!(config.generator, Generator::Kruskal { bias: -1.0 });
        assert_eq!(config.speed, Speed::MAX);
        assert_eq!(config.fps, 1);
    }

    #[test]
    fn test_backtracking_options() {
        let args = Args::parse_from([
            "mazerunner",
            "--generator",
            "backtrack",
            "--straightness",
            "0.8",
            "--mode",
            "race",
            "--seed",
            "9",
        ]);
        let config = Config::from(args);
        assert_eq!(
            config.generator,
            Generator::RecurBacktrack { straightness: 0.8 }
        );
        assert_eq!(config.mode, GameMode::Race);
        assert_eq!(config.seed, Some(9));
    }
}
