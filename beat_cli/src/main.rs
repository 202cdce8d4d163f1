mod autoplay;
mod preview;

use std::{fs, path::PathBuf};

use anyhow::{ensure, Context};
use beat_core::beatmap;
use beat_core::config::{self, GameConfig};
use beat_data::{Beatmap, Difficulty, ResultSummary, SessionOutcome, Tier};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::autoplay::BotOptions;

#[derive(Debug, Parser)]
#[command(name = "beatfall")]
#[command(about = "Four-lane rhythm game engine CLI", long_about = None)]
struct Cli {
    /// Print engine debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a beatmap and write it as JSON
    Generate {
        #[arg(short, long)]
        difficulty: Difficulty,
        /// Track length in seconds
        #[arg(long, default_value_t = 120.0)]
        duration: f64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a beatmap JSON file as a lane timeline
    Preview { input: PathBuf },
    /// Play a generated beatmap with a bot and print the results
    Autoplay {
        #[arg(short, long)]
        difficulty: Difficulty,
        #[arg(long, default_value_t = 60.0)]
        duration: f64,
        #[arg(long)]
        seed: Option<u64>,
        /// Largest press offset from the scheduled time, in seconds
        #[arg(long, default_value_t = 0.0)]
        jitter: f64,
        /// Chance that the bot skips a note
        #[arg(long, default_value_t = 0.0)]
        miss_rate: f64,
        /// Game config JSON; defaults apply to missing fields
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate {
            difficulty,
            duration,
            seed,
            output,
        } => {
            ensure!(
                duration > 0.0 && duration.is_finite(),
                "duration must be a positive number of seconds (got {duration})"
            );
            let config = GameConfig::default();
            let beatmap =
                beatmap::generate(duration, &difficulty.profile(), seed, &config.generator);
            let json =
                serde_json::to_string_pretty(&beatmap).context("failed to serialize beatmap")?;

            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("failed to write: {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        Command::Preview { input } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("failed to read: {}", input.display()))?;
            let beatmap: Beatmap = serde_json::from_str(&text)
                .with_context(|| format!("invalid beatmap json: {}", input.display()))?;
            print!("{}", preview::render_timeline(&beatmap));
        }
        Command::Autoplay {
            difficulty,
            duration,
            seed,
            jitter,
            miss_rate,
            config: config_path,
            json,
        } => {
            ensure!(
                duration > 0.0 && duration.is_finite(),
                "duration must be a positive number of seconds (got {duration})"
            );
            let config = match config_path {
                Some(path) => config::load_from_path(&path)?,
                None => GameConfig::default(),
            };
            let options = BotOptions::new(jitter, miss_rate)?;
            let results = autoplay::run(config, difficulty, duration, seed, &options)?;

            if json {
                let out =
                    serde_json::to_string_pretty(&results).context("failed to serialize results")?;
                println!("{out}");
            } else {
                print_results(difficulty, &results);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let _ = env_logger::builder().filter_level(level).try_init();
}

fn print_results(difficulty: Difficulty, results: &ResultSummary) {
    let profile = difficulty.profile();
    let outcome = match results.outcome {
        SessionOutcome::Completed => "completed",
        SessionOutcome::Depleted => "depleted",
    };
    let counts = &results.counts;

    println!("Difficulty : {} (level {})", profile.label, profile.level);
    println!("Outcome    : {outcome}");
    println!("Notes      : {}", results.total_notes);
    println!("Score      : {}", results.score);
    println!("Max combo  : {}", results.max_combo);
    println!("Accuracy   : {:.2}%", results.accuracy);
    println!("Rank       : {}", results.rank);
    let judgments: Vec<String> = Tier::ALL
        .iter()
        .map(|tier| format!("{} {}", tier.label(), counts.get(*tier)))
        .collect();
    println!("Judgments  : {} / MISS {}", judgments.join(" / "), results.miss_count);
    if results.empty_poor_count > 0 {
        println!("Empty poor : {}", results.empty_poor_count);
    }
}
