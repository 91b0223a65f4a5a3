//! Sliding-Tile Puzzle Solver
//!
//! Solves N×N sliding-tile puzzles with A* or recursive best-first search,
//! generates random problems by walking the blank away from the goal, and
//! runs batch experiments comparing the engines and heuristics.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use slider::experiment::{self, ExperimentConfig};
use slider::heuristics::Heuristic;
use slider::search::{Algorithm, SearchResult, DEFAULT_NODE_BUDGET};
use slider::{goal_grid, parse_grid, PuzzleOps};

/// Solves sliding-tile puzzles with A* and RBFS.
#[derive(Parser)]
#[command(name = "slider")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve one puzzle, e.g. "1 2 3 / 4 5 6 / _ 7 8".
    Solve {
        /// Tile labels row by row; rows split by '/' or newlines, blank as '_' or 0.
        grid: String,
        #[arg(short, long, value_enum, default_value_t = Algorithm::AStar)]
        algorithm: Algorithm,
        #[arg(long, value_enum, default_value_t = Heuristic::LinearConflict)]
        heuristic: Heuristic,
        /// Give up after this many nodes.
        #[arg(short, long, default_value_t = DEFAULT_NODE_BUDGET)]
        budget: u64,
    },
    /// Print every heuristic estimate for a puzzle.
    Heuristic {
        grid: String,
    },
    /// Print a random solvable puzzle.
    Scramble {
        /// Side length of the board (2 to 5).
        #[arg(short, long, default_value_t = 4)]
        size: usize,
        /// Number of random blank moves away from the goal.
        #[arg(short, long)]
        moves: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Solve batches of scrambled puzzles with every engine and heuristic.
    Experiment {
        #[arg(short, long, default_value_t = 4)]
        size: usize,
        /// Scramble lengths to test.
        #[arg(short, long, value_delimiter = ',', default_values_t = [10, 20, 30, 40, 50])]
        moves: Vec<usize>,
        /// Puzzles per scramble length.
        #[arg(short, long, default_value_t = 10)]
        trials: usize,
        #[arg(short, long, default_value_t = DEFAULT_NODE_BUDGET)]
        budget: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, value_enum, value_delimiter = ',', default_values_t = Algorithm::ALL)]
        algorithms: Vec<Algorithm>,
        #[arg(
            long,
            value_enum,
            value_delimiter = ',',
            default_values_t = [Heuristic::CityBlock, Heuristic::LinearConflict]
        )]
        heuristics: Vec<Heuristic>,
        /// CSV file for the raw trials; the summary goes next to it as .txt.
        #[arg(short, long, default_value = "results.csv")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Solve {
            grid,
            algorithm,
            heuristic,
            budget,
        } => run_solve(&grid, algorithm, heuristic, budget),
        Command::Heuristic { grid } => {
            let puzzle = parse_grid(&grid).context("Failed to parse grid")?;
            println!("{}\n", puzzle.format_grid());
            print!("{}", format_estimates(puzzle.as_ref()));
            Ok(())
        }
        Command::Scramble { size, moves, seed } => {
            let goal = goal_grid(size).context("Unsupported board size")?;
            let mut rng = SmallRng::seed_from_u64(seed);
            let puzzle = goal.scrambled(moves, &mut rng);
            println!("{}\n", puzzle.format_grid());
            println!("{}", puzzle.compact());
            Ok(())
        }
        Command::Experiment {
            size,
            moves,
            trials,
            budget,
            seed,
            algorithms,
            heuristics,
            output,
        } => {
            let config = ExperimentConfig {
                scramble_moves: moves,
                trials,
                budget,
                seed,
                algorithms,
                heuristics,
            };
            run_experiment(size, &config, &output)
        }
    }
}

/// Solves one puzzle and prints the outcome with its statistics.
fn run_solve(text: &str, algorithm: Algorithm, heuristic: Heuristic, budget: u64) -> anyhow::Result<()> {
    let puzzle = parse_grid(text).context("Failed to parse grid")?;
    if !puzzle.is_solvable() {
        warn!("tile parity says this puzzle is unsolvable; searching anyway");
    }
    if !heuristic.is_admissible() {
        warn!("{heuristic} is not admissible, the solution may not be optimal");
    }

    println!("{}\n", puzzle.format_grid());
    let result = puzzle.solve(algorithm, heuristic, budget);
    print!("{}", format_report(&result));
    println!(
        "Time: {:.3?} ({:.1}% in heuristic, {} calls)",
        result.stats.elapsed,
        result.stats.heuristic_percent(),
        result.stats.heuristic_calls
    );
    Ok(())
}

/// Runs an experiment on `size`×`size` boards and saves the results.
fn run_experiment(size: usize, config: &ExperimentConfig, output: &Path) -> anyhow::Result<()> {
    let goal = goal_grid(size).context("Unsupported board size")?;
    info!(
        "{} trials per scramble length {:?} on {size}x{size} boards",
        config.trials, config.scramble_moves
    );

    let records = goal.run_experiment(config);
    print!("{}", experiment::format_summary(&experiment::summarize(&records)));

    experiment::save(output, &records)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {} and {}", output.display(), output.with_extension("txt").display());
    Ok(())
}

/// One line per heuristic, inadmissible ones flagged.
fn format_estimates(puzzle: &dyn PuzzleOps) -> String {
    let mut output = String::new();
    for heuristic in Heuristic::ALL {
        output.push_str(&format!("{:<16} {:>4}", heuristic.name(), puzzle.estimate(heuristic)));
        if !heuristic.is_admissible() {
            output.push_str(" (inadmissible)");
        }
        output.push('\n');
    }
    output
}

/// Outcome, solution and node count of a search.
fn format_report(result: &SearchResult) -> String {
    let mut output = format!("Outcome: {}\n", result.outcome);
    if let Some(solution) = &result.solution {
        output.push_str(&format!("Solution: {solution}\n"));
    }
    output.push_str(&format!("Nodes: {}\n", result.stats.nodes));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimates_snapshot() {
        let puzzle = parse_grid("4 1 3 2 / 5 6 _ 8 / 10 9 7 11 / 15 14 13 12").unwrap();
        insta::assert_snapshot!(format_estimates(puzzle.as_ref()).trim_end(), @r"
        city-block         15
        linear-conflict    25
        blank-distance     39 (inadmissible)
        ");
    }

    #[test]
    fn test_report_for_goal_input() {
        let puzzle = parse_grid("1 2 3 / 4 5 6 / 7 8 _").unwrap();
        let result = puzzle.solve(Algorithm::Rbfs, Heuristic::CityBlock, 10);
        assert_eq!(format_report(&result), "Outcome: solved\nSolution: 0 moves: \nNodes: 0\n");
    }

    #[test]
    fn test_report_for_unsolvable_input() {
        let puzzle = parse_grid("2 1 / 3 _").unwrap();
        let result = puzzle.solve(Algorithm::AStar, Heuristic::CityBlock, 1000);
        assert_eq!(format_report(&result), "Outcome: unsolvable\nNodes: 12\n");
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["slider", "experiment"]);
        let Command::Experiment {
            size,
            moves,
            trials,
            budget,
            algorithms,
            heuristics,
            output,
            ..
        } = cli.command
        else {
            panic!("expected experiment");
        };
        assert_eq!(size, 4);
        assert_eq!(moves, vec![10, 20, 30, 40, 50]);
        assert_eq!(trials, 10);
        assert_eq!(budget, DEFAULT_NODE_BUDGET);
        assert_eq!(algorithms, Algorithm::ALL.to_vec());
        assert_eq!(heuristics, vec![Heuristic::CityBlock, Heuristic::LinearConflict]);
        assert_eq!(output, PathBuf::from("results.csv"));
    }

    #[test]
    fn test_cli_solve_options() {
        let cli = Cli::parse_from(["slider", "solve", "1 2 3 _", "-a", "rbfs", "--heuristic", "blank-distance"]);
        let Command::Solve {
            algorithm,
            heuristic,
            budget,
            ..
        } = cli.command
        else {
            panic!("expected solve");
        };
        assert_eq!(algorithm, Algorithm::Rbfs);
        assert_eq!(heuristic, Heuristic::BlankDistance);
        assert_eq!(budget, DEFAULT_NODE_BUDGET);
    }
}
