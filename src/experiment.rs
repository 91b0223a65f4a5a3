//! Batch experiments: scramble, solve with every algorithm and heuristic,
//! then write the raw trials and an aggregated summary.
//!
//! CSV columns (one row per trial):
//! `m,trial,algorithm,heuristic,grid,outcome,cost,nodes,run_seconds,heuristic_seconds,heuristic_percent`
//!
//! - `grid` is the compact layout, quoted since it contains commas
//! - `cost` is empty when no solution was found

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::grid::Grid;
use crate::heuristics::Heuristic;
use crate::scramble::scramble;
use crate::search::{Algorithm, Outcome, SearchResult, DEFAULT_NODE_BUDGET};

/// What to run.
#[derive(Clone, Debug)]
pub struct ExperimentConfig {
    /// Scramble lengths (`m`) to test.
    pub scramble_moves: Vec<usize>,
    /// Problems generated per scramble length.
    pub trials: usize,
    /// Node budget for every search.
    pub budget: u64,
    /// Seed for the problem generator.
    pub seed: u64,
    pub algorithms: Vec<Algorithm>,
    pub heuristics: Vec<Heuristic>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            scramble_moves: vec![10, 20, 30, 40, 50],
            trials: 10,
            budget: DEFAULT_NODE_BUDGET,
            seed: 0,
            algorithms: Algorithm::ALL.to_vec(),
            heuristics: vec![Heuristic::CityBlock, Heuristic::LinearConflict],
        }
    }
}

/// One search on one generated problem.
#[derive(Clone, Debug, PartialEq)]
pub struct TrialRecord {
    pub scramble_moves: usize,
    pub trial: usize,
    pub algorithm: Algorithm,
    pub heuristic: Heuristic,
    /// Compact layout of the problem.
    pub grid: String,
    pub outcome: Outcome,
    pub cost: Option<u32>,
    pub nodes: u64,
    pub elapsed: Duration,
    pub heuristic_time: Duration,
}

impl TrialRecord {
    fn new(
        scramble_moves: usize,
        trial: usize,
        algorithm: Algorithm,
        heuristic: Heuristic,
        grid: String,
        result: &SearchResult,
    ) -> Self {
        Self {
            scramble_moves,
            trial,
            algorithm,
            heuristic,
            grid,
            outcome: result.outcome,
            cost: result.cost(),
            nodes: result.stats.nodes,
            elapsed: result.stats.elapsed,
            heuristic_time: result.stats.heuristic_time,
        }
    }

    fn heuristic_percent(&self) -> f64 {
        if self.elapsed.is_zero() {
            return 0.0;
        }
        self.heuristic_time.as_secs_f64() / self.elapsed.as_secs_f64() * 100.0
    }
}

/// Runs every configured combination on the same generated problems.
///
/// Problems are drawn from one seeded generator in `(m, trial)` order, so a
/// config always produces the same problems.
pub fn run<const N: usize, const CELLS: usize>(config: &ExperimentConfig) -> Vec<TrialRecord> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let goal = Grid::<N, CELLS>::goal();
    let mut records = Vec::new();

    for &moves in &config.scramble_moves {
        for trial in 0..config.trials {
            let grid = scramble(&goal, moves, &mut rng);
            log::info!("m={moves} trial={trial}: {}", grid.to_compact());

            for &algorithm in &config.algorithms {
                for &heuristic in &config.heuristics {
                    let result = algorithm.search(&grid, heuristic, config.budget);
                    if result.outcome == Outcome::BudgetExceeded {
                        log::warn!(
                            "{algorithm} with {heuristic} gave up after {} nodes (m={moves}, trial={trial})",
                            result.stats.nodes
                        );
                    }
                    records.push(TrialRecord::new(
                        moves,
                        trial,
                        algorithm,
                        heuristic,
                        grid.to_compact(),
                        &result,
                    ));
                }
            }
        }
    }

    records
}

/// Aggregate over all trials of one algorithm, heuristic and scramble length.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub algorithm: Algorithm,
    pub heuristic: Heuristic,
    pub scramble_moves: usize,
    pub trials: usize,
    pub solved: usize,
    /// Mean solution length over solved trials only.
    pub mean_cost: Option<f64>,
    /// Mean over all trials, solved or not.
    pub mean_nodes: f64,
    pub mean_seconds: f64,
}

impl SummaryRow {
    pub fn solved_percent(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.solved as f64 / self.trials as f64 * 100.0
    }
}

/// Groups records by algorithm, heuristic and scramble length, in that order.
pub fn summarize(records: &[TrialRecord]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(Algorithm, Heuristic, usize), Vec<&TrialRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.algorithm, record.heuristic, record.scramble_moves))
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|((algorithm, heuristic, scramble_moves), group)| {
            let trials = group.len();
            let costs: Vec<u32> = group.iter().filter_map(|record| record.cost).collect();
            let mean_cost = if costs.is_empty() {
                None
            } else {
                Some(costs.iter().map(|&cost| cost as f64).sum::<f64>() / costs.len() as f64)
            };
            let mean_nodes = group.iter().map(|record| record.nodes as f64).sum::<f64>() / trials as f64;
            let mean_seconds =
                group.iter().map(|record| record.elapsed.as_secs_f64()).sum::<f64>() / trials as f64;

            SummaryRow {
                algorithm,
                heuristic,
                scramble_moves,
                trials,
                solved: costs.len(),
                mean_cost,
                mean_nodes,
                mean_seconds,
            }
        })
        .collect()
}

/// Formats summary rows as an aligned text table.
pub fn format_summary(rows: &[SummaryRow]) -> String {
    let mut output = format!(
        "{:<9} {:<16} {:>4} {:>10} {:>12} {:>8} {:>7}\n",
        "algorithm", "heuristic", "m", "time (s)", "nodes", "cost", "solved"
    );
    for row in rows {
        let cost = match row.mean_cost {
            Some(cost) => format!("{cost:.1}"),
            None => "-".to_string(),
        };
        output.push_str(&format!(
            "{:<9} {:<16} {:>4} {:>10.4} {:>12.0} {:>8} {:>6.0}%\n",
            row.algorithm.name(),
            row.heuristic.name(),
            row.scramble_moves,
            row.mean_seconds,
            row.mean_nodes,
            cost,
            row.solved_percent(),
        ));
    }
    output
}

/// Writes one CSV row per trial.
pub fn write_csv<W: Write>(mut writer: W, records: &[TrialRecord]) -> std::io::Result<()> {
    writeln!(
        writer,
        "m,trial,algorithm,heuristic,grid,outcome,cost,nodes,run_seconds,heuristic_seconds,heuristic_percent"
    )?;
    for record in records {
        let cost = record.cost.map(|cost| cost.to_string()).unwrap_or_default();
        writeln!(
            writer,
            "{},{},{},{},\"{}\",{},{},{},{:.6},{:.6},{:.2}",
            record.scramble_moves,
            record.trial,
            record.algorithm,
            record.heuristic,
            record.grid,
            record.outcome,
            cost,
            record.nodes,
            record.elapsed.as_secs_f64(),
            record.heuristic_time.as_secs_f64(),
            record.heuristic_percent(),
        )?;
    }
    Ok(())
}

/// Saves the raw trials as CSV at `path` and the summary table next to it
/// (same name, `.txt` extension).
pub fn save(path: &Path, records: &[TrialRecord]) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_csv(&mut writer, records)?;
    writer.flush()?;

    let mut summary = File::create(path.with_extension("txt"))?;
    write!(summary, "{}", format_summary(&summarize(records)))?;
    Ok(())
}
