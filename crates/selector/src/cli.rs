//! CLI wiring for DraftForge selection.

use crate::config::SelectorConfig;
use crate::selection::{SelectionMode, SelectionRequest, SelectionResponse, Selector};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use draftforge_candidates::{parse_generated, CandidatePool};
use draftforge_solver::{SolverBackend, SolverConfig};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "draftforge", about = "Multi-objective candidate selection")]
pub struct Cli {
    /// Selector settings file (JSON); environment overrides apply on top.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Budget of the constraint-only scaling solve, in milliseconds.
    #[arg(long, global = true)]
    pub stage_one_ms: Option<u64>,

    /// Budget of the final weighted solve, in milliseconds.
    #[arg(long, global = true)]
    pub stage_two_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum ModeArg {
    Parameter,
    Custom,
}

impl From<ModeArg> for SelectionMode {
    fn from(value: ModeArg) -> SelectionMode {
        match value {
            ModeArg::Parameter => SelectionMode::Parameter,
            ModeArg::Custom => SelectionMode::Custom,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum SolverArg {
    Exhaustive,
    Anneal,
    Auto,
}

impl From<SolverArg> for SolverBackend {
    fn from(value: SolverArg) -> SolverBackend {
        match value {
            SolverArg::Exhaustive => SolverBackend::Exhaustive,
            SolverArg::Anneal => SolverBackend::Anneal,
            SolverArg::Auto => SolverBackend::Auto,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a selection from a JSON request and emit the JSON response.
    Select {
        #[arg(long)]
        request: PathBuf,
        #[arg(long, value_enum, default_value = "parameter")]
        mode: ModeArg,
        #[arg(long, value_enum)]
        solver: Option<SolverArg>,
        #[arg(long)]
        seed: Option<u64>,
        /// Overrides the token carried in the request.
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Parse a generation reply into candidates, optionally appending to a pool.
    Intake {
        #[arg(long)]
        reply: PathBuf,
        #[arg(long)]
        pool: Option<PathBuf>,
    },
    /// Mark a pooled candidate as adopted (or clear it with --off).
    Adopt {
        #[arg(long)]
        pool: PathBuf,
        #[arg(long)]
        id: i64,
        #[arg(long, default_value_t = false)]
        off: bool,
    },
}

pub fn run_cli(cli: Cli) -> Result<()> {
    tracing_subscriber::fmt::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let Cli {
        config,
        stage_one_ms,
        stage_two_ms,
        command,
    } = cli;

    match command {
        Command::Select {
            request,
            mode,
            solver,
            seed,
            token,
            output,
        } => {
            let mut selector_config = match config {
                Some(path) => SelectorConfig::load_from_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => SelectorConfig::from_env()?,
            };
            if let Some(ms) = stage_one_ms {
                selector_config.scaling_budget_ms = ms;
            }
            if let Some(ms) = stage_two_ms {
                selector_config.final_budget_ms = ms;
            }
            if let Err(reason) = selector_config.validate() {
                bail!("invalid selector settings: {reason}");
            }

            let mut solver_config = SolverConfig::from_env()?;
            if let Some(backend) = solver {
                solver_config = solver_config.with_backend(backend.into());
            }
            if let Some(seed) = seed {
                solver_config = solver_config.with_seed(seed);
            }

            let blob = fs::read_to_string(&request)
                .with_context(|| format!("reading {}", request.display()))?;
            let mut request: SelectionRequest = serde_json::from_str(&blob)?;
            if token.is_some() {
                request.token = token;
            }

            let selector = Selector::from_configs(selector_config, &solver_config);
            let response = selector.select(mode.into(), request)?;

            let summary = &response.summary;
            info!(
                solver = %response.solver,
                selected = summary.selected_count,
                length = summary.selected_length,
                target = summary.target_length,
                delta = summary.length_delta,
                within_tolerance = summary.within_tolerance,
                "selection finished"
            );

            emit_response(&response, output.as_deref(), &mut io::stdout().lock())?;
        }
        Command::Intake { reply, pool } => {
            let text = fs::read_to_string(&reply)
                .with_context(|| format!("reading {}", reply.display()))?;
            let batch = parse_generated(&text)?;
            info!(candidates = batch.len(), "reply parsed");

            let mut current = match &pool {
                Some(path) if path.exists() => CandidatePool::load_from_file(path)?,
                _ => CandidatePool::new(),
            };
            current.append(batch)?;

            if let Some(path) = &pool {
                current.save_to_file(path)?;
                info!(path = %path.display(), size = current.len(), "pool saved");
            }
            println!("{}", serde_json::to_string_pretty(&current)?);
        }
        Command::Adopt { pool, id, off } => {
            toggle_adoption(&pool, id, !off)?;
        }
    }
    Ok(())
}

/// Write the response JSON to `output`, or to `stdout` when no file is given.
/// Nothing else is written to `stdout`.
fn emit_response(
    response: &SelectionResponse,
    output: Option<&Path>,
    stdout: &mut impl Write,
) -> Result<()> {
    let json = serde_json::to_string_pretty(response)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!(path = %path.display(), "selection response written");
        }
        None => writeln!(stdout, "{}", json)?,
    }
    Ok(())
}

fn toggle_adoption(path: &Path, id: i64, adopted: bool) -> Result<()> {
    let mut pool = CandidatePool::load_from_file(path)
        .with_context(|| format!("loading pool {}", path.display()))?;
    if !pool.set_adoption(id, adopted) {
        bail!("no candidate with id {id} in {}", path.display());
    }
    pool.save_to_file(path)?;
    info!(id, adopted, "adoption updated");
    Ok(())
}
