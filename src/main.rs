//! Strictly Hanoi - Unified CLI
//!
//! A thin text front end over the puzzle engine.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use strictly_hanoi::{
    HanoiError, IterativeSolver, MoveOutcome, PegId, PuzzleConfig, PuzzleSession, PuzzleState,
    SolveOutcome, SolverEvent, SolverTask, cancel_channel,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Plan {
            disks,
            from,
            to,
            json,
        } => run_plan(&config, disks, from, to, json),
        Command::Solve {
            disks,
            from,
            to,
            delay_ms,
        } => run_solve(override_delay(config, delay_ms), disks, from, to).await,
        Command::Play { disks, delay_ms } => {
            run_play(override_delay(config, delay_ms), disks).await
        }
    }
}

/// Loads the config file if one was given, defaults otherwise.
fn load_config(path: Option<&Path>) -> Result<PuzzleConfig> {
    match path {
        Some(path) => PuzzleConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            debug!("No config file given, using defaults");
            Ok(PuzzleConfig::default())
        }
    }
}

fn override_delay(config: PuzzleConfig, delay_ms: Option<u64>) -> PuzzleConfig {
    match delay_ms {
        Some(ms) => config.with_step_delay_ms(ms),
        None => config,
    }
}

/// Print the optimal move sequence
#[instrument(skip(config))]
fn run_plan(config: &PuzzleConfig, disks: usize, from: PegId, to: PegId, json: bool) -> Result<()> {
    let mut state = PuzzleState::with_tower_on(disks, from, config.disk_bounds())?;
    let moves = IterativeSolver::new(from, to)?.run_to_completion(&mut state)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&moves)?);
    } else {
        for (i, mv) in moves.iter().enumerate() {
            println!("{:>5}. {}", i + 1, mv);
        }
    }
    Ok(())
}

/// Watch the solver play
#[instrument(skip(config))]
async fn run_solve(config: PuzzleConfig, disks: usize, from: PegId, to: PegId) -> Result<()> {
    let mut state = PuzzleState::with_tower_on(disks, from, config.disk_bounds())?;
    let mut solver = IterativeSolver::new(from, to)?;
    solver.start(&mut state)?;
    println!("{}", state);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let task = SolverTask::spawn(state, solver, config.step_delay(), tx);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => print_event(&event),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, cancelling solver");
                task.cancel();
            }
        }
    }

    let report = task.join().await.context("Solver task failed")?;
    let run = report.result?;
    println!("{}", report.state);
    if run.outcome == SolveOutcome::Cancelled {
        warn!(moves = run.moves.len(), "Solver cancelled before completion");
    }
    Ok(())
}

fn print_event(event: &SolverEvent) {
    match event {
        SolverEvent::Started {
            source,
            destination,
            total_moves,
        } => println!("Solving {} -> {} in {} moves", source, destination, total_moves),
        SolverEvent::Moved(mv) => println!("  {}", mv),
        SolverEvent::Completed { moves } => println!("Completed after {} moves", moves),
        SolverEvent::Cancelled { moves } => println!("Cancelled after {} moves", moves),
    }
}

const PLAY_HELP: &str = "\
commands:
  drag <peg>          pick up the top disk of a peg
  drop [peg]          release the held disk (no peg: back where it came from)
  move <from> <to>    drag and drop in one go
  solve <peg>         let the solver finish onto a peg
  show                print the pegs
  restart             start over
  quit                leave";

/// Play by hand on stdin
///
/// Ctrl-C cancels a running solve; at the prompt it leaves the game.
#[instrument(skip(config))]
async fn run_play(config: PuzzleConfig, disks: usize) -> Result<()> {
    let mut session = PuzzleSession::new("stdin".to_string(), config, disks)?;
    let mut interrupts = listen_for_interrupts();
    println!("{}", PLAY_HELP);
    println!("{}", session.state());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => line,
                None => break,
            },
            Some(()) = interrupts.recv() => {
                info!("Interrupted at the prompt, leaving");
                break;
            }
        };

        let words: Vec<&str> = line.split_whitespace().collect();
        let result = match words.as_slice() {
            [] => continue,
            ["quit" | "q" | "exit"] => break,
            ["help" | "h" | "?"] => {
                println!("{}", PLAY_HELP);
                Ok(())
            }
            ["show" | "s"] => Ok(()),
            ["restart"] => session.restart(),
            ["drag" | "d", peg] => match parse_peg(peg) {
                Some(peg) => session.begin_drag(peg).map(|offset| {
                    println!("Holding the top disk of {} (offset {})", peg, offset);
                }),
                None => continue,
            },
            ["drop"] => session.drop_on(None).map(report_outcome),
            ["drop", peg] => match parse_peg(peg) {
                Some(peg) => session.drop_on(Some(peg)).map(report_outcome),
                None => continue,
            },
            ["move" | "m", from, to] => match (parse_peg(from), parse_peg(to)) {
                (Some(from), Some(to)) => play_move(&mut session, from, to),
                _ => continue,
            },
            ["solve", peg] => match parse_peg(peg) {
                Some(peg) => play_solve(&mut session, peg, &mut interrupts).await.map(|_| ()),
                None => continue,
            },
            _ => {
                println!("Unknown command, try 'help'");
                continue;
            }
        };

        if let Err(e) = result {
            println!("Not allowed: {}", e);
        }
        println!("{}", session.state());
        if session.is_solved() {
            println!("Solved in {} moves", session.move_count());
        }
    }
    Ok(())
}

/// Forwards every Ctrl-C to the returned channel for the rest of the process.
///
/// Installing the handler replaces the default exit on SIGINT, so one
/// listener serves the whole play loop.
fn listen_for_interrupts() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).is_err() {
                break;
            }
        }
        debug!("Interrupt listener stopped");
    });
    rx
}

fn parse_peg(word: &str) -> Option<PegId> {
    let peg = PegId::from_label(word);
    if peg.is_none() {
        println!("Unknown peg '{}' (left, middle, right)", word);
    }
    peg
}

fn report_outcome(outcome: MoveOutcome) {
    match outcome {
        MoveOutcome::Accepted(mv) if mv.is_return() => println!("Put {} back", mv.disk),
        MoveOutcome::Accepted(mv) => println!("Moved {}", mv),
        MoveOutcome::Rejected { disk, target, .. } => {
            println!("{} does not fit on {}; it went back", disk, target)
        }
    }
}

fn play_move(session: &mut PuzzleSession, from: PegId, to: PegId) -> Result<(), HanoiError> {
    session.begin_drag(from)?;
    session.drop_on(Some(to)).map(report_outcome)
}

/// Lets the solver finish onto `destination`; an interrupt cancels it.
async fn play_solve(
    session: &mut PuzzleSession,
    destination: PegId,
    interrupts: &mut mpsc::UnboundedReceiver<()>,
) -> Result<SolveOutcome, HanoiError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (cancel, mut cancel_rx) = cancel_channel();

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_event(&event);
        }
    });

    let result = {
        let solve = session.auto_solve(destination, &tx, &mut cancel_rx);
        tokio::pin!(solve);
        loop {
            tokio::select! {
                result = &mut solve => break result,
                Some(()) = interrupts.recv() => {
                    info!("Interrupted, cancelling solver");
                    cancel.send_replace(true);
                }
            }
        }
    };

    drop(tx);
    if printer.await.is_err() {
        debug!("Event printer ended abnormally");
    }
    result
}
