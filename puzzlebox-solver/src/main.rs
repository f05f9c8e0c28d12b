//! Lights Out census
//!
//! Usage: census [max_size] [checkpoint.bin]
//!
//! Enumerates every board of each grid size from 3 up to `max_size`
//! (default and limit 5) and tallies solvability and the shortest-solution
//! histogram. Progress is checkpointed periodically and on Ctrl-C, and a
//! later run resumes from the checkpoint.

use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use puzzlebox_core::lights::LightsSolver;
use puzzlebox_solver::census::{SizeCensus, MAX_CENSUS_SIZE};
use puzzlebox_solver::checkpoint::Checkpoint;
use puzzlebox_solver::stats::CensusStats;

const MIN_CENSUS_SIZE: u8 = 3;
/// Boards examined between checks of the interrupt flag and timers.
const CHUNK: u64 = 1 << 16;

fn main() {
    let args: Vec<String> = env::args().collect();

    let max_size = match args.get(1).map(|s| s.parse::<u8>()) {
        None => MAX_CENSUS_SIZE,
        Some(Ok(n)) if (MIN_CENSUS_SIZE..=MAX_CENSUS_SIZE).contains(&n) => n,
        Some(_) => {
            eprintln!(
                "max_size must be a number in {}..={}",
                MIN_CENSUS_SIZE, MAX_CENSUS_SIZE
            );
            process::exit(2);
        }
    };
    let checkpoint_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/census.bin"));
    let checkpoint_interval_secs = 60;
    let log_interval_secs = 5;

    println!("Lights Out Census");
    println!("=================");
    println!("Sizes: {}..={}", MIN_CENSUS_SIZE, max_size);
    println!("Checkpoint: {:?}", checkpoint_path);
    println!();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("\n\nInterrupt received, saving checkpoint...");
        r.store(false, Ordering::SeqCst);
    }) {
        eprintln!("Error setting Ctrl-C handler: {}", e);
        process::exit(1);
    }

    if let Some(parent) = checkpoint_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let mut entries: Vec<SizeCensus> = (MIN_CENSUS_SIZE..=max_size).map(SizeCensus::new).collect();
    if checkpoint_path.exists() {
        println!("Loading checkpoint from {:?}...", checkpoint_path);
        match Checkpoint::load(&checkpoint_path) {
            Ok(checkpoint) => {
                for saved in checkpoint.entries {
                    if let Some(slot) = entries.iter_mut().find(|c| c.size == saved.size) {
                        *slot = saved;
                    }
                }
                println!("Resuming from checkpoint\n");
            }
            Err(e) => {
                println!("Warning: Failed to load checkpoint: {}", e);
                println!("Starting fresh.\n");
            }
        }
    }

    let start = Instant::now();
    let mut stats = CensusStats::new();
    let mut last_checkpoint = Instant::now();

    'sizes: for census in entries.iter_mut() {
        if census.is_complete() {
            continue;
        }
        let solver = LightsSolver::new(census.size);
        println!(
            "Grid {}x{}: rank {}, nullity {}, {} boards",
            census.size,
            census.size,
            solver.rank(),
            solver.nullity(),
            census.total()
        );

        while !census.is_complete() {
            if !running.load(Ordering::SeqCst) {
                break 'sizes;
            }
            stats.record(census.run(&solver, CHUNK));
            if stats.should_log(log_interval_secs) {
                stats.log_progress(census);
            }
            if last_checkpoint.elapsed().as_secs() >= checkpoint_interval_secs {
                save(&checkpoint_path, &[census.clone()]);
                last_checkpoint = Instant::now();
            }
        }
        stats.log_progress(census);
        save(&checkpoint_path, &[census.clone()]);
        last_checkpoint = Instant::now();
    }

    println!("\n=================");
    if running.load(Ordering::SeqCst) {
        println!("Census complete!");
    } else {
        println!("Census interrupted.");
    }
    println!("=================");
    println!("Time: {:.2}s", start.elapsed().as_secs_f64());
    println!();
    stats.print_summary(&entries);

    println!("\nSaving final checkpoint...");
    save(&checkpoint_path, &entries);
}

/// Write a checkpoint, merging `updates` into what is already on disk.
fn save(path: &std::path::Path, updates: &[SizeCensus]) {
    let mut merged = Checkpoint::load(path).map(|c| c.entries).unwrap_or_default();
    for update in updates {
        match merged.iter_mut().find(|c| c.size == update.size) {
            Some(slot) => *slot = update.clone(),
            None => merged.push(update.clone()),
        }
    }
    let save_start = Instant::now();
    match Checkpoint::save(path, &merged) {
        Ok(count) => println!(
            "Saved {} grid sizes in {:.2}s",
            count,
            save_start.elapsed().as_secs_f64()
        ),
        Err(e) => println!("Error saving checkpoint: {}", e),
    }
}
