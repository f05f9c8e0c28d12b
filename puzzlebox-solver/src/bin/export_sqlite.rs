//! Export a census checkpoint to SQLite.
//!
//! Usage: export_sqlite [input.bin] [output.db]
//!
//! Writes one row per grid size and one row per (size, presses) histogram
//! bucket so the numbers can be queried or charted.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use puzzlebox_core::lights::LightsSolver;
use puzzlebox_solver::checkpoint::Checkpoint;
use rusqlite::{params, Connection};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let input_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/census.bin"));
    let output_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/census.db"));

    println!("Census to SQLite Exporter");
    println!("=========================");
    println!("Input:  {:?}", input_path);
    println!("Output: {:?}", output_path);
    println!();

    let checkpoint = match Checkpoint::load(&input_path) {
        Ok(cp) => cp,
        Err(e) => {
            eprintln!("Failed to load checkpoint: {}", e);
            process::exit(1);
        }
    };
    println!("Loaded {} grid sizes", checkpoint.entries.len());

    if output_path.exists() {
        std::fs::remove_file(&output_path).ok();
    }

    let start = Instant::now();
    match export(&output_path, &checkpoint) {
        Ok(rows) => println!(
            "Inserted {} histogram rows in {:.2}s",
            rows,
            start.elapsed().as_secs_f64()
        ),
        Err(e) => {
            eprintln!("Export failed: {}", e);
            process::exit(1);
        }
    }

    println!("\nDone! Database created at {:?}", output_path);
}

fn export(path: &Path, checkpoint: &Checkpoint) -> rusqlite::Result<usize> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE sizes (
            size INTEGER PRIMARY KEY,
            boards INTEGER NOT NULL,
            examined INTEGER NOT NULL,
            solvable INTEGER NOT NULL,
            unsolvable INTEGER NOT NULL,
            rank INTEGER NOT NULL,
            complete INTEGER NOT NULL
        );
        CREATE TABLE histogram (
            size INTEGER NOT NULL,
            presses INTEGER NOT NULL,
            boards INTEGER NOT NULL,
            PRIMARY KEY (size, presses)
        );",
    )?;

    let tx = conn.transaction()?;
    let mut rows = 0;
    {
        let mut size_stmt = tx.prepare(
            "INSERT INTO sizes (size, boards, examined, solvable, unsolvable, rank, complete)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        let mut hist_stmt =
            tx.prepare("INSERT INTO histogram (size, presses, boards) VALUES (?1, ?2, ?3)")?;

        for census in &checkpoint.entries {
            size_stmt.execute(params![
                census.size,
                census.total() as i64,
                census.examined() as i64,
                census.solvable as i64,
                census.unsolvable as i64,
                LightsSolver::new(census.size).rank() as i64,
                census.is_complete(),
            ])?;
            for (presses, &count) in census.histogram.iter().enumerate().filter(|(_, &n)| n > 0) {
                hist_stmt.execute(params![census.size, presses as i64, count as i64])?;
                rows += 1;
            }
        }
    }
    tx.commit()?;
    Ok(rows)
}
