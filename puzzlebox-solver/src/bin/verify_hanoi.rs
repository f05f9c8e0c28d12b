//! Exhaustive check of the Tower of Hanoi hint engine.
//!
//! Usage: verify_hanoi [max_disks]
//!
//! For every disk count from 3 up to `max_disks` (default 7), computes the
//! true distance to the goal of all `3^n` positions by breadth-first search
//! and checks that from each one the hint is legal, lowers the distance by
//! one, and that the remaining solution has exactly that many moves.

use std::collections::VecDeque;
use std::process;
use std::time::Instant;

use puzzlebox_core::hanoi::{self, Pegs, GOAL_PEG, PEG_COUNT};

const MIN_DISKS: u8 = 3;
const MAX_DISKS: u8 = 12;

/// Distance to the all-on-goal position for every encoded state.
fn distances(disks: u8) -> Vec<u32> {
    let states = 3usize.pow(disks as u32);
    let mut dist = vec![u32::MAX; states];
    let Ok(goal) = Pegs::from_placement(&vec![GOAL_PEG; disks as usize]) else {
        return dist;
    };
    dist[goal.encode() as usize] = 0;

    let mut queue = VecDeque::from([goal]);
    while let Some(pegs) = queue.pop_front() {
        let d = dist[pegs.encode() as usize];
        for from in 0..PEG_COUNT {
            for to in 0..PEG_COUNT {
                let Ok(mv) = pegs.check_move(from, to) else {
                    continue;
                };
                let mut next = pegs.clone();
                if next.apply(mv).is_err() {
                    continue;
                }
                let slot = &mut dist[next.encode() as usize];
                if *slot == u32::MAX {
                    *slot = d + 1;
                    queue.push_back(next);
                }
            }
        }
    }
    dist
}

/// Decode a base-3 state index into a peg per disk.
fn placement(mut index: usize, disks: u8) -> Vec<usize> {
    (0..disks)
        .map(|_| {
            let peg = index % 3;
            index /= 3;
            peg
        })
        .collect()
}

/// Returns the number of failing positions.
fn verify(disks: u8) -> u64 {
    let dist = distances(disks);
    let mut failures = 0;

    for (index, &d) in dist.iter().enumerate() {
        let Ok(pegs) = Pegs::from_placement(&placement(index, disks)) else {
            failures += 1;
            continue;
        };
        let remaining = hanoi::solution_from(&pegs);
        if remaining.len() as u32 != d {
            println!("  {:?}: solution has {} moves, distance is {}", pegs.stacks(), remaining.len(), d);
            failures += 1;
        }

        match hanoi::next_optimal_move(&pegs) {
            None if d == 0 => {}
            None => {
                println!("  {:?}: no hint at distance {}", pegs.stacks(), d);
                failures += 1;
            }
            Some(mv) => {
                let mut next = pegs.clone();
                if next.apply(mv).is_err() {
                    println!("  {:?}: illegal hint {:?}", pegs.stacks(), mv);
                    failures += 1;
                } else if dist[next.encode() as usize] + 1 != d {
                    println!("  {:?}: hint {:?} is not on a shortest path", pegs.stacks(), mv);
                    failures += 1;
                }
            }
        }
    }

    let start_moves = hanoi::starting_solution(disks).len() as u32;
    if start_moves != hanoi::min_moves(disks) {
        println!("  start solves in {} moves, expected {}", start_moves, hanoi::min_moves(disks));
        failures += 1;
    }
    failures
}

fn main() {
    let max_disks = match std::env::args().nth(1).map(|s| s.parse::<u8>()) {
        None => 7,
        Some(Ok(n)) if (MIN_DISKS..=MAX_DISKS).contains(&n) => n,
        Some(_) => {
            eprintln!("max_disks must be a number in {}..={}", MIN_DISKS, MAX_DISKS);
            process::exit(2);
        }
    };

    println!("Tower of Hanoi Hint Verification");
    println!("================================");

    let mut total_failures = 0;
    for disks in MIN_DISKS..=max_disks {
        let start = Instant::now();
        let failures = verify(disks);
        println!(
            "{} disks: {} positions, {} failures ({:.2}s)",
            disks,
            3usize.pow(disks as u32),
            failures,
            start.elapsed().as_secs_f64()
        );
        total_failures += failures;
    }

    if total_failures > 0 {
        println!("\nFAILED: {} positions", total_failures);
        process::exit(1);
    }
    println!("\nAll positions verified.");
}
