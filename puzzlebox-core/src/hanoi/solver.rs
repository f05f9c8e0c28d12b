//! Optimal solutions and hints.
//!
//! [`next_optimal_move`] works from any legal position, not just the
//! starting one, by recursing on the largest disk that is not yet home:
//!
//! - if disk `k` already sits on the goal, solve disks `1..k` for the same goal;
//! - otherwise every smaller disk must first gather on the third peg, so find
//!   the largest one that is not there yet and solve *that* sub-tower onto the
//!   third peg;
//! - when all smaller disks are on the third peg, disk `k` itself moves.
//!
//! Each step lowers the disk being solved for, so the recursion depth is at
//! most the disk count.

use super::pegs::{Disk, MoveRecord, Pegs, GOAL_PEG, PEG_COUNT, START_PEG};

/// Minimum number of moves to transfer `disks` disks: `2^disks - 1`.
#[inline]
pub fn min_moves(disks: u8) -> u32 {
    (1u32 << disks) - 1
}

/// Next move on an optimal path from `pegs` to the solved position, or
/// `None` if already solved.
pub fn next_optimal_move(pegs: &Pegs) -> Option<MoveRecord> {
    if pegs.is_solved() {
        return None;
    }
    solve_group(pegs, pegs.disk_count(), GOAL_PEG)
}

/// Next move towards gathering disks `1..=largest` on `target`.
fn solve_group(pegs: &Pegs, largest: Disk, target: usize) -> Option<MoveRecord> {
    if largest == 0 {
        return None;
    }

    let from = pegs.find(largest)?;
    if from == target {
        return solve_group(pegs, largest - 1, target);
    }

    let aux = PEG_COUNT - from - target;
    for disk in (1..largest).rev() {
        if pegs.find(disk)? != aux {
            return solve_group(pegs, disk, aux);
        }
    }

    // Every smaller disk is parked on `aux`
    if pegs.is_top(largest) && pegs.can_place(largest, target) {
        Some(MoveRecord { from, to: target, disk: largest })
    } else {
        None
    }
}

/// The classic recursive solution: move `disks` disks from `from` to `to`
/// using `aux`. Always `2^disks - 1` moves.
pub fn optimal_moves(disks: u8, from: usize, to: usize, aux: usize) -> Vec<MoveRecord> {
    let mut moves = Vec::with_capacity(min_moves(disks) as usize);
    push_moves(disks, from, to, aux, &mut moves);
    moves
}

fn push_moves(disks: u8, from: usize, to: usize, aux: usize, moves: &mut Vec<MoveRecord>) {
    if disks == 0 {
        return;
    }
    push_moves(disks - 1, from, aux, to, moves);
    moves.push(MoveRecord { from, to, disk: disks });
    push_moves(disks - 1, aux, to, from, moves);
}

/// Full solution for the starting layout of `disks` disks.
pub fn starting_solution(disks: u8) -> Vec<MoveRecord> {
    optimal_moves(disks, START_PEG, GOAL_PEG, PEG_COUNT - START_PEG - GOAL_PEG)
}

/// Remaining optimal moves from an arbitrary position, following the hints.
pub fn solution_from(pegs: &Pegs) -> Vec<MoveRecord> {
    let mut board = pegs.clone();
    let mut moves = Vec::new();
    let limit = min_moves(board.disk_count()) as usize;

    while let Some(mv) = next_optimal_move(&board) {
        if moves.len() >= limit || board.apply(mv).is_err() {
            break;
        }
        moves.push(mv);
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn pegs(stacks: [&[Disk]; 3]) -> Pegs {
        Pegs::from_stacks(stacks.map(|s| s.to_vec())).unwrap()
    }

    /// Breadth-first distance from every position to the solved one.
    fn distances_to_goal(disks: u8) -> Vec<u32> {
        let states = 3usize.pow(disks as u32);
        let mut dist = vec![u32::MAX; states];
        let goal = Pegs::from_placement(&vec![GOAL_PEG; disks as usize]).unwrap();
        dist[goal.encode() as usize] = 0;

        // Moves are reversible, so searching outward from the goal works
        let mut queue = VecDeque::from([goal]);
        while let Some(board) = queue.pop_front() {
            let d = dist[board.encode() as usize];
            for from in 0..PEG_COUNT {
                for to in 0..PEG_COUNT {
                    if let Ok(mv) = board.check_move(from, to) {
                        let mut next = board.clone();
                        next.apply(mv).unwrap();
                        let slot = &mut dist[next.encode() as usize];
                        if *slot == u32::MAX {
                            *slot = d + 1;
                            queue.push_back(next);
                        }
                    }
                }
            }
        }
        dist
    }

    #[test]
    fn test_min_moves() {
        assert_eq!(min_moves(1), 1);
        assert_eq!(min_moves(3), 7);
        assert_eq!(min_moves(7), 127);
    }

    #[test]
    fn test_optimal_moves_three() {
        let moves: Vec<(usize, usize, Disk)> = starting_solution(3)
            .iter()
            .map(|m| (m.from, m.to, m.disk))
            .collect();
        assert_eq!(
            moves,
            vec![(0, 2, 1), (0, 1, 2), (2, 1, 1), (0, 2, 3), (1, 0, 1), (1, 2, 2), (0, 2, 1)]
        );
    }

    #[test]
    fn test_optimal_moves_solve() {
        for disks in 1..=7 {
            let mut board = Pegs::new(disks);
            let moves = starting_solution(disks);
            assert_eq!(moves.len() as u32, min_moves(disks));
            for mv in moves {
                board.apply(mv).unwrap();
            }
            assert!(board.is_solved());
        }
    }

    #[test]
    fn test_hints_match_enumeration_from_start() {
        for disks in 3..=7 {
            assert_eq!(solution_from(&Pegs::new(disks)), starting_solution(disks));
        }
    }

    #[test]
    fn test_no_hint_when_solved() {
        assert_eq!(next_optimal_move(&pegs([&[], &[], &[3, 2, 1]])), None);
        assert!(solution_from(&pegs([&[], &[], &[3, 2, 1]])).is_empty());
    }

    #[test]
    fn test_hint_from_middle() {
        // Disk 3 is home; disk 2 goes next, disk 1 already waits on the spare peg
        let board = pegs([&[1], &[2], &[3]]);
        assert_eq!(
            next_optimal_move(&board),
            Some(MoveRecord { from: 1, to: 2, disk: 2 })
        );
        assert_eq!(solution_from(&board).len(), 2);
    }

    #[test]
    fn test_hint_from_off_path_position() {
        // Not on the canonical path: disk 2 sits on the goal peg
        let board = pegs([&[3], &[1], &[2]]);
        assert_eq!(
            next_optimal_move(&board),
            Some(MoveRecord { from: 1, to: 0, disk: 1 })
        );
    }

    #[test]
    fn test_every_position_hint_is_legal_and_optimal() {
        for disks in 1..=5u8 {
            let dist = distances_to_goal(disks);
            for code in 0..3usize.pow(disks as u32) {
                let placement: Vec<usize> =
                    (0..disks).map(|d| (code / 3usize.pow(d as u32)) % 3).collect();
                let board = Pegs::from_placement(&placement).unwrap();
                assert_eq!(board.encode() as usize, code);

                match next_optimal_move(&board) {
                    None => assert!(board.is_solved()),
                    Some(mv) => {
                        assert_eq!(board.check_move(mv.from, mv.to), Ok(mv), "{:?}", board);
                        assert_eq!(solution_from(&board).len() as u32, dist[code], "{:?}", board);
                    }
                }
            }
        }
    }
}
