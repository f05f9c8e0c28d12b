//! Lights Out solver.
//!
//! Pressing a cell twice cancels out and presses commute, so a solution is a
//! set of cells `x` with `A·x = b` over GF(2), where row `i` of `A` is the
//! press mask of cell `i` and `b` is the board. [`LightsSolver`] reduces `A`
//! once per grid size and then answers any board of that size:
//!
//! - rows of the reduced matrix that became zero give the consistency checks
//!   (boards failing them are unsolvable);
//! - free columns span the null space: press patterns that change nothing.
//!
//! The minimum-press solution is the particular solution XOR the null-space
//! combination with the fewest set bits.

use super::board::{full_mask, press_mask, Cell, LightsBoard};

/// Null spaces larger than this are not searched for a minimum.
const MAX_SEARCHED_NULLITY: usize = 16;

/// Reduced press matrix of one grid size.
#[derive(Clone, Debug)]
pub struct LightsSolver {
    size: u8,
    /// Row operations applied during reduction, one row per equation.
    transform: Vec<u64>,
    /// Pivot column of each of the first `rank` reduced rows.
    pivots: Vec<usize>,
    null_basis: Vec<u64>,
}

impl LightsSolver {
    pub fn new(size: u8) -> LightsSolver {
        let cells = size as usize * size as usize;
        let mut rows: Vec<u64> = (0..cells).map(|i| press_mask(size, i)).collect();
        let mut transform: Vec<u64> = (0..cells).map(|i| 1u64 << i).collect();
        let mut pivots = Vec::new();

        for col in 0..cells {
            let rank = pivots.len();
            let bit = 1u64 << col;
            let Some(found) = (rank..cells).find(|&r| rows[r] & bit != 0) else {
                continue;
            };
            rows.swap(rank, found);
            transform.swap(rank, found);
            for r in 0..cells {
                if r != rank && rows[r] & bit != 0 {
                    rows[r] ^= rows[rank];
                    transform[r] ^= transform[rank];
                }
            }
            pivots.push(col);
        }

        let pivot_mask = pivots.iter().fold(0u64, |m, &c| m | 1u64 << c);
        let null_basis = (0..cells)
            .filter(|&free| pivot_mask & (1u64 << free) == 0)
            .map(|free| {
                let mut v = 1u64 << free;
                for (row, &pivot) in pivots.iter().enumerate() {
                    if rows[row] & (1u64 << free) != 0 {
                        v |= 1u64 << pivot;
                    }
                }
                v
            })
            .collect();

        LightsSolver {
            size,
            transform,
            pivots,
            null_basis,
        }
    }

    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Rank of the press matrix.
    #[inline]
    pub fn rank(&self) -> usize {
        self.pivots.len()
    }

    /// Dimension of the null space; `2^nullity` boards share each
    /// solvable pattern's solution set.
    #[inline]
    pub fn nullity(&self) -> usize {
        self.null_basis.len()
    }

    /// Press patterns that leave every board unchanged.
    pub fn null_basis(&self) -> &[u64] {
        &self.null_basis
    }

    pub fn is_solvable(&self, lights: u64) -> bool {
        self.transform[self.rank()..]
            .iter()
            .all(|row| (row & lights).count_ones() % 2 == 0)
    }

    /// Minimum set of presses that turns every light off, as a bit set of
    /// cells, or `None` if the board cannot be solved.
    pub fn solve(&self, lights: u64) -> Option<u64> {
        let lights = lights & full_mask(self.size);
        if !self.is_solvable(lights) {
            return None;
        }

        let particular = self
            .pivots
            .iter()
            .enumerate()
            .filter(|&(row, _)| (self.transform[row] & lights).count_ones() % 2 == 1)
            .fold(0u64, |x, (_, &pivot)| x | 1u64 << pivot);

        if self.nullity() > MAX_SEARCHED_NULLITY {
            return Some(particular);
        }

        // Walk every null-space combination in Gray-code order
        let mut best = particular;
        let mut current = particular;
        for step in 1u64..(1u64 << self.nullity()) {
            current ^= self.null_basis[step.trailing_zeros() as usize];
            if current.count_ones() < best.count_ones() {
                best = current;
            }
        }
        Some(best)
    }

    /// Minimum-press solution of `board`. The board must be of this solver's size.
    pub fn solve_board(&self, board: &LightsBoard) -> Option<u64> {
        debug_assert_eq!(board.size(), self.size);
        self.solve(board.bits())
    }

    /// First press of the minimal solution in row-major order.
    pub fn hint(&self, board: &LightsBoard) -> Option<Cell> {
        let presses = self.solve_board(board)?;
        (presses != 0).then(|| board.cell(presses.trailing_zeros() as usize))
    }

    /// Number of presses in the minimal solution.
    pub fn min_presses(&self, lights: u64) -> Option<u32> {
        self.solve(lights).map(u64::count_ones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Minimum presses for every board by brute force over all press sets.
    fn brute_force(size: u8) -> Vec<Option<u32>> {
        let cells = size as u32 * size as u32;
        let mut best = vec![None; 1 << cells];
        for presses in 0u64..(1 << cells) {
            let mut board = LightsBoard::new(size).unwrap();
            board.apply_presses(presses);
            let slot: &mut Option<u32> = &mut best[board.bits() as usize];
            let count = presses.count_ones();
            if slot.map_or(true, |b| count < b) {
                *slot = Some(count);
            }
        }
        best
    }

    #[test]
    fn test_known_ranks() {
        // 3x3 is fully solvable; 4x4 and 5x5 are not
        assert_eq!(LightsSolver::new(3).nullity(), 0);
        assert_eq!(LightsSolver::new(4).nullity(), 4);
        assert_eq!(LightsSolver::new(5).nullity(), 2);
        assert_eq!(LightsSolver::new(5).rank(), 23);
    }

    #[test]
    fn test_null_space_changes_nothing() {
        for size in 3..=7 {
            let solver = LightsSolver::new(size);
            for &v in solver.null_basis() {
                let mut board = LightsBoard::new(size).unwrap();
                board.apply_presses(v);
                assert!(board.is_solved(), "size {size}");
            }
        }
    }

    #[test]
    fn test_matches_brute_force() {
        for size in 2..=4u8 {
            let solver = LightsSolver::new(size);
            for (bits, expected) in brute_force(size).into_iter().enumerate() {
                assert_eq!(solver.min_presses(bits as u64), expected, "size {size} board {bits:#x}");
            }
        }
    }

    #[test]
    fn test_solution_solves() {
        let mut rng = SmallRng::seed_from_u64(42);
        for size in 3..=7 {
            let solver = LightsSolver::new(size);
            for _ in 0..50 {
                let mut board = LightsBoard::generate(size, 25, &mut rng);
                let presses = solver.solve_board(&board).unwrap();
                board.apply_presses(presses);
                assert!(board.is_solved());
            }
        }
    }

    #[test]
    fn test_unsolvable_board() {
        // A single lit corner has no solution on 4x4
        let solver = LightsSolver::new(4);
        assert!(!solver.is_solvable(1));
        assert_eq!(solver.solve(1), None);
    }

    #[test]
    fn test_hint() {
        let mut board = LightsBoard::new(3).unwrap();
        board.press(Cell { row: 2, col: 1 }).unwrap();
        let solver = LightsSolver::new(3);
        assert_eq!(solver.hint(&board), Some(Cell { row: 2, col: 1 }));
        assert_eq!(solver.hint(&LightsBoard::new(3).unwrap()), None);
    }
}
