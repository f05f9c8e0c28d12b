//! Bit-packed Lights Out grid.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest grid that fits in a `u64`.
pub const MAX_SIZE: u8 = 8;

/// One grid cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Why a press was not applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum PressRejected {
    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: u8 },
    #[error("the puzzle is already solved")]
    AlreadySolved,
}

/// A grid that cannot be represented.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum InvalidBoard {
    #[error("grid size {0} is not supported")]
    Size(u8),
    #[error("lights outside a {0}x{0} grid are set")]
    StrayBits(u8),
}

/// `size × size` grid of lights, bit `row * size + col` set when lit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct LightsBoard {
    size: u8,
    lights: u64,
}

#[derive(Deserialize)]
struct RawBoard {
    size: u8,
    lights: u64,
}

impl TryFrom<RawBoard> for LightsBoard {
    type Error = InvalidBoard;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        LightsBoard::from_bits(raw.size, raw.lights)
    }
}

/// Mask with one bit per cell of a `size × size` grid.
pub fn full_mask(size: u8) -> u64 {
    let cells = size as u32 * size as u32;
    if cells >= 64 {
        u64::MAX
    } else {
        (1u64 << cells) - 1
    }
}

/// Cells toggled by pressing cell `index`: itself and its orthogonal
/// neighbours inside the grid.
pub fn press_mask(size: u8, index: usize) -> u64 {
    let size = size as usize;
    let (row, col) = (index / size, index % size);
    let mut mask = 1u64 << index;
    if row > 0 {
        mask |= 1u64 << (index - size);
    }
    if row + 1 < size {
        mask |= 1u64 << (index + size);
    }
    if col > 0 {
        mask |= 1u64 << (index - 1);
    }
    if col + 1 < size {
        mask |= 1u64 << (index + 1);
    }
    mask
}

impl LightsBoard {
    /// All lights off.
    pub fn new(size: u8) -> Result<LightsBoard, InvalidBoard> {
        Self::from_bits(size, 0)
    }

    pub fn from_bits(size: u8, lights: u64) -> Result<LightsBoard, InvalidBoard> {
        if size == 0 || size > MAX_SIZE {
            return Err(InvalidBoard::Size(size));
        }
        if lights & !full_mask(size) != 0 {
            return Err(InvalidBoard::StrayBits(size));
        }
        Ok(LightsBoard { size, lights })
    }

    /// Scramble a solved grid with `presses` random presses.
    ///
    /// If the presses happen to cancel out, the centre is pressed so the
    /// result is never already solved. `size` is clamped to `1..=MAX_SIZE`.
    pub fn generate<R: Rng + ?Sized>(size: u8, presses: u32, rng: &mut R) -> LightsBoard {
        let size = size.clamp(1, MAX_SIZE);
        let mut board = LightsBoard { size, lights: 0 };
        let cells = board.cell_count();
        for _ in 0..presses {
            board.toggle(rng.random_range(0..cells));
        }
        if board.is_solved() {
            let center = size as usize / 2;
            board.toggle(center * size as usize + center);
        }
        board
    }

    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    #[inline]
    pub fn bits(&self) -> u64 {
        self.lights
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.size as usize * self.size as usize
    }

    /// Bit index of a cell, or `None` if it is off the grid.
    pub fn index(&self, cell: Cell) -> Option<usize> {
        let size = self.size as usize;
        (cell.row < size && cell.col < size).then(|| cell.row * size + cell.col)
    }

    pub fn cell(&self, index: usize) -> Cell {
        let size = self.size as usize;
        Cell {
            row: index / size,
            col: index % size,
        }
    }

    pub fn is_lit(&self, cell: Cell) -> bool {
        self.index(cell)
            .is_some_and(|i| self.lights & (1u64 << i) != 0)
    }

    /// Number of lights on.
    #[inline]
    pub fn lit_count(&self) -> u32 {
        self.lights.count_ones()
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.lights == 0
    }

    /// Press a cell.
    pub fn press(&mut self, cell: Cell) -> Result<(), PressRejected> {
        let index = self.index(cell).ok_or(PressRejected::OutOfBounds {
            row: cell.row,
            col: cell.col,
            size: self.size,
        })?;
        self.toggle(index);
        Ok(())
    }

    /// Press the cell at bit `index`. `index` must be on the grid.
    #[inline]
    pub fn toggle(&mut self, index: usize) {
        self.lights ^= press_mask(self.size, index);
    }

    /// Apply every press in a bit set of cells.
    pub fn apply_presses(&mut self, presses: u64) {
        let mut rest = presses & full_mask(self.size);
        while rest != 0 {
            self.toggle(rest.trailing_zeros() as usize);
            rest &= rest - 1;
        }
    }

    /// Rows of booleans, top to bottom.
    pub fn rows(&self) -> Vec<Vec<bool>> {
        let size = self.size as usize;
        (0..size)
            .map(|row| {
                (0..size)
                    .map(|col| self.lights & (1u64 << (row * size + col)) != 0)
                    .collect()
            })
            .collect()
    }
}

impl std::fmt::Display for LightsBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|&lit| if lit { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn cell(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    #[test]
    fn test_press_centre_makes_plus() {
        let mut b = LightsBoard::new(3).unwrap();
        b.press(cell(1, 1)).unwrap();
        assert_eq!(
            b.rows(),
            vec![
                vec![false, true, false],
                vec![true, true, true],
                vec![false, true, false],
            ]
        );
        assert_eq!(b.lit_count(), 5);
    }

    #[test]
    fn test_press_corner_clips_to_grid() {
        let mut b = LightsBoard::new(3).unwrap();
        b.press(cell(0, 0)).unwrap();
        assert_eq!(b.lit_count(), 3);
        assert!(b.is_lit(cell(0, 1)));
        assert!(b.is_lit(cell(1, 0)));
        // No wraparound onto the previous row
        let mut b = LightsBoard::new(3).unwrap();
        b.press(cell(1, 0)).unwrap();
        assert!(!b.is_lit(cell(0, 2)));
    }

    #[test]
    fn test_press_twice_cancels() {
        let mut b = LightsBoard::new(5).unwrap();
        b.press(cell(2, 3)).unwrap();
        b.press(cell(2, 3)).unwrap();
        assert!(b.is_solved());
    }

    #[test]
    fn test_press_out_of_bounds() {
        let mut b = LightsBoard::new(3).unwrap();
        assert_eq!(
            b.press(cell(3, 0)),
            Err(PressRejected::OutOfBounds { row: 3, col: 0, size: 3 })
        );
        assert!(b.is_solved());
    }

    #[test]
    fn test_generate_never_solved() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let b = LightsBoard::generate(3, 2, &mut rng);
            assert!(!b.is_solved());
        }
        // Zero presses falls back to the centre press
        let b = LightsBoard::generate(3, 0, &mut rng);
        assert_eq!(b.lit_count(), 5);
    }

    #[test]
    fn test_full_size() {
        assert_eq!(full_mask(3), 0x1ff);
        assert_eq!(full_mask(8), u64::MAX);
        let mut b = LightsBoard::new(8).unwrap();
        b.press(cell(7, 7)).unwrap();
        assert_eq!(b.lit_count(), 3);
    }

    #[test]
    fn test_rows_follow_bits() {
        let b = LightsBoard::from_bits(2, 0b1001).unwrap();
        assert_eq!(b.rows(), vec![vec![true, false], vec![false, true]]);
        assert!(b.is_lit(cell(1, 1)));
        assert!(!b.is_lit(cell(0, 1)));
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert_eq!(LightsBoard::new(0), Err(InvalidBoard::Size(0)));
        assert_eq!(LightsBoard::new(9), Err(InvalidBoard::Size(9)));
        assert_eq!(LightsBoard::from_bits(2, 1 << 4), Err(InvalidBoard::StrayBits(2)));
        assert!(serde_json::from_str::<LightsBoard>(r#"{"size":2,"lights":16}"#).is_err());
    }

    #[test]
    fn test_display() {
        let mut b = LightsBoard::new(3).unwrap();
        b.press(cell(0, 0)).unwrap();
        assert_eq!(b.to_string(), "##.\n#..\n...\n");
    }
}
