//! Sliding tile board, solvability and shuffling.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The empty square.
pub const BLANK: Tile = 0;

/// Tile number; `1..size²` for tiles, [`BLANK`] for the gap.
pub type Tile = u8;

/// Largest supported width (tile numbers must fit in a [`Tile`]).
pub const MAX_SIZE: u8 = 15;

/// Why a slide was not applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum SlideRejected {
    #[error("there is no tile {0}")]
    NoSuchTile(Tile),
    #[error("tile {0} is not next to the gap")]
    NotAdjacent(Tile),
    #[error("square ({row}, {col}) is off the board")]
    OffBoard { row: usize, col: usize },
    #[error("the puzzle is already solved")]
    AlreadySolved,
}

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum InvalidTiles {
    #[error("board size {0} is not supported")]
    Size(u8),
    #[error("expected {expected} tiles, got {actual}")]
    Count { expected: usize, actual: usize },
    #[error("tile {0} is missing or duplicated")]
    Tile(Tile),
}

/// A completed slide: `tile` moved from square `from` into the gap at `to`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct SlideRecord {
    pub tile: Tile,
    pub from: usize,
    pub to: usize,
}

/// `size × size` board, squares in row-major order.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct SlidingBoard {
    size: u8,
    tiles: Vec<Tile>,
}

#[derive(Deserialize)]
struct RawBoard {
    size: u8,
    tiles: Vec<Tile>,
}

impl TryFrom<RawBoard> for SlidingBoard {
    type Error = InvalidTiles;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        SlidingBoard::from_tiles(raw.size, raw.tiles)
    }
}

impl SlidingBoard {
    /// Solved board: tiles in order, gap in the bottom-right corner.
    ///
    /// `size` is clamped to `2..=MAX_SIZE`.
    pub fn solved(size: u8) -> SlidingBoard {
        let size = size.clamp(2, MAX_SIZE);
        let cells = size as usize * size as usize;
        let mut tiles: Vec<Tile> = (1..cells).map(|t| t as Tile).collect();
        tiles.push(BLANK);
        SlidingBoard { size, tiles }
    }

    /// Build from explicit squares; every tile and the gap must appear once.
    pub fn from_tiles(size: u8, tiles: Vec<Tile>) -> Result<SlidingBoard, InvalidTiles> {
        if !(2..=MAX_SIZE).contains(&size) {
            return Err(InvalidTiles::Size(size));
        }
        let cells = size as usize * size as usize;
        if tiles.len() != cells {
            return Err(InvalidTiles::Count {
                expected: cells,
                actual: tiles.len(),
            });
        }
        let mut seen = vec![false; cells];
        for &tile in &tiles {
            let slot = seen.get_mut(tile as usize).ok_or(InvalidTiles::Tile(tile))?;
            if *slot {
                return Err(InvalidTiles::Tile(tile));
            }
            *slot = true;
        }
        Ok(SlidingBoard { size, tiles })
    }

    /// Solved board scrambled by `moves` random slides.
    ///
    /// A slide never undoes the one before it. If the walk happens to end on
    /// the solved board it keeps going, so the result always needs solving.
    pub fn shuffled<R: Rng + ?Sized>(size: u8, moves: u32, rng: &mut R) -> SlidingBoard {
        let mut board = Self::solved(size);
        let mut previous_gap = None;
        let mut remaining = moves.max(1);

        loop {
            for _ in 0..remaining {
                let gap = board.blank_index();
                let options: Vec<usize> = board
                    .neighbours(gap)
                    .filter(|&sq| Some(sq) != previous_gap)
                    .collect();
                let Some(&square) = options.choose(rng) else {
                    break;
                };
                board.tiles.swap(gap, square);
                previous_gap = Some(gap);
            }
            if !board.is_solved() {
                return board;
            }
            remaining = 1;
        }
    }

    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Squares in row-major order.
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Rows of tiles, top to bottom.
    pub fn rows(&self) -> Vec<Vec<Tile>> {
        self.tiles
            .chunks(self.size as usize)
            .map(<[Tile]>::to_vec)
            .collect()
    }

    pub fn blank_index(&self) -> usize {
        self.position(BLANK).unwrap_or(0)
    }

    /// Square holding `tile`.
    pub fn position(&self, tile: Tile) -> Option<usize> {
        self.tiles.iter().position(|&t| t == tile)
    }

    pub fn tile_at(&self, row: usize, col: usize) -> Option<Tile> {
        let size = self.size as usize;
        (row < size && col < size).then(|| self.tiles[row * size + col])
    }

    /// Squares orthogonally adjacent to `square`.
    pub fn neighbours(&self, square: usize) -> impl Iterator<Item = usize> {
        let size = self.size as usize;
        let (row, col) = (square / size, square % size);
        [
            (row > 0).then(|| square - size),
            (row + 1 < size).then(|| square + size),
            (col > 0).then(|| square - 1),
            (col + 1 < size).then(|| square + 1),
        ]
        .into_iter()
        .flatten()
    }

    /// Tiles that can slide right now.
    pub fn movable_tiles(&self) -> Vec<Tile> {
        self.neighbours(self.blank_index())
            .map(|sq| self.tiles[sq])
            .collect()
    }

    /// Validate sliding `tile` into the gap. Pure.
    pub fn check_slide(&self, tile: Tile) -> Result<SlideRecord, SlideRejected> {
        let from = match self.position(tile) {
            Some(sq) if tile != BLANK => sq,
            _ => return Err(SlideRejected::NoSuchTile(tile)),
        };
        let to = self.blank_index();
        if !self.neighbours(from).any(|sq| sq == to) {
            return Err(SlideRejected::NotAdjacent(tile));
        }
        Ok(SlideRecord { tile, from, to })
    }

    /// Slide `tile` into the gap.
    pub fn slide(&mut self, tile: Tile) -> Result<SlideRecord, SlideRejected> {
        let record = self.check_slide(tile)?;
        self.tiles.swap(record.from, record.to);
        Ok(record)
    }

    pub fn is_solved(&self) -> bool {
        let last = self.tiles.len() - 1;
        self.tiles[last] == BLANK
            && self.tiles[..last]
                .iter()
                .enumerate()
                .all(|(i, &t)| t as usize == i + 1)
    }

    /// Pairs of tiles (gap excluded) that appear in the wrong order.
    pub fn inversions(&self) -> usize {
        let tiles: Vec<Tile> = self.tiles.iter().copied().filter(|&t| t != BLANK).collect();
        tiles
            .iter()
            .enumerate()
            .map(|(i, &a)| tiles[i + 1..].iter().filter(|&&b| b < a).count())
            .sum()
    }

    /// Whether the solved board is reachable by slides.
    ///
    /// With an odd width every slide keeps the inversion parity, so the count
    /// must be even. With an even width a vertical slide also moves the gap
    /// one row, so inversions plus the gap's row (counted from the bottom,
    /// starting at 1) must be odd.
    pub fn is_solvable(&self) -> bool {
        let size = self.size as usize;
        let inversions = self.inversions();
        if size % 2 == 1 {
            inversions % 2 == 0
        } else {
            let row_from_bottom = size - self.blank_index() / size;
            (inversions + row_from_bottom) % 2 == 1
        }
    }

    /// Sum over tiles of the distance to their home square.
    pub fn manhattan_distance(&self) -> usize {
        let size = self.size as usize;
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t != BLANK)
            .map(|(sq, &t)| {
                let home = t as usize - 1;
                (sq / size).abs_diff(home / size) + (sq % size).abs_diff(home % size)
            })
            .sum()
    }
}

impl std::fmt::Display for SlidingBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let cells: Vec<String> = row
                .iter()
                .map(|&t| if t == BLANK { "  .".to_string() } else { format!("{t:3}") })
                .collect();
            writeln!(f, "{}", cells.concat())?;
        }
        Ok(())
    }
}
