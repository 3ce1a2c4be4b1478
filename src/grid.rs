//! Optotype Grid
//!
//! A rows x cols chart of E glyphs. Directions are balanced across the
//! four canonical values, shuffled, then laid out row-major. A grid is
//! immutable; a layout change replaces it wholesale.

use crate::direction::Direction;
use crate::error::{TrainerError, TrainerResult};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Grid dimensions as reported by the layout provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn total(&self) -> usize {
        self.rows * self.cols
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Supplies the grid size for the current viewport
pub trait LayoutProvider: Send + Sync {
    fn grid_size(&self) -> GridSize;
}

/// A layout that never changes
#[derive(Debug, Clone, Copy)]
pub struct FixedLayout(pub GridSize);

impl LayoutProvider for FixedLayout {
    fn grid_size(&self) -> GridSize {
        self.0
    }
}

/// One glyph position with its fixed target direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub id: String,
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
}

/// Row-major collection of cells
#[derive(Debug, Clone)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Generate a balanced, shuffled grid
    pub fn generate<R: Rng + ?Sized>(size: GridSize, rng: &mut R) -> TrainerResult<Self> {
        validate(size)?;
        let mut directions = balanced_directions(size.total());
        directions.shuffle(rng);
        let grid = Self::from_directions(size, directions)?;
        debug!("🎯 Generated {} grid: {:?}", size, grid.direction_counts());
        Ok(grid)
    }

    /// Lay out explicit directions row-major; `directions.len()` must equal rows*cols
    pub fn from_directions(size: GridSize, directions: Vec<Direction>) -> TrainerResult<Self> {
        validate(size)?;
        if directions.len() != size.total() {
            return Err(TrainerError::Config(format!(
                "{} directions supplied for a {} grid",
                directions.len(),
                size
            )));
        }

        let cells = directions
            .into_iter()
            .enumerate()
            .map(|(i, direction)| {
                let (row, col) = (i / size.cols, i % size.cols);
                Cell {
                    id: cell_id(row, col),
                    row,
                    col,
                    direction,
                }
            })
            .collect();

        Ok(Self { size, cells })
    }

    /// Direction of the cell with this id, `None` for unknown ids
    pub fn get_direction(&self, cell_id: &str) -> Option<Direction> {
        self.find(cell_id).map(|cell| cell.direction)
    }

    pub fn find(&self, cell_id: &str) -> Option<&Cell> {
        let (row, col) = cell_id.split_once('-')?;
        self.cell_at(row.parse().ok()?, col.parse().ok()?)
            .filter(|cell| cell.id == cell_id)
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.size.rows || col >= self.size.cols {
            return None;
        }
        self.cells.get(row * self.size.cols + col)
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.rows
    }

    pub fn cols(&self) -> usize {
        self.size.cols
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells per direction
    pub fn direction_counts(&self) -> BTreeMap<Direction, usize> {
        let mut counts: BTreeMap<Direction, usize> =
            Direction::ALL.iter().map(|d| (*d, 0)).collect();
        for cell in &self.cells {
            *counts.entry(cell.direction).or_insert(0) += 1;
        }
        counts
    }
}

/// Cell id for a coordinate
pub fn cell_id(row: usize, col: usize) -> String {
    format!("{}-{}", row, col)
}

/// `total / 4` of each direction, then the remainder from the start of the
/// canonical order. Unshuffled.
pub fn balanced_directions(total: usize) -> Vec<Direction> {
    let base = total / Direction::ALL.len();
    let remainder = total % Direction::ALL.len();

    let mut directions = Vec::with_capacity(total);
    for direction in Direction::ALL {
        directions.extend(std::iter::repeat(direction).take(base));
    }
    directions.extend(Direction::ALL.iter().take(remainder).copied());
    directions
}

fn validate(size: GridSize) -> TrainerResult<()> {
    if size.rows == 0 || size.cols == 0 {
        return Err(TrainerError::InvalidGridSize {
            rows: size.rows,
            cols: size.cols,
        });
    }
    Ok(())
}
