//! 2D toroidal grid and the double buffer that steps it.

use cellscope_core::{Error, Position, Result};
use serde::{Deserialize, Serialize};

/// A fixed-size 2D toroidal grid stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// `height * width * per_cell` copies of `fill`, reserved fallibly.
///
/// An element count that overflows or a reservation the allocator refuses surfaces as
/// [`Error::Allocation`] instead of aborting the process.
pub(crate) fn try_buffer<T: Clone>(
    height: usize,
    width: usize,
    per_cell: usize,
    fill: T,
) -> Result<Vec<T>> {
    let size = height
        .checked_mul(width)
        .and_then(|cells| cells.checked_mul(per_cell))
        .ok_or(Error::Allocation { height, width })?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| Error::Allocation { height, width })?;
    buffer.resize(size, fill);
    Ok(buffer)
}

impl<T: Clone> Grid<T> {
    /// Allocate a `height x width` grid filled with `fill`
    pub fn new(height: usize, width: usize, fill: T) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(Error::InvalidDimensions { height, width });
        }

        Ok(Self {
            width,
            height,
            cells: try_buffer(height, width, 1, fill)?,
        })
    }

    /// Clone into a freshly reserved buffer of the same shape
    pub fn try_clone(&self) -> Result<Self> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(self.cells.len()).map_err(|_| Error::Allocation {
            height: self.height,
            width: self.width,
        })?;
        cells.extend_from_slice(&self.cells);

        Ok(Self {
            width: self.width,
            height: self.height,
            cells,
        })
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get cell at position (with toroidal wrapping)
    pub fn get(&self, pos: Position) -> &T {
        &self.cells[pos.to_index(self.width, self.height)]
    }

    /// Set cell at position
    pub fn set(&mut self, pos: Position, value: T) {
        let index = pos.to_index(self.width, self.height);
        self.cells[index] = value;
    }

    /// One row as a slice; `row` must be in bounds
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let start = row * self.width;
        &mut self.cells[start..start + self.width]
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index % self.width) as isize;
        let y = (index / self.width) as isize;
        Position::new(x, y)
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell))
    }

    pub(crate) fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// Current and next generation of a grid.
///
/// A step reads only `current` and writes every cell of `next` exactly once;
/// [`DoubleBuffer::swap`] then exchanges ownership of the two buffers without copying.
#[derive(Debug, Clone)]
pub struct DoubleBuffer<T> {
    current: Grid<T>,
    next: Grid<T>,
}

impl<T: Clone> DoubleBuffer<T> {
    pub fn new(initial: Grid<T>) -> Result<Self> {
        let next = initial.try_clone()?;
        Ok(Self {
            current: initial,
            next,
        })
    }
}

impl<T> DoubleBuffer<T> {
    pub fn current(&self) -> &Grid<T> {
        &self.current
    }

    /// Borrow the read side and the write side of a step at once
    pub fn split(&mut self) -> (&Grid<T>, &mut Grid<T>) {
        (&self.current, &mut self.next)
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }
}
